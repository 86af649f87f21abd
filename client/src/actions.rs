use polymesh_shared::{Edge, MeshRequest, Point, MIN_POLYGON_POINTS};

use crate::error::SubmitError;
use crate::geometry::closing_target;
use crate::render::{draw_mesh, Surface, POINT_RADIUS, POLYGON_PEN};
use crate::state::{Click, Completion, EditorState, Submission};

pub fn handle_click(state: &mut EditorState, surface: &impl Surface, point: Point) -> Click {
    state.bump_revision();
    if let Some(first) = closing_target(&state.points, point) {
        if let Some(last) = state.points.last().copied() {
            surface.draw_segment(last, first, &POLYGON_PEN);
        }
        state.points.push(first);
        return Click::Closed;
    }

    surface.draw_dot(point, POINT_RADIUS, POLYGON_PEN.color);
    if let Some(last) = state.points.last().copied() {
        surface.draw_segment(last, point, &POLYGON_PEN);
    }
    state.points.push(point);
    Click::Added
}

pub fn clear(state: &mut EditorState, surface: &impl Surface) {
    surface.clear();
    state.points.clear();
    state.bump_revision();
    state.bump_generation();
}

/// Snapshots the polygon for sending. Any earlier submission becomes stale.
pub fn begin_submission(state: &mut EditorState) -> Result<Submission, SubmitError> {
    if state.points.len() < MIN_POLYGON_POINTS {
        return Err(SubmitError::InsufficientPoints);
    }
    let generation = state.bump_generation();
    Ok(Submission {
        generation,
        revision: state.revision,
        request: MeshRequest::new(state.points.clone()),
    })
}

pub fn complete_submission(
    state: &mut EditorState,
    surface: &impl Surface,
    submission: &Submission,
    outcome: Result<Vec<Edge>, SubmitError>,
) -> Result<Completion, SubmitError> {
    if submission.generation != state.generation {
        return Ok(Completion::Discarded);
    }
    let edges = outcome?;
    if submission.revision != state.revision {
        return Ok(Completion::Discarded);
    }
    draw_mesh(surface, &edges);
    Ok(Completion::Rendered { edges: edges.len() })
}
