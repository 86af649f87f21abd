use polymesh_shared::{MeshRequest, Point};

/// Clicks closer than this to the first point close the polygon.
pub const CLOSE_DISTANCE: f64 = 10.0;

/// The polygon under construction.
///
/// `generation` changes when in-flight work is cancelled (clear, resubmit);
/// `revision` changes whenever the drawing does. A mesh is only drawn when
/// neither moved, while an error is only dropped when the request was cancelled.
#[derive(Debug, Default)]
pub struct EditorState {
    pub points: Vec<Point>,
    pub generation: u64,
    pub revision: u64,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bump_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Click {
    Added,
    Closed,
}

/// A request in flight, tagged with the editor state it was built from.
#[derive(Clone, Debug)]
pub struct Submission {
    pub generation: u64,
    pub revision: u64,
    pub request: MeshRequest,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Completion {
    Rendered { edges: usize },
    Discarded,
}
