use polymesh_shared::{Point, MIN_POLYGON_POINTS};

use crate::state::CLOSE_DISTANCE;

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point)
}

/// Returns the first point when `click` is a closing gesture for `points`.
pub fn closing_target(points: &[Point], click: Point) -> Option<Point> {
    if points.len() < MIN_POLYGON_POINTS {
        return None;
    }
    let first = *points.first()?;
    if click.distance(first) < CLOSE_DISTANCE {
        Some(first)
    } else {
        None
    }
}
