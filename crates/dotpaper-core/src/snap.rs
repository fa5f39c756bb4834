//! Snapping positions onto the dot grid.

use kurbo::{Point, Vec2};

/// Distance (in grid units) under which two points are considered the same.
pub const POINT_TOLERANCE: f64 = 0.3;

/// Sub-cell offset of the dot lattice for a given pan.
///
/// Dots sit at `translation + k * spacing`, so the lattice repeats every
/// `spacing` pixels starting from `translation mod spacing`.
pub fn grid_offset(translation: Vec2, spacing: Vec2) -> Vec2 {
    Vec2::new(
        translation.x.rem_euclid(spacing.x),
        translation.y.rem_euclid(spacing.y),
    )
}

/// Snap a render-space point to the nearest dot.
pub fn snap_to_grid(point: Point, spacing: Vec2, offset: Vec2) -> Point {
    Point::new(
        ((point.x - offset.x) / spacing.x).round() * spacing.x + offset.x,
        ((point.y - offset.y) / spacing.y).round() * spacing.y + offset.y,
    )
}

/// Whether two points coincide within `tolerance`.
pub fn points_coincide(a: Point, b: Point, tolerance: f64) -> bool {
    a.distance(b) < tolerance
}
