//! Rectangular selection from up to two bound points.

use crate::line::Line;
use crate::snap::points_coincide;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EDGE_EPSILON: f64 = 1e-9;

/// Returned when more than two bound points are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bounds hold at most two points, got {0}")]
pub struct BoundsError(pub usize);

/// Zero, one or two corner points of the selection, in grid coordinates.
///
/// Points are stored as clicked; queries normalize them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Bounds {
    points: Vec<Point>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pair(a: Point, b: Point) -> Self {
        Self { points: vec![a, b] }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether both corners are placed.
    pub fn is_complete(&self) -> bool {
        self.points.len() == 2
    }

    /// The normalized selection rectangle, once both corners exist.
    pub fn rect(&self) -> Option<Rect> {
        match self.points.as_slice() {
            [a, b] => Some(Rect::from_points(*a, *b)),
            _ => None,
        }
    }

    /// The rectangle being dragged out: the stored rectangle, or the single
    /// corner stretched to `cursor`.
    pub fn live_rect(&self, cursor: Point) -> Option<Rect> {
        match self.points.as_slice() {
            [a] => Some(Rect::from_points(*a, cursor)),
            _ => self.rect(),
        }
    }

    /// Index of the bound point coinciding with `point`.
    pub fn point_at(&self, point: Point, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| points_coincide(*p, point, tolerance))
    }

    /// Remove the first bound point coinciding with `point`.
    pub fn without_point_at(&self, point: Point, tolerance: f64) -> Self {
        let mut points = self.points.clone();
        if let Some(index) = self.point_at(point, tolerance) {
            points.remove(index);
        }
        Self { points }
    }

    /// Add a corner at `point`, or remove it if one is already there.
    /// Adding to a complete pair starts a new selection.
    pub fn toggled(&self, point: Point, tolerance: f64) -> Self {
        if self.point_at(point, tolerance).is_some() {
            return self.without_point_at(point, tolerance);
        }
        let mut points = if self.is_complete() {
            Vec::new()
        } else {
            self.points.clone()
        };
        points.push(point);
        Self { points }
    }

    pub fn all_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

impl TryFrom<Vec<Point>> for Bounds {
    type Error = BoundsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        if points.len() > 2 {
            return Err(BoundsError(points.len()));
        }
        Ok(Self { points })
    }
}

impl From<Bounds> for Vec<Point> {
    fn from(bounds: Bounds) -> Self {
        bounds.points
    }
}

fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 - EDGE_EPSILON
        && point.x <= rect.x1 + EDGE_EPSILON
        && point.y >= rect.y0 - EDGE_EPSILON
        && point.y <= rect.y1 + EDGE_EPSILON
}

/// Whether `point` lies inside the rectangle spanned by the bound points
/// (edges inclusive). A single point spans a degenerate rectangle.
pub fn is_point_in_bounds(bounds: &Bounds, point: Point) -> bool {
    let rect = match bounds.points() {
        [a] => Rect::from_points(*a, *a),
        [a, b] => Rect::from_points(*a, *b),
        _ => return false,
    };
    rect_contains(rect, point)
}

/// Whether `line` counts as selected by `rect`.
pub fn line_in_rect(line: &Line, rect: Rect, partials: bool) -> bool {
    let start = rect_contains(rect, line.start);
    let end = rect_contains(rect, line.end);
    if partials { start || end } else { start && end }
}

/// Lines selected by the bounds, or with `invert` the lines that are not.
///
/// Nothing is selected until both corners are placed.
pub fn selected_lines(lines: &[Line], bounds: &Bounds, partials: bool, invert: bool) -> Vec<Line> {
    let rect = bounds.rect();
    lines
        .iter()
        .filter(|line| {
            let selected = rect.is_some_and(|r| line_in_rect(line, r, partials));
            selected != invert
        })
        .cloned()
        .collect()
}
