//! Committed line segments.

use crate::color::SerializableColor;
use kurbo::{Affine, Line as KurboLine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for lines.
pub type LineId = Uuid;

/// Stroke properties applied to new lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    /// Stroke color.
    pub stroke: SerializableColor,
    /// Stroke width in grid units.
    pub stroke_width: f64,
    /// Dash length in grid units (0 = solid).
    #[serde(default)]
    pub dash: f64,
}

impl LineStyle {
    pub const DEFAULT_STROKE_WIDTH: f64 = 0.05;
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: SerializableColor::black(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            dash: 0.0,
        }
    }
}

/// A straight segment in model (grid) coordinates.
///
/// Lines are never edited in place: every transform returns a new line with
/// a fresh id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: LineId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: LineStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point, style: LineStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn endpoints(&self) -> [Point; 2] {
        [self.start, self.end]
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// A new line with both endpoints mapped through `affine`.
    pub fn transformed(&self, affine: Affine) -> Self {
        Self::new(affine * self.start, affine * self.end, self.style.clone())
    }

    /// A new line moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        self.transformed(Affine::translate(delta))
    }

    /// Whether either endpoint lies within `tolerance` of `point`.
    pub fn touches(&self, point: Point, tolerance: f64) -> bool {
        self.endpoints()
            .iter()
            .any(|p| p.distance(point) < tolerance)
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}
