//! Symmetry engine: mirrored and rotated copies of a stroke.
//!
//! Every variant is expressed as an [`Affine`] about an origin. The live
//! preview applies these transforms to the open stroke in render space and
//! the commit path maps the same transformed endpoints into the model, so the
//! two can never disagree.

use kurbo::{Affine, Line as KurboLine, Point};
use serde::{Deserialize, Serialize};

/// Which symmetry axis (or rotation step) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MirrorAxis {
    /// Vertical mirror line, or a 90 degree rotation.
    #[default]
    #[serde(rename = "VERT_90")]
    Vert90,
    /// Horizontal mirror line, or a 180 degree rotation.
    #[serde(rename = "HORZ_180")]
    Horz180,
    /// Both mirror lines, or a 270 degree rotation.
    #[serde(rename = "BOTH_360")]
    Both360,
}

impl MirrorAxis {
    /// Cycle to the next axis.
    pub fn next(self) -> Self {
        match self {
            MirrorAxis::Vert90 => MirrorAxis::Horz180,
            MirrorAxis::Horz180 => MirrorAxis::Both360,
            MirrorAxis::Both360 => MirrorAxis::Vert90,
        }
    }

    /// Whether the vertical mirror line is involved.
    pub fn has_vertical(self) -> bool {
        matches!(self, MirrorAxis::Vert90 | MirrorAxis::Both360)
    }

    /// Whether the horizontal mirror line is involved.
    pub fn has_horizontal(self) -> bool {
        matches!(self, MirrorAxis::Horz180 | MirrorAxis::Both360)
    }
}

/// Where the symmetry origin sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MirrorType {
    /// Center of the page.
    #[default]
    Page,
    /// Anchor of the stroke being drawn.
    Cursor,
}

impl MirrorType {
    pub fn next(self) -> Self {
        match self {
            MirrorType::Page => MirrorType::Cursor,
            MirrorType::Cursor => MirrorType::Page,
        }
    }
}

/// How copies are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MirrorMethod {
    #[default]
    Flip,
    Rotate,
    Both,
}

impl MirrorMethod {
    /// Cycle to the next method.
    pub fn next(self) -> Self {
        match self {
            MirrorMethod::Flip => MirrorMethod::Rotate,
            MirrorMethod::Rotate => MirrorMethod::Both,
            MirrorMethod::Both => MirrorMethod::Flip,
        }
    }

    pub fn flips(self) -> bool {
        matches!(self, MirrorMethod::Flip | MirrorMethod::Both)
    }

    pub fn rotates(self) -> bool {
        matches!(self, MirrorMethod::Rotate | MirrorMethod::Both)
    }
}

/// Symmetry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetryConfig {
    pub mirroring: bool,
    pub mirror_axis: MirrorAxis,
    /// Rotation axis, only consulted when the method is `Both`.
    pub mirror_axis2: MirrorAxis,
    pub mirror_type: MirrorType,
    pub mirror_method: MirrorMethod,
}

/// Rotation by `degrees` about `origin`.
///
/// Uses the renderer's rotate-transform convention:
/// `x' = x cos - y sin + ox (1 - cos) + oy sin`,
/// `y' = x sin - y cos + oy (1 - cos) - ox sin`.
/// At 90 and 270 degrees this coincides with an ordinary rotation; it must
/// not be swapped for a textbook matrix.
pub fn rotate_about(degrees: f64, origin: Point) -> Affine {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Affine::new([
        cos,
        sin,
        -sin,
        -cos,
        origin.x * (1.0 - cos) + origin.y * sin,
        origin.y * (1.0 - cos) - origin.x * sin,
    ])
}

/// Reflection across the vertical line `x = origin.x`.
pub fn flip_across_vertical(origin: Point) -> Affine {
    Affine::new([-1.0, 0.0, 0.0, 1.0, origin.x * 2.0, 0.0])
}

/// Reflection across the horizontal line `y = origin.y`.
pub fn flip_across_horizontal(origin: Point) -> Affine {
    Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, origin.y * 2.0])
}

/// Reflection through `origin`; also used as the exact 180 degree rotation.
pub fn point_reflection(origin: Point) -> Affine {
    Affine::new([-1.0, 0.0, 0.0, -1.0, origin.x * 2.0, origin.y * 2.0])
}

impl SymmetryConfig {
    /// Pick the origin for a stroke anchored at `anchor`.
    pub fn origin(&self, page_center: Point, anchor: Point) -> Point {
        match self.mirror_type {
            MirrorType::Page => page_center,
            MirrorType::Cursor => anchor,
        }
    }

    /// Transforms producing every copy of a stroke, excluding the stroke
    /// itself. Empty when mirroring is off.
    pub fn variants(&self, origin: Point) -> Vec<Affine> {
        let mut out = Vec::new();
        if !self.mirroring {
            return out;
        }

        let axis = self.mirror_axis;
        let method = self.mirror_method;
        let rotate_only = method == MirrorMethod::Rotate;
        let rot90 = rotate_about(90.0, origin);
        let rot270 = rotate_about(270.0, origin);
        let flip_h = flip_across_horizontal(origin);

        if axis.has_vertical() {
            if method.flips() {
                out.push(flip_across_vertical(origin));
            }
            if rotate_only {
                out.push(rot90);
            }
        }

        if axis.has_horizontal() {
            if method.flips() {
                out.push(flip_h);
            }
            if rotate_only {
                out.push(point_reflection(origin));
            }
        }

        if axis == MirrorAxis::Both360 {
            if method.flips() {
                out.push(point_reflection(origin));
            }
            if rotate_only {
                out.push(rot270);
            }
        }

        if method == MirrorMethod::Both {
            let axis2 = self.mirror_axis2;
            if axis2.has_vertical() {
                out.push(rot90);
                out.push(flip_h * rot90);
            }
            if axis2.has_horizontal() {
                // The point reflection from the first axis already is the
                // half turn.
                if axis != MirrorAxis::Both360 {
                    out.push(point_reflection(origin));
                }
                out.push(flip_h * rot270);
            }
            if axis2 == MirrorAxis::Both360 {
                out.push(rot270);
            }
            if axis2 == MirrorAxis::Horz180 && axis == MirrorAxis::Both360 {
                out.push(flip_h * rot90);
            }
        }

        out
    }
}

/// Mirror `segment` about `origin`, returning every variant (the segment
/// itself is not included).
pub fn mirror(origin: Point, config: &SymmetryConfig, segment: KurboLine) -> Vec<KurboLine> {
    config
        .variants(origin)
        .into_iter()
        .map(|affine| KurboLine::new(affine * segment.p0, affine * segment.p1))
        .collect()
}
