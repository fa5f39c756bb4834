//! Clipboard buffer and the rotate/mirror transform applied on paste.

use crate::line::Line;
use crate::symmetry::{flip_across_horizontal, flip_across_vertical, rotate_about};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard rotation must be 0, 90, 180 or 270, got {0}")]
pub struct RotationError(pub u16);

/// Quarter-turn rotation applied when pasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ClipRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl ClipRotation {
    pub fn degrees(self) -> u16 {
        match self {
            ClipRotation::Deg0 => 0,
            ClipRotation::Deg90 => 90,
            ClipRotation::Deg180 => 180,
            ClipRotation::Deg270 => 270,
        }
    }

    /// Advance by a quarter turn.
    pub fn next(self) -> Self {
        match self {
            ClipRotation::Deg0 => ClipRotation::Deg90,
            ClipRotation::Deg90 => ClipRotation::Deg180,
            ClipRotation::Deg180 => ClipRotation::Deg270,
            ClipRotation::Deg270 => ClipRotation::Deg0,
        }
    }
}

impl TryFrom<u16> for ClipRotation {
    type Error = RotationError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(ClipRotation::Deg0),
            90 => Ok(ClipRotation::Deg90),
            180 => Ok(ClipRotation::Deg180),
            270 => Ok(ClipRotation::Deg270),
            other => Err(RotationError(other)),
        }
    }
}

impl From<ClipRotation> for u16 {
    fn from(rotation: ClipRotation) -> Self {
        rotation.degrees()
    }
}

/// Mirror flips applied when pasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipMirror {
    #[default]
    None,
    /// Flip across the vertical line through the cursor.
    Vertical,
    /// Flip across the horizontal line through the cursor.
    Horizontal,
    /// Flip across both lines.
    Both,
}

impl ClipMirror {
    /// Cycle none, vertical, both, horizontal.
    pub fn next(self) -> Self {
        match self {
            ClipMirror::None => ClipMirror::Vertical,
            ClipMirror::Vertical => ClipMirror::Both,
            ClipMirror::Both => ClipMirror::Horizontal,
            ClipMirror::Horizontal => ClipMirror::None,
        }
    }

    pub fn flips_x(self) -> bool {
        matches!(self, ClipMirror::Vertical | ClipMirror::Both)
    }

    pub fn flips_y(self) -> bool {
        matches!(self, ClipMirror::Horizontal | ClipMirror::Both)
    }
}

/// Copied lines, stored relative to the pivot they were copied around.
///
/// Rotation and mirror live inside the clipboard, so clearing it always
/// resets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    pub lines: Vec<Line>,
    #[serde(default)]
    pub rotation: ClipRotation,
    #[serde(default)]
    pub mirror: ClipMirror,
}

impl Clipboard {
    /// Buffer `lines` so that `pivot` becomes the paste anchor.
    pub fn capture(lines: &[Line], pivot: Point) -> Self {
        let delta = -pivot.to_vec2();
        Self {
            lines: lines.iter().map(|l| l.translated(delta)).collect(),
            rotation: ClipRotation::default(),
            mirror: ClipMirror::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines as they would land with the pivot at `cursor`.
    pub fn paste(&self, cursor: Point) -> Vec<Line> {
        paste(&self.lines, self.rotation, self.mirror, cursor)
    }
}

/// The paste transform: translate the pivot to `cursor`, rotate about it,
/// then flip.
///
/// Half turns are done as two flips so grid-aligned geometry stays exact.
pub fn paste_transform(rotation: ClipRotation, mirror: ClipMirror, cursor: Point) -> Affine {
    let mut affine = Affine::translate(cursor.to_vec2());

    match rotation {
        ClipRotation::Deg0 => {}
        ClipRotation::Deg180 => {
            affine = flip_across_horizontal(cursor) * flip_across_vertical(cursor) * affine;
        }
        other => {
            affine = rotate_about(f64::from(other.degrees()), cursor) * affine;
        }
    }

    if mirror.flips_x() {
        affine = flip_across_vertical(cursor) * affine;
    }
    if mirror.flips_y() {
        affine = flip_across_horizontal(cursor) * affine;
    }
    affine
}

/// Place pivot-relative `lines` at `cursor` with the given rotation and
/// mirror. Every pasted line is new.
pub fn paste(lines: &[Line], rotation: ClipRotation, mirror: ClipMirror, cursor: Point) -> Vec<Line> {
    let affine = paste_transform(rotation, mirror, cursor);
    lines.iter().map(|l| l.transformed(affine)).collect()
}
