//! Camera module for pan/zoom transforms.

use crate::snap;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default pixels per grid cell.
pub const DEFAULT_SCALE: f64 = 20.0;

/// Smallest allowed grid cell, in pixels.
pub const MIN_SCALE: f64 = 4.0;

/// Camera manages the view transform for the paper.
///
/// Model (grid) coordinates are mapped to render coordinates by scaling each
/// axis by `scale` and then translating by `translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in render pixels.
    pub translation: Vec2,
    /// Pixels per grid cell on each axis.
    pub scale: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::new(DEFAULT_SCALE, DEFAULT_SCALE),
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(scalex: f64, scaley: f64) -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::new(scalex, scaley),
        }
    }

    /// Model to render transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// Render to model transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale_non_uniform(1.0 / self.scale.x, 1.0 / self.scale.y)
            * Affine::translate(-self.translation)
    }

    /// Convert a render point to model coordinates.
    pub fn screen_to_model(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a model point to render coordinates.
    pub fn model_to_screen(&self, model_point: Point) -> Point {
        self.transform() * model_point
    }

    /// Pan the camera by a delta in render coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// Sub-cell offset of the dot lattice.
    pub fn grid_offset(&self) -> Vec2 {
        snap::grid_offset(self.translation, self.scale)
    }

    /// Translation expressed in grid cells.
    pub fn scaled_translation(&self) -> Vec2 {
        Vec2::new(
            self.translation.x / self.scale.x,
            self.translation.y / self.scale.y,
        )
    }

    /// Snap a render point to the nearest visible dot.
    pub fn snap(&self, screen_point: Point) -> Point {
        snap::snap_to_grid(screen_point, self.scale, self.grid_offset())
    }

    /// Largest cell size that still shows a 4x4 grid in the viewport.
    pub fn max_scale(viewport: Size) -> f64 {
        viewport.width.min(viewport.height) / 4.0
    }

    /// Clamp a cell size into `[MIN_SCALE, max_scale]`; the lower bound wins
    /// on tiny viewports.
    pub fn clamp_scale(value: f64, viewport: Size) -> f64 {
        value.min(Self::max_scale(viewport)).max(MIN_SCALE)
    }

    /// Change the cell size, keeping the model point under `screen_point`
    /// fixed on screen.
    pub fn zoom_at(&mut self, screen_point: Point, new_scale: Vec2) {
        let model_point = self.screen_to_model(screen_point);
        self.scale = new_scale;
        let new_screen = self.model_to_screen(model_point);
        self.translation += screen_point - new_screen;
    }

    /// Reset camera to the origin with the given cell size.
    pub fn reset(&mut self, scale: Vec2) {
        self.translation = Vec2::ZERO;
        self.scale = scale;
    }
}
