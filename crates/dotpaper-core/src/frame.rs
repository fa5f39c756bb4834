//! Quantities derived from the camera, viewport and cursor.

use crate::state::State;
use kurbo::{Point, Rect, Vec2};

/// Render/model projections of a state. Recomputed for every action since
/// pan and zoom can change with each one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Viewport centre in render space; the origin for page mirroring.
    pub half: Point,
    /// Sub-cell offset of the dot lattice.
    pub offset: Vec2,
    /// Normalized selection rectangle once both bound points exist.
    pub bound_rect: Option<Rect>,
    /// Cursor in grid coordinates.
    pub rel_cursor: Point,
    /// Pan in grid cells.
    pub scaled_translation: Vec2,
}

impl Frame {
    pub fn calc(state: &State) -> Self {
        let camera = &state.camera;
        Self {
            half: Point::new(state.viewport.width / 2.0, state.viewport.height / 2.0),
            offset: camera.grid_offset(),
            bound_rect: state.bounds.rect(),
            rel_cursor: camera.screen_to_model(state.cursor),
            scaled_translation: camera.scaled_translation(),
        }
    }

    /// Selection rectangle including one being dragged out from a single
    /// bound point to the cursor.
    pub fn live_bound_rect(&self, state: &State) -> Option<Rect> {
        state.bounds.live_rect(self.rel_cursor)
    }
}
