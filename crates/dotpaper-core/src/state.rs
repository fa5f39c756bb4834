//! The root drawing state and partial overlays of it.

use crate::camera::Camera;
use crate::clipboard::Clipboard;
use crate::color::SerializableColor;
use crate::frame::Frame;
use crate::line::{Line, LineStyle};
use crate::options::Options;
use crate::selection::Bounds;
use crate::symmetry::{MirrorAxis, MirrorMethod, MirrorType, SymmetryConfig};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewport assumed until the host reports its size.
pub const DEFAULT_VIEWPORT: Size = Size::new(800.0, 600.0);

/// Everything the engine knows about the drawing.
///
/// A new value is produced for every dispatched action. Positions follow two
/// conventions: `cursor` and `cur_line` are render-space pixels (snapped to
/// the dot lattice), while lines, bounds and the eraser marker are grid
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub mobile: bool,
    pub viewport: Size,
    /// Snapped cursor, in render space.
    pub cursor: Point,
    pub lines: Vec<Line>,
    /// Anchor of the open stroke, in render space.
    pub cur_line: Option<Point>,
    pub bounds: Bounds,
    /// First point of a two-step line erase.
    pub eraser: Option<Point>,
    pub clipboard: Option<Clipboard>,
    pub symmetry: SymmetryConfig,
    pub camera: Camera,
    /// Style for new lines.
    pub style: LineStyle,
    pub partials: bool,
    pub remove_selection_after_delete: bool,
    pub inverted_scroll: bool,
    pub scroll_sensitivity: f64,
    pub debug: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl State {
    /// Blank drawing configured from `options`.
    pub fn from_options(options: &Options) -> Self {
        Self {
            mobile: false,
            viewport: DEFAULT_VIEWPORT,
            cursor: Point::ZERO,
            lines: Vec::new(),
            cur_line: None,
            bounds: Bounds::new(),
            eraser: None,
            clipboard: None,
            symmetry: SymmetryConfig::default(),
            camera: Camera::with_scale(options.scale_x, options.scale_y),
            style: options.line_style(),
            partials: options.partials,
            remove_selection_after_delete: options.remove_selection_after_delete,
            inverted_scroll: options.inverted_scroll,
            scroll_sensitivity: options.scroll_sensitivity,
            debug: options.debug,
        }
    }

    /// Derived render/model quantities for this state.
    pub fn frame(&self) -> Frame {
        Frame::calc(self)
    }

    /// One-line description used by debug logging.
    pub fn summary(&self) -> String {
        format!(
            "lines={} bounds={} cur_line={} clipboard={} cursor=({}, {}) translation=({}, {}) scale=({}, {})",
            self.lines.len(),
            self.bounds.len(),
            self.cur_line.is_some(),
            self.clipboard.as_ref().map_or(0, |c| c.lines.len()),
            self.cursor.x,
            self.cursor.y,
            self.camera.translation.x,
            self.camera.translation.y,
            self.camera.scale.x,
            self.camera.scale.y,
        )
    }
}

/// A decoded partial state failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidState {
    pub field: String,
    pub reason: String,
}

impl InvalidState {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Fields to overlay onto a [`State`]; absent fields are left alone.
///
/// This is the shape of save files and of `set manual` payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialState {
    pub lines: Option<Vec<Line>>,
    pub bounds: Option<Bounds>,
    #[serde(rename = "translationx")]
    pub translation_x: Option<f64>,
    #[serde(rename = "translationy")]
    pub translation_y: Option<f64>,
    #[serde(rename = "scalex")]
    pub scale_x: Option<f64>,
    #[serde(rename = "scaley")]
    pub scale_y: Option<f64>,
    pub mirroring: Option<bool>,
    pub mirror_axis: Option<MirrorAxis>,
    pub mirror_axis2: Option<MirrorAxis>,
    pub mirror_type: Option<MirrorType>,
    pub mirror_method: Option<MirrorMethod>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub dash: Option<f64>,
    pub partials: Option<bool>,
    pub remove_selection_after_delete: Option<bool>,
    pub inverted_scroll: Option<bool>,
    pub scroll_sensitivity: Option<f64>,
    pub debug: Option<bool>,
    pub mobile: Option<bool>,
}

fn check_finite(field: &str, value: Option<f64>) -> Result<(), InvalidState> {
    match value {
        Some(v) if !v.is_finite() => Err(InvalidState::new(field, "must be finite")),
        _ => Ok(()),
    }
}

fn check_non_negative(field: &str, value: Option<f64>) -> Result<(), InvalidState> {
    check_finite(field, value)?;
    match value {
        Some(v) if v < 0.0 => Err(InvalidState::new(field, "must not be negative")),
        _ => Ok(()),
    }
}

fn check_positive(field: &str, value: Option<f64>) -> Result<(), InvalidState> {
    check_finite(field, value)?;
    match value {
        Some(v) if v <= 0.0 => Err(InvalidState::new(field, "must be positive")),
        _ => Ok(()),
    }
}

impl PartialState {
    /// The drawing itself (what a save file records) taken from `state`.
    pub fn drawing(state: &State) -> Self {
        Self {
            lines: Some(state.lines.clone()),
            bounds: Some(state.bounds.clone()),
            translation_x: Some(state.camera.translation.x),
            translation_y: Some(state.camera.translation.y),
            scale_x: Some(state.camera.scale.x),
            scale_y: Some(state.camera.scale.y),
            mirroring: Some(state.symmetry.mirroring),
            mirror_axis: Some(state.symmetry.mirror_axis),
            mirror_axis2: Some(state.symmetry.mirror_axis2),
            mirror_type: Some(state.symmetry.mirror_type),
            mirror_method: Some(state.symmetry.mirror_method),
            stroke: Some(state.style.stroke),
            stroke_width: Some(state.style.stroke_width),
            dash: Some(state.style.dash),
            ..Default::default()
        }
    }

    /// Reject values that would leave the state unusable.
    pub fn validate(&self) -> Result<(), InvalidState> {
        if let Some(lines) = &self.lines {
            for (i, line) in lines.iter().enumerate() {
                let field = format!("lines[{i}]");
                if !line.is_finite() {
                    return Err(InvalidState::new(field, "coordinates must be finite"));
                }
                check_non_negative(&field, Some(line.style.stroke_width))?;
                check_non_negative(&field, Some(line.style.dash))?;
            }
        }
        if let Some(bounds) = &self.bounds {
            if !bounds.all_finite() {
                return Err(InvalidState::new("bounds", "coordinates must be finite"));
            }
        }
        check_finite("translationx", self.translation_x)?;
        check_finite("translationy", self.translation_y)?;
        check_positive("scalex", self.scale_x)?;
        check_positive("scaley", self.scale_y)?;
        check_non_negative("strokeWidth", self.stroke_width)?;
        check_non_negative("dash", self.dash)?;
        check_finite("scrollSensitivity", self.scroll_sensitivity)?;
        Ok(())
    }

    /// Overlay the present fields onto `state`.
    pub fn apply(self, mut state: State) -> State {
        if let Some(lines) = self.lines {
            state.lines = lines;
        }
        if let Some(bounds) = self.bounds {
            state.bounds = bounds;
        }
        let translation = state.camera.translation;
        state.camera.translation = Vec2::new(
            self.translation_x.unwrap_or(translation.x),
            self.translation_y.unwrap_or(translation.y),
        );
        let scale = state.camera.scale;
        state.camera.scale = Vec2::new(
            Camera::clamp_scale(self.scale_x.unwrap_or(scale.x), state.viewport),
            Camera::clamp_scale(self.scale_y.unwrap_or(scale.y), state.viewport),
        );
        // The lattice may have moved under the cursor.
        state.cursor = state.camera.snap(state.cursor);

        let symmetry = &mut state.symmetry;
        symmetry.mirroring = self.mirroring.unwrap_or(symmetry.mirroring);
        symmetry.mirror_axis = self.mirror_axis.unwrap_or(symmetry.mirror_axis);
        symmetry.mirror_axis2 = self.mirror_axis2.unwrap_or(symmetry.mirror_axis2);
        symmetry.mirror_type = self.mirror_type.unwrap_or(symmetry.mirror_type);
        symmetry.mirror_method = self.mirror_method.unwrap_or(symmetry.mirror_method);

        let style = &mut state.style;
        style.stroke = self.stroke.unwrap_or(style.stroke);
        style.stroke_width = self.stroke_width.unwrap_or(style.stroke_width);
        style.dash = self.dash.unwrap_or(style.dash);

        state.partials = self.partials.unwrap_or(state.partials);
        state.remove_selection_after_delete = self
            .remove_selection_after_delete
            .unwrap_or(state.remove_selection_after_delete);
        state.inverted_scroll = self.inverted_scroll.unwrap_or(state.inverted_scroll);
        state.scroll_sensitivity = self.scroll_sensitivity.unwrap_or(state.scroll_sensitivity);
        state.debug = self.debug.unwrap_or(state.debug);
        state.mobile = self.mobile.unwrap_or(state.mobile);
        state
    }
}
