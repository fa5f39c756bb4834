//! User-facing configuration.

use crate::camera::DEFAULT_SCALE;
use crate::color::SerializableColor;
use crate::history::DEFAULT_MAX_UNDO;
use crate::keymap::default_bindings;
use crate::line::LineStyle;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Actions that record an undo snapshot unless configured otherwise.
pub const DEFAULT_REVERSIBLE_ACTIONS: &[&str] = &[
    "add line",
    "continue line",
    "add bound",
    "clear",
    "clear bounds",
    "delete",
    "delete line",
    "delete selected",
    "cut",
    "paste",
    "upload",
    "load local",
    "set manual",
];

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every recognised option. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub dash: f64,
    #[serde(rename = "scalex")]
    pub scale_x: f64,
    #[serde(rename = "scaley")]
    pub scale_y: f64,
    pub dot_color: SerializableColor,
    pub dot_radius: f64,
    pub mirror_color: SerializableColor,
    pub cursor_color: SerializableColor,
    pub selection_color: SerializableColor,
    pub selection_border_color: SerializableColor,
    pub bound_color: SerializableColor,
    pub remove_selection_after_delete: bool,
    pub partials: bool,
    pub inverted_scroll: bool,
    pub scroll_sensitivity: f64,
    pub max_undo_amt: usize,
    pub debug: bool,
    /// Chord (e.g. `"ctrl+z"`) to action tag.
    pub keybindings: BTreeMap<String, String>,
    /// Action tags that push an undo snapshot.
    pub reversible_actions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stroke: SerializableColor::black(),
            stroke_width: LineStyle::DEFAULT_STROKE_WIDTH,
            dash: 0.0,
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            dot_color: SerializableColor::rgb(0x2f, 0x2f, 0x2f),
            dot_radius: 1.0,
            mirror_color: SerializableColor::rgb(0x9c, 0x9c, 0x9c),
            cursor_color: SerializableColor::rgb(0x3f, 0x6f, 0xd8),
            selection_color: SerializableColor::new(0x3f, 0x6f, 0xd8, 0x40),
            selection_border_color: SerializableColor::rgb(0x3f, 0x6f, 0xd8),
            bound_color: SerializableColor::rgb(0xd8, 0x3f, 0x3f),
            remove_selection_after_delete: true,
            partials: true,
            inverted_scroll: false,
            scroll_sensitivity: 0.1,
            max_undo_amt: DEFAULT_MAX_UNDO,
            debug: false,
            keybindings: default_bindings(),
            reversible_actions: DEFAULT_REVERSIBLE_ACTIONS
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
        }
    }
}

impl Options {
    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize options to pretty JSON.
    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Cell size the camera returns to on "go home".
    pub fn home_scale(&self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }

    /// Style applied to freshly drawn lines.
    pub fn line_style(&self) -> LineStyle {
        LineStyle {
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            dash: self.dash,
        }
    }
}
