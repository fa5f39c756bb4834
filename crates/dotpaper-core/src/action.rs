//! The action protocol: `{"action": "<tag>", ...payload}` records.

use crate::color::SerializableColor;
use crate::keymap::Modifiers;
use crate::state::PartialState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors decoding an action record.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    Unknown(String),
    #[error("Malformed action: {0}")]
    Malformed(String),
}

/// Every action the dispatcher understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    /// Pointer moved to `(x, y)` in device coordinates.
    #[serde(rename = "cursor moved")]
    CursorMoved { x: f64, y: f64 },
    #[serde(rename = "key press")]
    KeyPress {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Pan by a render-space delta.
    #[serde(rename = "translate")]
    Translate { x: f64, y: f64 },
    /// Zoom. `amt` is a scroll amount scaled by the scroll sensitivity;
    /// otherwise `amtx`/`amty` are raw cell-size deltas. The zoom centre
    /// defaults to the cursor.
    #[serde(rename = "scale")]
    Scale {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amt: Option<f64>,
        #[serde(default)]
        amtx: f64,
        #[serde(default)]
        amty: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cx: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cy: Option<f64>,
    },
    #[serde(rename = "increase scale")]
    IncreaseScale,
    #[serde(rename = "decrease scale")]
    DecreaseScale,
    #[serde(rename = "go home")]
    GoHome,
    #[serde(rename = "resize")]
    Resize { width: f64, height: f64 },

    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,

    #[serde(rename = "clear")]
    Clear,
    #[serde(rename = "clear bounds")]
    ClearBounds,
    #[serde(rename = "delete selected")]
    DeleteSelected,
    #[serde(rename = "delete line")]
    DeleteLine,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "nevermind")]
    Nevermind,

    #[serde(rename = "add line")]
    AddLine {
        /// Keep the clipboard after pasting.
        #[serde(default, rename = "continue")]
        continues: bool,
    },
    #[serde(rename = "continue line")]
    ContinueLine,
    #[serde(rename = "add bound")]
    AddBound,

    #[serde(rename = "undo")]
    Undo,
    #[serde(rename = "redo")]
    Redo,

    #[serde(rename = "copy")]
    Copy,
    #[serde(rename = "cut")]
    Cut,
    #[serde(rename = "paste")]
    Paste,
    #[serde(rename = "increment clipboard rotation")]
    IncrementClipboardRotation,
    #[serde(rename = "increment clipboard mirror axis")]
    IncrementClipboardMirrorAxis,

    #[serde(rename = "toggle mirroring")]
    ToggleMirroring,
    #[serde(rename = "toggle mirror axis 1")]
    ToggleMirrorAxis1,
    #[serde(rename = "toggle mirror axis 2")]
    ToggleMirrorAxis2,
    #[serde(rename = "toggle mirror type")]
    ToggleMirrorType,
    #[serde(rename = "toggle mirror method")]
    ToggleMirrorMethod,
    #[serde(rename = "toggle partials")]
    TogglePartials,

    #[serde(rename = "set stroke")]
    SetStroke { color: SerializableColor },
    #[serde(rename = "set stroke width")]
    SetStrokeWidth { width: f64 },
    #[serde(rename = "set dash")]
    SetDash { dash: f64 },

    #[serde(rename = "download")]
    Download { name: String },
    #[serde(rename = "upload")]
    Upload {
        #[serde(rename = "str")]
        text: String,
    },
    #[serde(rename = "save local")]
    SaveLocal { name: String },
    #[serde(rename = "load local")]
    LoadLocal { name: String },
    #[serde(rename = "set manual")]
    SetManual(PartialState),

    #[serde(rename = "start tour")]
    StartTour,
    #[serde(rename = "end tour")]
    EndTour,
    #[serde(rename = "debug")]
    Debug,
}

/// Every action tag, in declaration order.
pub const ACTION_NAMES: &[&str] = &[
    "cursor moved",
    "key press",
    "translate",
    "scale",
    "increase scale",
    "decrease scale",
    "go home",
    "resize",
    "left",
    "right",
    "up",
    "down",
    "clear",
    "clear bounds",
    "delete selected",
    "delete line",
    "delete",
    "nevermind",
    "add line",
    "continue line",
    "add bound",
    "undo",
    "redo",
    "copy",
    "cut",
    "paste",
    "increment clipboard rotation",
    "increment clipboard mirror axis",
    "toggle mirroring",
    "toggle mirror axis 1",
    "toggle mirror axis 2",
    "toggle mirror type",
    "toggle mirror method",
    "toggle partials",
    "set stroke",
    "set stroke width",
    "set dash",
    "download",
    "upload",
    "save local",
    "load local",
    "set manual",
    "start tour",
    "end tour",
    "debug",
];

impl Action {
    /// The protocol tag of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::CursorMoved { .. } => "cursor moved",
            Action::KeyPress { .. } => "key press",
            Action::Translate { .. } => "translate",
            Action::Scale { .. } => "scale",
            Action::IncreaseScale => "increase scale",
            Action::DecreaseScale => "decrease scale",
            Action::GoHome => "go home",
            Action::Resize { .. } => "resize",
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Clear => "clear",
            Action::ClearBounds => "clear bounds",
            Action::DeleteSelected => "delete selected",
            Action::DeleteLine => "delete line",
            Action::Delete => "delete",
            Action::Nevermind => "nevermind",
            Action::AddLine { .. } => "add line",
            Action::ContinueLine => "continue line",
            Action::AddBound => "add bound",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::IncrementClipboardRotation => "increment clipboard rotation",
            Action::IncrementClipboardMirrorAxis => "increment clipboard mirror axis",
            Action::ToggleMirroring => "toggle mirroring",
            Action::ToggleMirrorAxis1 => "toggle mirror axis 1",
            Action::ToggleMirrorAxis2 => "toggle mirror axis 2",
            Action::ToggleMirrorType => "toggle mirror type",
            Action::ToggleMirrorMethod => "toggle mirror method",
            Action::TogglePartials => "toggle partials",
            Action::SetStroke { .. } => "set stroke",
            Action::SetStrokeWidth { .. } => "set stroke width",
            Action::SetDash { .. } => "set dash",
            Action::Download { .. } => "download",
            Action::Upload { .. } => "upload",
            Action::SaveLocal { .. } => "save local",
            Action::LoadLocal { .. } => "load local",
            Action::SetManual(_) => "set manual",
            Action::StartTour => "start tour",
            Action::EndTour => "end tour",
            Action::Debug => "debug",
        }
    }

    /// High-frequency actions that debug logging skips.
    pub fn is_noisy(&self) -> bool {
        matches!(
            self,
            Action::CursorMoved { .. } | Action::Translate { .. } | Action::Scale { .. }
        )
    }

    /// Build an action that needs no payload from its tag, e.g. for key
    /// bindings. Returns `None` for unknown tags and for actions whose
    /// payload is required.
    pub fn from_tag(tag: &str) -> Option<Action> {
        let mut record = serde_json::Map::new();
        record.insert("action".to_string(), Value::String(tag.to_string()));
        serde_json::from_value(Value::Object(record)).ok()
    }

    /// Decode an action record, telling unknown tags apart from bad payloads.
    pub fn parse(json: &str) -> Result<Action, ActionError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ActionError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Action, ActionError> {
        let tag = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| ActionError::Malformed("missing \"action\" tag".to_string()))?;
        if !ACTION_NAMES.contains(&tag) {
            return Err(ActionError::Unknown(tag.to_string()));
        }
        let tag = tag.to_string();
        serde_json::from_value(value).map_err(|e| ActionError::Malformed(format!("{tag}: {e}")))
    }
}
