//! Key chords and the table mapping them to actions.

use crate::action::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("Empty key chord")]
    EmptyChord,
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("Action cannot be bound to a key: {0}")]
    UnknownAction(String),
    #[error("Key bindings cannot target another key press")]
    NestedKeyPress,
}

/// Whether `key` names a bare modifier key.
pub fn is_modifier_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "shift" | "control" | "ctrl" | "alt" | "meta" | "os" | "super"
    )
}

fn normalize_key(key: &str) -> String {
    let lower = key.to_lowercase();
    match lower.as_str() {
        "space" | "spacebar" => " ".to_string(),
        "esc" => "escape".to_string(),
        "del" => "delete".to_string(),
        "left" => "arrowleft".to_string(),
        "right" => "arrowright".to_string(),
        "up" => "arrowup".to_string(),
        "down" => "arrowdown".to_string(),
        _ => lower,
    }
}

fn display_key(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        "arrowleft" => "ArrowLeft".to_string(),
        "arrowright" => "ArrowRight".to_string(),
        "arrowup" => "ArrowUp".to_string(),
        "arrowdown" => "ArrowDown".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// A key together with the modifiers held with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// Lowercased key name as reported by the platform (`"z"`, `"escape"`).
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: normalize_key(key),
            modifiers,
        }
    }
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    /// Parse chords such as `"ctrl+shift+z"` or `"Escape"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeymapError::EmptyChord);
        }
        // A trailing "+" is the plus key itself.
        let (rest, key) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None if s == "+" => ("", "+"),
            None => match s.rsplit_once('+') {
                Some((rest, key)) => (rest, key),
                None => ("", s),
            },
        };
        if key.is_empty() {
            return Err(KeymapError::EmptyChord);
        }

        let mut modifiers = Modifiers::default();
        for part in rest.split('+').filter(|p| !p.is_empty()) {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => return Err(KeymapError::UnknownModifier(part.to_string())),
            }
        }
        Ok(Self::new(key.trim_start(), modifiers))
    }
}

impl fmt::Display for KeyChord {
    /// Format the chord for display (e.g., "Ctrl+Shift+Z").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.meta {
            parts.push("Meta".to_string());
        }
        parts.push(display_key(&self.key));
        write!(f, "{}", parts.join("+"))
    }
}

/// Chord to action table, consulted by `key press`.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeyChord, Action)>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a keymap from a chord to action-tag table.
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self, KeymapError> {
        let mut keymap = Self::new();
        for (chord, tag) in table {
            keymap.bind_tag(chord, tag)?;
        }
        Ok(keymap)
    }

    /// Bind `chord` to `action`, replacing an earlier binding of the same
    /// chord. Key presses are never valid targets, so resolution always
    /// stops after one level.
    pub fn bind(&mut self, chord: KeyChord, action: Action) -> Result<(), KeymapError> {
        if matches!(action, Action::KeyPress { .. }) {
            return Err(KeymapError::NestedKeyPress);
        }
        self.bindings.retain(|(existing, _)| *existing != chord);
        self.bindings.push((chord, action));
        Ok(())
    }

    /// Bind a chord string to a payload-free action tag.
    pub fn bind_tag(&mut self, chord: &str, tag: &str) -> Result<(), KeymapError> {
        let chord: KeyChord = chord.parse()?;
        let action =
            Action::from_tag(tag).ok_or_else(|| KeymapError::UnknownAction(tag.to_string()))?;
        self.bind(chord, action)
    }

    /// The action bound to a key event. Bare modifier presses never match.
    pub fn resolve(&self, key: &str, modifiers: Modifiers) -> Option<&Action> {
        if is_modifier_key(key) {
            return None;
        }
        let pressed = KeyChord::new(key, modifiers);
        self.bindings
            .iter()
            .rev()
            .find(|(chord, _)| *chord == pressed)
            .map(|(_, action)| action)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyChord, &Action)> {
        self.bindings.iter().map(|(chord, action)| (chord, action))
    }
}

/// The stock key bindings.
pub fn default_bindings() -> BTreeMap<String, String> {
    [
        ("ctrl+z", "undo"),
        ("ctrl+y", "redo"),
        ("ctrl+shift+z", "redo"),
        ("ctrl+c", "copy"),
        ("ctrl+x", "cut"),
        ("ctrl+v", "paste"),
        ("escape", "nevermind"),
        ("delete", "delete"),
        ("backspace", "delete"),
        ("shift+delete", "delete selected"),
        ("e", "delete line"),
        ("space", "add line"),
        ("enter", "add line"),
        ("c", "continue line"),
        ("b", "add bound"),
        ("shift+b", "clear bounds"),
        ("arrowleft", "left"),
        ("arrowright", "right"),
        ("arrowup", "up"),
        ("arrowdown", "down"),
        ("m", "toggle mirroring"),
        ("a", "toggle mirror axis 1"),
        ("shift+a", "toggle mirror axis 2"),
        ("t", "toggle mirror type"),
        ("shift+m", "toggle mirror method"),
        ("p", "toggle partials"),
        ("r", "increment clipboard rotation"),
        ("f", "increment clipboard mirror axis"),
        ("=", "increase scale"),
        ("-", "decrease scale"),
        ("h", "go home"),
    ]
    .into_iter()
    .map(|(chord, tag)| (chord.to_string(), tag.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_chord() {
        let chord: KeyChord = "ctrl+shift+z".parse().unwrap();
        assert_eq!(chord.key, "z");
        assert!(chord.modifiers.ctrl && chord.modifiers.shift);
        assert!(!chord.modifiers.alt);

        let chord: KeyChord = "Escape".parse().unwrap();
        assert_eq!(chord.key, "escape");
        assert_eq!(chord.modifiers, Modifiers::default());

        let chord: KeyChord = "ctrl++".parse().unwrap();
        assert_eq!(chord.key, "+");
        assert!(chord.modifiers.ctrl);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeyChord>(), Err(KeymapError::EmptyChord));
        assert_eq!(
            "hyper+z".parse::<KeyChord>(),
            Err(KeymapError::UnknownModifier("hyper".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let chord: KeyChord = "shift+ctrl+z".parse().unwrap();
        assert_eq!(chord.to_string(), "Ctrl+Shift+Z");
        let chord: KeyChord = "space".parse().unwrap();
        assert_eq!(chord.to_string(), "Space");
        let chord: KeyChord = "arrowleft".parse().unwrap();
        assert_eq!(chord.to_string(), "ArrowLeft");
    }

    #[test]
    fn test_resolve_matches_modifiers_exactly() {
        let keymap = Keymap::from_table(&default_bindings()).unwrap();
        assert_eq!(keymap.resolve("Z", ctrl()), Some(&Action::Undo));
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };
        assert_eq!(keymap.resolve("Z", ctrl_shift), Some(&Action::Redo));
        assert_eq!(keymap.resolve("z", Modifiers::default()), None);
        assert_eq!(keymap.resolve("ArrowLeft", Modifiers::default()), Some(&Action::Left));
        assert_eq!(keymap.resolve(" ", Modifiers::default()), Some(&Action::AddLine { continues: false }));
    }

    #[test]
    fn test_modifier_keys_ignored() {
        let mut keymap = Keymap::new();
        keymap.bind_tag("ctrl+control", "undo").unwrap();
        assert!(keymap.resolve("Control", ctrl()).is_none());
        assert!(is_modifier_key("Shift"));
        assert!(!is_modifier_key("s"));
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut keymap = Keymap::new();
        keymap.bind_tag("q", "undo").unwrap();
        keymap.bind_tag("Q", "redo").unwrap();
        assert_eq!(keymap.len(), 1);
        assert_eq!(keymap.resolve("q", Modifiers::default()), Some(&Action::Redo));
    }

    #[test]
    fn test_rejects_unbindable_targets() {
        let mut keymap = Keymap::new();
        assert_eq!(
            keymap.bind_tag("q", "cursor moved"),
            Err(KeymapError::UnknownAction("cursor moved".to_string()))
        );
        let nested = Action::KeyPress {
            key: "z".to_string(),
            modifiers: Modifiers::default(),
        };
        assert_eq!(
            keymap.bind(KeyChord::new("q", Modifiers::default()), nested),
            Err(KeymapError::NestedKeyPress)
        );
        assert!(keymap.is_empty());
    }

    #[test]
    fn test_default_table_is_valid() {
        let keymap = Keymap::from_table(&default_bindings()).unwrap();
        assert_eq!(keymap.len(), default_bindings().len());
    }
}
