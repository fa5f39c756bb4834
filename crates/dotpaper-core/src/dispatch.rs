//! The action dispatcher: one entry point from actions to the next state.

use crate::action::{Action, ActionError};
use crate::codec::{self, CodecError};
use crate::history::History;
use crate::keymap::Keymap;
use crate::options::Options;
use crate::reduce;
use crate::state::State;
use crate::storage::{MemoryStorage, Storage, StorageError};
use kurbo::{Point, Size, Vec2};
use log::{debug, info, warn};
use std::collections::HashSet;
use thiserror::Error;

/// A recoverable failure while applying an action.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Mutable collaborators owned by the application root: undo history, the
/// save slots, and the last error a dispatch absorbed.
pub struct Session {
    pub history: History<State>,
    storage: Box<dyn Storage>,
    last_error: Option<DispatchError>,
}

impl Session {
    pub fn new(history: History<State>, storage: Box<dyn Storage>) -> Self {
        Self {
            history,
            storage,
            last_error: None,
        }
    }

    /// Session with in-memory save slots.
    pub fn in_memory(max_undo: usize) -> Self {
        Self::new(History::new(max_undo), Box::new(MemoryStorage::new()))
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn last_error(&self) -> Option<&DispatchError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<DispatchError> {
        self.last_error.take()
    }
}

/// Applies actions to states. Holds only configuration; everything mutable
/// lives in the [`Session`] passed to each call.
pub struct Dispatcher {
    options: Options,
    keymap: Keymap,
    reversible: HashSet<String>,
}

impl Dispatcher {
    /// Build a dispatcher from options. Key bindings that fail to parse or
    /// name an unbindable action are skipped with a warning.
    pub fn new(options: Options) -> Self {
        let mut keymap = Keymap::new();
        for (chord, tag) in &options.keybindings {
            if let Err(e) = keymap.bind_tag(chord, tag) {
                warn!("Ignoring key binding {chord:?} -> {tag:?}: {e}");
            }
        }
        Self::with_keymap(options, keymap)
    }

    pub fn with_keymap(options: Options, keymap: Keymap) -> Self {
        let reversible = options.reversible_actions.iter().cloned().collect();
        Self {
            options,
            keymap,
            reversible,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Whether `action` records an undo snapshot.
    pub fn is_reversible(&self, action: &Action) -> bool {
        self.reversible.contains(action.name())
    }

    /// Apply `action` to `state`. Never fails: errors are logged, kept in
    /// the session, and the unchanged state is returned.
    pub fn dispatch(&self, state: &State, action: &Action, session: &mut Session) -> State {
        if state.debug && !action.is_noisy() {
            debug!("dispatch {:?} on {}", action, state.summary());
        }

        match self.apply(state, action, session) {
            Ok(next) => {
                if self.is_reversible(action) {
                    session.history.push(state.clone());
                }
                next
            }
            Err(e) => {
                warn!("{} failed: {}", action.name(), e);
                session.last_error = Some(e);
                state.clone()
            }
        }
    }

    /// Decode and apply an action record. Unknown tags are a logged no-op.
    pub fn dispatch_json(&self, state: &State, json: &str, session: &mut Session) -> State {
        match Action::parse(json) {
            Ok(action) => self.dispatch(state, &action, session),
            Err(ActionError::Unknown(tag)) => {
                warn!("Unknown action: {tag}");
                state.clone()
            }
            Err(e) => {
                warn!("{e}");
                session.last_error = Some(e.into());
                state.clone()
            }
        }
    }

    fn apply(&self, state: &State, action: &Action, session: &mut Session) -> Result<State, DispatchError> {
        let s = state.clone();
        let next = match action {
            Action::CursorMoved { x, y } => reduce::cursor_moved(s, Point::new(*x, *y)),
            Action::KeyPress { key, modifiers } => match self.keymap.resolve(key, *modifiers) {
                // Bindings never target key presses, so this recurses once.
                Some(bound) => self.dispatch(state, bound, session),
                None => s,
            },

            Action::Translate { x, y } => reduce::translate(s, Vec2::new(*x, *y)),
            Action::Scale { amt, amtx, amty, cx, cy } => {
                let delta = match amt {
                    Some(amt) => {
                        let d = reduce::scroll_zoom(&s, *amt);
                        Vec2::new(d, d)
                    }
                    None => Vec2::new(*amtx, *amty),
                };
                let center = match (cx, cy) {
                    (None, None) => None,
                    _ => Some(Point::new(cx.unwrap_or(s.cursor.x), cy.unwrap_or(s.cursor.y))),
                };
                reduce::scale(s, delta, center)
            }
            Action::IncreaseScale => reduce::increase_scale(s),
            Action::DecreaseScale => reduce::decrease_scale(s),
            Action::GoHome => reduce::go_home(s, self.options.home_scale()),
            Action::Resize { width, height } => reduce::resize(s, Size::new(*width, *height)),

            Action::Left => reduce::move_cursor(s, -1.0, 0.0),
            Action::Right => reduce::move_cursor(s, 1.0, 0.0),
            Action::Up => reduce::move_cursor(s, 0.0, -1.0),
            Action::Down => reduce::move_cursor(s, 0.0, 1.0),

            Action::Clear => reduce::clear(s),
            Action::ClearBounds => reduce::clear_bounds(s),
            Action::DeleteSelected => reduce::delete_selected(s),
            Action::DeleteLine => reduce::erase_line(s),
            Action::Delete => reduce::erase(s),
            Action::Nevermind => reduce::nevermind(s),

            Action::AddLine { continues } => reduce::add_line(s, *continues),
            Action::ContinueLine => reduce::continue_line(s),
            Action::AddBound => reduce::add_bound(s),

            Action::Undo => session
                .history
                .undo(s)
                .map(|prev| keep_host(prev, state))
                .unwrap_or_else(|| {
                    debug!("Nothing to undo");
                    state.clone()
                }),
            Action::Redo => session
                .history
                .redo(s)
                .map(|next| keep_host(next, state))
                .unwrap_or_else(|| {
                    debug!("Nothing to redo");
                    state.clone()
                }),

            Action::Copy => reduce::copy(s),
            Action::Cut => reduce::cut(s),
            Action::Paste => reduce::paste(s),
            Action::IncrementClipboardRotation => reduce::increment_clipboard_rotation(s),
            Action::IncrementClipboardMirrorAxis => reduce::increment_clipboard_mirror(s),

            Action::ToggleMirroring => reduce::toggle_mirroring(s),
            Action::ToggleMirrorAxis1 => reduce::toggle_mirror_axis(s),
            Action::ToggleMirrorAxis2 => reduce::toggle_mirror_axis2(s),
            Action::ToggleMirrorType => reduce::toggle_mirror_type(s),
            Action::ToggleMirrorMethod => reduce::toggle_mirror_method(s),
            Action::TogglePartials => reduce::toggle_partials(s),

            Action::SetStroke { color } => reduce::set_stroke(s, *color),
            Action::SetStrokeWidth { width } => reduce::set_stroke_width(s, *width),
            Action::SetDash { dash } => reduce::set_dash(s, *dash),

            Action::Download { name } => {
                let file = codec::file_name(name);
                session.storage.save(&file, &codec::serialize(&s)?)?;
                info!("Downloaded drawing to {file}");
                s
            }
            Action::Upload { text } => codec::deserialize(text)?.apply(s),
            Action::SaveLocal { name } => {
                session.storage.save(name.trim(), &codec::serialize(&s)?)?;
                info!("Saved drawing {:?}", name.trim());
                s
            }
            Action::LoadLocal { name } => {
                let text = session.storage.load(name.trim())?;
                codec::deserialize(&text)?.apply(s)
            }
            Action::SetManual(partial) => {
                partial.validate().map_err(CodecError::from)?;
                partial.clone().apply(s)
            }

            Action::StartTour => {
                session.history.stash_tour(s.clone());
                reduce::start_tour(s, self.options.home_scale())
            }
            Action::EndTour => session.history.take_tour().unwrap_or_else(|| {
                warn!("end tour without a tour in progress");
                state.clone()
            }),
            Action::Debug => {
                info!("{:#?}", s);
                s
            }
        };
        Ok(next)
    }
}

/// History snapshots carry the drawing, not the host window.
fn keep_host(mut snapshot: State, current: &State) -> State {
    snapshot.mobile = current.mobile;
    if snapshot.viewport != current.viewport {
        reduce::resize(snapshot, current.viewport)
    } else {
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Modifiers;
    use crate::line::{Line, LineStyle};

    fn setup() -> (Dispatcher, Session, State) {
        let options = Options::default();
        let session = Session::in_memory(options.max_undo_amt);
        let state = State::from_options(&options);
        (Dispatcher::new(options), session, state)
    }

    #[test]
    fn test_reversible_pushes_history() {
        let (dispatcher, mut session, state) = setup();
        let next = dispatcher.dispatch(&state, &Action::AddLine { continues: false }, &mut session);
        assert!(next.cur_line.is_some());
        assert!(session.history.can_undo());

        let moved = dispatcher.dispatch(&next, &Action::CursorMoved { x: 5.0, y: 5.0 }, &mut session);
        assert_eq!(session.history.undo_len(), 1);

        let undone = dispatcher.dispatch(&moved, &Action::Undo, &mut session);
        assert_eq!(undone, state);
    }

    #[test]
    fn test_empty_undo_is_noop() {
        let (dispatcher, mut session, state) = setup();
        assert_eq!(dispatcher.dispatch(&state, &Action::Undo, &mut session), state);
        assert_eq!(dispatcher.dispatch(&state, &Action::Redo, &mut session), state);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_key_press_resolves_binding() {
        let (dispatcher, mut session, state) = setup();
        let press = Action::KeyPress {
            key: "m".to_string(),
            modifiers: Modifiers::default(),
        };
        let next = dispatcher.dispatch(&state, &press, &mut session);
        assert!(next.symmetry.mirroring);

        let shift = Action::KeyPress {
            key: "Shift".to_string(),
            modifiers: Modifiers {
                shift: true,
                ..Default::default()
            },
        };
        assert_eq!(dispatcher.dispatch(&state, &shift, &mut session), state);
    }

    #[test]
    fn test_key_press_to_reversible_action_records_once() {
        let (dispatcher, mut session, state) = setup();
        let press = Action::KeyPress {
            key: "b".to_string(),
            modifiers: Modifiers::default(),
        };
        let next = dispatcher.dispatch(&state, &press, &mut session);
        assert_eq!(next.bounds.len(), 1);
        assert_eq!(session.history.undo_len(), 1);
    }

    #[test]
    fn test_unknown_json_action() {
        let (dispatcher, mut session, state) = setup();
        let next = dispatcher.dispatch_json(&state, r#"{"action": "toggle dark mode"}"#, &mut session);
        assert_eq!(next, state);
        assert!(session.last_error().is_none());

        let next = dispatcher.dispatch_json(&state, r#"{"action": "translate", "x": true}"#, &mut session);
        assert_eq!(next, state);
        assert!(matches!(session.take_error(), Some(DispatchError::Action(_))));
    }

    #[test]
    fn test_scale_with_amount_and_center() {
        let (dispatcher, mut session, state) = setup();
        let zoom = Action::Scale {
            amt: Some(-100.0),
            amtx: 0.0,
            amty: 0.0,
            cx: Some(0.0),
            cy: Some(0.0),
        };
        let next = dispatcher.dispatch(&state, &zoom, &mut session);
        // -(-100) * 0.1 = +10 pixels per cell.
        assert!((next.camera.scale.x - 30.0).abs() < 1e-9);
        assert_eq!(next.camera.translation, Vec2::ZERO);
    }

    #[test]
    fn test_save_and_load_local() {
        let (dispatcher, mut session, mut state) = setup();
        state.lines.push(Line::new(Point::ZERO, Point::new(2.0, 0.0), LineStyle::default()));

        let saved = dispatcher.dispatch(&state, &Action::SaveLocal { name: " mine ".into() }, &mut session);
        assert_eq!(saved, state);
        assert!(session.storage().exists("mine").unwrap());

        let blank = State::default();
        let loaded = dispatcher.dispatch(&blank, &Action::LoadLocal { name: "mine".into() }, &mut session);
        assert_eq!(loaded.lines, state.lines);
    }

    #[test]
    fn test_load_missing_slot_is_recorded() {
        let (dispatcher, mut session, state) = setup();
        let next = dispatcher.dispatch(&state, &Action::LoadLocal { name: "nope".into() }, &mut session);
        assert_eq!(next, state);
        assert!(matches!(
            session.take_error(),
            Some(DispatchError::Storage(StorageError::NotFound(_)))
        ));
        assert!(!session.history.can_undo());
    }

    #[test]
    fn test_download_adds_extension() {
        let (dispatcher, mut session, state) = setup();
        dispatcher.dispatch(&state, &Action::Download { name: "art".into() }, &mut session);
        assert!(session.storage().exists("art.svg").unwrap());
    }

    #[test]
    fn test_upload_rejects_invalid() {
        let (dispatcher, mut session, state) = setup();
        let upload = Action::Upload {
            text: "<!-- {\"scalex\": 0} -->".into(),
        };
        let next = dispatcher.dispatch(&state, &upload, &mut session);
        assert_eq!(next, state);
        assert!(matches!(session.take_error(), Some(DispatchError::Codec(CodecError::Invalid(_)))));
    }

    #[test]
    fn test_upload_clamps_scale() {
        let (dispatcher, mut session, state) = setup();
        let upload = Action::Upload {
            text: "<!-- {\"scalex\": 1000, \"scaley\": 0.01} -->".into(),
        };
        let next = dispatcher.dispatch(&state, &upload, &mut session);
        assert!(session.last_error().is_none());
        assert!((next.camera.scale.x - 150.0).abs() < 1e-9);
        assert!((next.camera.scale.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_upload_keeps_cursor_on_lattice() {
        let (dispatcher, mut session, state) = setup();
        let state = dispatcher.dispatch(&state, &Action::CursorMoved { x: 100.0, y: 100.0 }, &mut session);
        let upload = Action::Upload {
            text: "<!-- {\"translationx\": 7} -->".into(),
        };
        let state = dispatcher.dispatch(&state, &upload, &mut session);
        let next = dispatcher.dispatch(&state, &Action::AddBound, &mut session);

        let point = next.bounds.points()[0];
        assert!((point.x - point.x.round()).abs() < 1e-9);
        assert!((point.y - point.y.round()).abs() < 1e-9);
        assert_eq!(point, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_undo_keeps_viewport() {
        let (dispatcher, mut session, state) = setup();
        let drawn = dispatcher.dispatch(&state, &Action::AddLine { continues: false }, &mut session);
        let mut resized = dispatcher.dispatch(
            &drawn,
            &Action::Resize {
                width: 1600.0,
                height: 1200.0,
            },
            &mut session,
        );
        resized.mobile = true;

        let undone = dispatcher.dispatch(&resized, &Action::Undo, &mut session);
        assert!(undone.cur_line.is_none());
        assert_eq!(undone.viewport, Size::new(1600.0, 1200.0));
        assert!(undone.mobile);

        let redone = dispatcher.dispatch(&undone, &Action::Redo, &mut session);
        assert!(redone.cur_line.is_some());
        assert_eq!(redone.viewport, Size::new(1600.0, 1200.0));
    }

    #[test]
    fn test_end_tour_without_start() {
        let (dispatcher, mut session, state) = setup();
        assert_eq!(dispatcher.dispatch(&state, &Action::EndTour, &mut session), state);
    }

    #[test]
    fn test_bad_keybinding_skipped() {
        let mut options = Options::default();
        options.keybindings.insert("hyper+q".into(), "undo".into());
        options.keybindings.insert("q".into(), "fly".into());
        let expected = options.keybindings.len() - 2;
        let dispatcher = Dispatcher::new(options);
        assert_eq!(dispatcher.keymap().len(), expected);
    }
}
