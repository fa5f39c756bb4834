//! The application root: owns the current state and everything mutable
//! around it, and feeds actions through the dispatcher.

use crate::action::Action;
use crate::dispatch::{DispatchError, Dispatcher, Session};
use crate::history::History;
use crate::input::{InputEvent, InputMapper};
use crate::options::Options;
use crate::render::{Palette, RenderView};
use crate::state::State;
use crate::storage::{MemoryStorage, Storage};

/// A drawing session with one current state.
pub struct Editor {
    state: State,
    dispatcher: Dispatcher,
    session: Session,
    input: InputMapper,
    palette: Palette,
}

impl Editor {
    /// Editor with in-memory save slots.
    pub fn new(options: Options) -> Self {
        Self::with_storage(options, Box::new(MemoryStorage::new()))
    }

    pub fn with_storage(options: Options, storage: Box<dyn Storage>) -> Self {
        let state = State::from_options(&options);
        let session = Session::new(History::new(options.max_undo_amt), storage);
        let palette = Palette::from_options(&options);
        Self {
            state,
            dispatcher: Dispatcher::new(options),
            session,
            input: InputMapper::new(),
            palette,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn options(&self) -> &Options {
        self.dispatcher.options()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn history(&self) -> &History<State> {
        &self.session.history
    }

    pub fn storage(&self) -> &dyn Storage {
        self.session.storage()
    }

    /// Apply one action and return the new current state.
    pub fn dispatch(&mut self, action: &Action) -> &State {
        self.state = self.dispatcher.dispatch(&self.state, action, &mut self.session);
        &self.state
    }

    /// Apply a JSON action record.
    pub fn dispatch_json(&mut self, json: &str) -> &State {
        self.state = self
            .dispatcher
            .dispatch_json(&self.state, json, &mut self.session);
        &self.state
    }

    /// Translate a platform event into actions and apply them in order.
    pub fn handle_input(&mut self, event: &InputEvent) -> &State {
        for action in self.input.map(event, &self.state) {
            self.state = self.dispatcher.dispatch(&self.state, &action, &mut self.session);
        }
        &self.state
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView::build(&self.state)
    }

    /// The last error a dispatch absorbed, if any, clearing it.
    pub fn take_error(&mut self) -> Option<DispatchError> {
        self.session.take_error()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use kurbo::Point;

    #[test]
    fn test_click_click_draws_line() {
        let mut editor = Editor::default();
        let click = |x, y| {
            [
                InputEvent::PointerMove {
                    position: Point::new(x, y),
                    buttons_held: false,
                },
                InputEvent::PointerDown {
                    position: Point::new(x, y),
                    button: MouseButton::Left,
                },
            ]
        };
        for event in click(21.0, 19.0).iter().chain(click(81.0, 42.0).iter()) {
            editor.handle_input(event);
        }

        let lines = &editor.state().lines;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, Point::new(1.0, 1.0));
        assert_eq!(lines[0].end, Point::new(4.0, 2.0));
        // Opening and committing each record a snapshot.
        assert_eq!(editor.history().undo_len(), 2);
    }

    #[test]
    fn test_json_and_undo() {
        let mut editor = Editor::default();
        editor.dispatch_json(r#"{"action": "cursor moved", "x": 40, "y": 40}"#);
        editor.dispatch_json(r#"{"action": "add bound"}"#);
        assert_eq!(editor.state().bounds.len(), 1);

        editor.dispatch(&Action::Undo);
        assert!(editor.state().bounds.is_empty());
        assert!(editor.history().can_redo());
    }

    #[test]
    fn test_errors_are_taken_once() {
        let mut editor = Editor::default();
        editor.dispatch(&Action::LoadLocal { name: "missing".into() });
        assert!(editor.take_error().is_some());
        assert!(editor.take_error().is_none());
    }

    #[test]
    fn test_view_follows_state() {
        let mut editor = Editor::default();
        editor.dispatch(&Action::CursorMoved { x: 40.0, y: 60.0 });
        assert_eq!(editor.view().cursor, Point::new(40.0, 60.0));
    }
}
