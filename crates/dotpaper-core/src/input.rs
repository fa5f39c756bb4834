//! Turning normalised pointer, wheel, touch and key events into actions.

use crate::action::Action;
use crate::keymap::Modifiers;
use crate::state::State;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Two-finger pans are scaled down by this factor.
pub const TOUCH_PAN_DIVISOR: f64 = 200.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Input events after platform normalisation. Positions are device
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove { position: Point, buttons_held: bool },
    PointerDown { position: Point, button: MouseButton },
    PointerUp { position: Point, button: MouseButton },
    Wheel { delta: Vec2, modifiers: Modifiers },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    /// `touches` are the fingers still down.
    TouchEnd { touches: Vec<Point> },
    Key { key: String, modifiers: Modifiers },
    Resize { size: Size },
}

/// Tracks gesture state that lives between events but outside the drawing
/// state: whether the mouse is dragging and the last two-finger position.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    dragging: bool,
    gesture: Option<[Point; 2]>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Actions for `event`, to be dispatched in order.
    pub fn map(&mut self, event: &InputEvent, state: &State) -> Vec<Action> {
        match event {
            InputEvent::PointerMove { position, buttons_held } => {
                if *buttons_held {
                    self.dragging = true;
                }
                vec![cursor_moved(*position)]
            }
            InputEvent::PointerDown { button, .. } => vec![match button {
                MouseButton::Left => Action::AddLine { continues: false },
                MouseButton::Middle => Action::Delete,
                MouseButton::Right => Action::ContinueLine,
            }],
            InputEvent::PointerUp { .. } => {
                // Releasing after a drag finishes the stroke the press opened.
                let finished = std::mem::take(&mut self.dragging);
                if finished {
                    vec![Action::AddLine { continues: false }]
                } else {
                    vec![]
                }
            }
            InputEvent::Wheel { delta, modifiers } => vec![if modifiers.shift {
                Action::Translate {
                    x: delta.y,
                    y: delta.x,
                }
            } else if modifiers.ctrl {
                Action::Scale {
                    amt: Some(delta.y),
                    amtx: 0.0,
                    amty: 0.0,
                    cx: None,
                    cy: None,
                }
            } else {
                Action::Translate {
                    x: delta.x,
                    y: delta.y,
                }
            }],
            InputEvent::TouchStart { touches } => {
                let Some(first) = touches.first() else {
                    return vec![];
                };
                let mut actions = vec![cursor_moved(*first)];
                if touches.len() == 1 && state.clipboard.is_none() {
                    actions.push(Action::AddLine { continues: false });
                }
                actions
            }
            InputEvent::TouchMove { touches } => match touches.as_slice() {
                [one] => vec![cursor_moved(*one)],
                [a, b, ..] => {
                    let current = [*a, *b];
                    let previous = self.gesture.replace(current);
                    match previous {
                        Some(previous) => {
                            let delta = (center(previous) - center(current)) / TOUCH_PAN_DIVISOR;
                            vec![
                                Action::Nevermind,
                                Action::Translate {
                                    x: delta.x,
                                    y: delta.y,
                                },
                            ]
                        }
                        None => vec![],
                    }
                }
                [] => vec![],
            },
            InputEvent::TouchEnd { touches } => {
                let was_gesture = self.gesture.is_some();
                if touches.len() < 2 {
                    self.gesture = None;
                }
                if was_gesture || state.clipboard.is_some() {
                    vec![]
                } else {
                    vec![Action::AddLine { continues: false }]
                }
            }
            InputEvent::Key { key, modifiers } => vec![Action::KeyPress {
                key: key.clone(),
                modifiers: *modifiers,
            }],
            InputEvent::Resize { size } => vec![Action::Resize {
                width: size.width,
                height: size.height,
            }],
        }
    }
}

fn cursor_moved(position: Point) -> Action {
    Action::CursorMoved {
        x: position.x,
        y: position.y,
    }
}

fn center(pair: [Point; 2]) -> Point {
    pair[0].midpoint(pair[1])
}
