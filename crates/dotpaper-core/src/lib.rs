//! dotpaper core library
//!
//! Platform-agnostic drawing state for a graph-paper doodler: lines snapped
//! to a dot lattice, live symmetry, rectangular selection with a
//! transformable clipboard, and undo history, all driven by named actions.

pub mod action;
pub mod camera;
pub mod clipboard;
pub mod codec;
pub mod color;
pub mod dispatch;
pub mod editor;
pub mod frame;
pub mod history;
pub mod input;
pub mod keymap;
pub mod line;
pub mod options;
pub mod reduce;
pub mod render;
pub mod selection;
pub mod snap;
pub mod state;
pub mod storage;
pub mod symmetry;

pub use action::{Action, ActionError};
pub use camera::Camera;
pub use clipboard::{ClipMirror, ClipRotation, Clipboard};
pub use codec::CodecError;
pub use color::SerializableColor;
pub use dispatch::{DispatchError, Dispatcher, Session};
pub use editor::Editor;
pub use frame::Frame;
pub use history::History;
pub use input::{InputEvent, InputMapper, MouseButton};
pub use keymap::{KeyChord, Keymap, Modifiers};
pub use line::{Line, LineId, LineStyle};
pub use options::Options;
pub use render::{Palette, RenderView};
pub use selection::Bounds;
pub use snap::{POINT_TOLERANCE, snap_to_grid};
pub use state::{PartialState, State};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use symmetry::{MirrorAxis, MirrorMethod, MirrorType, SymmetryConfig};
