//! Undo/redo history.
//!
//! - `command` - paired execute/undo actions
//! - `stack` - the bounded history stack
//! - `keybindings` - `Mod+Z` / `Mod+Shift+Z` wiring into the shortcut manager

mod command;
mod keybindings;
mod stack;


pub use command::Command;
pub use keybindings::{bind_history_shortcuts, history_bindings, REDO_BINDING_ID, UNDO_BINDING_ID};
pub use stack::{CommandPhase, HistoryError, HistoryStack};
