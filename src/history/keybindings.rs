//! Undo/redo keyboard shortcuts.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::warn;

use super::stack::HistoryStack;
use crate::error::ResultExt;
use crate::shortcuts::{KeyCombo, Modifiers, ShortcutBinding, ShortcutGuard, ShortcutManager};

pub const UNDO_BINDING_ID: &str = "history.undo";
pub const REDO_BINDING_ID: &str = "history.redo";

/// `Mod+Z` / `Mod+Shift+Z`, both allowed while a text field has focus.
pub fn history_bindings(history: &Rc<RefCell<HistoryStack>>) -> [ShortcutBinding; 2] {
    let undo_target = Rc::downgrade(history);
    let redo_target = Rc::downgrade(history);

    [
        ShortcutBinding::new(
            UNDO_BINDING_ID,
            KeyCombo::new("z", Modifiers::primary()),
            move || {
                with_history(&undo_target, "undo", |h| h.undo().log_err());
            },
        )
        .with_description("Undo")
        .allow_in_input(),
        ShortcutBinding::new(
            REDO_BINDING_ID,
            KeyCombo::new("z", Modifiers::primary().with_shift()),
            move || {
                with_history(&redo_target, "redo", |h| h.redo().log_err());
            },
        )
        .with_description("Redo")
        .allow_in_input(),
    ]
}

/// Registers the history bindings; they stay active while the guards live.
pub fn bind_history_shortcuts(
    shortcuts: &Rc<ShortcutManager>,
    history: &Rc<RefCell<HistoryStack>>,
) -> Vec<ShortcutGuard> {
    history_bindings(history)
        .into_iter()
        .map(|binding| {
            let (registration, guard) = shortcuts.register_scoped(binding);
            if !registration.is_clean() {
                warn!(
                    binding_id = guard.id(),
                    conflicts = ?registration.conflicts,
                    "History shortcut shares keys with another binding"
                );
            }
            guard
        })
        .collect()
}

fn with_history<R>(
    history: &Weak<RefCell<HistoryStack>>,
    action: &str,
    f: impl FnOnce(&mut HistoryStack) -> R,
) -> Option<R> {
    let shared = history.upgrade()?;
    let Ok(mut stack) = shared.try_borrow_mut() else {
        warn!(action, "History busy, ignoring shortcut");
        return None;
    };
    Some(f(&mut stack))
}
