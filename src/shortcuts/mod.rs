//! Keyboard shortcut system.
//!
//! This module provides:
//! - Key combinations parsed once into structured modifiers + key
//! - Deterministic first-match dispatch in registration order
//! - Conflict and reserved-combination detection
//! - User overrides persisted through the settings store
//! - Platform-aware display formatting
//!
//! # Example
//!
//! ```ignore
//! use desktop_kit::shortcuts::{KeyEvent, ShortcutBinding, ShortcutManager};
//!
//! let manager = ShortcutManager::new(store);
//! let registration = manager.register(ShortcutBinding::parse("save", "Mod+S", save)?);
//! if !registration.is_clean() {
//!     // keys already taken by registration.conflicts
//! }
//!
//! let mut event = KeyEvent::new("s").with_meta();
//! manager.handle_key_event(&mut event); // runs `save`
//! ```

mod event;
mod manager;
mod persistence;
mod registry;
mod types;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;



pub use event::{FocusTarget, KeyEvent};

pub use types::{canonicalize_key, KeyCombo, Modifiers, Platform, ShortcutParseError};

pub use registry::{
    is_reserved, Registration, ShortcutAction, ShortcutBinding, ShortcutRegistry,
    RESERVED_SHORTCUTS,
};

pub use persistence::{InvalidOverride, ShortcutOverrides, SHORTCUT_OVERRIDES_KEY};

pub use manager::{ShortcutEntry, ShortcutError, ShortcutGuard, ShortcutManager};
