//! Desktop Kit - undo/redo history and rebindable keyboard shortcuts
//!
//! This library provides the application-services core of a desktop shell:
//! a bounded command history and a shortcut manager whose user overrides
//! persist through an asynchronous settings store.

pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod logging;
pub mod shortcuts;
pub mod store;
