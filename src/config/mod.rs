//! Configuration module - application settings read from the settings store
//!
//! This module provides functionality for:
//! - Loading settings from the store under the `settings` key
//! - Default values for all settings
//! - Type definitions for settings structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Settings struct definitions (Settings, HistorySettings)
//! - `loader` - Store loading and saving

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_MAX_STACK_SIZE, MIN_MAX_STACK_SIZE, SETTINGS_KEY};

pub use types::{HistorySettings, Settings};

pub use loader::{load_settings, save_settings};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
