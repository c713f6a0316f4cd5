//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Store key holding the settings object
pub const SETTINGS_KEY: &str = "settings";

/// Default number of undoable commands kept in history
pub const DEFAULT_MAX_STACK_SIZE: usize = 50;

/// Smallest history size honored; lower configured values are clamped up
pub const MIN_MAX_STACK_SIZE: usize = 1;
