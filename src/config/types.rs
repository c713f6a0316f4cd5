//! Settings type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::defaults::*;

// ============================================
// HISTORY SETTINGS
// ============================================

/// Settings for the undo/redo history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySettings {
    /// Maximum number of undoable commands kept (default: 50)
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: usize,
}

fn default_max_stack_size() -> usize {
    DEFAULT_MAX_STACK_SIZE
}

impl Default for HistorySettings {
    fn default() -> Self {
        HistorySettings {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        }
    }
}

impl HistorySettings {
    /// Configured size clamped to [`MIN_MAX_STACK_SIZE`].
    pub fn effective_max_stack_size(&self) -> usize {
        self.max_stack_size.max(MIN_MAX_STACK_SIZE)
    }
}

// ============================================
// SETTINGS
// ============================================

/// Root settings object stored under [`SETTINGS_KEY`].
///
/// Keys owned by other parts of the application are carried through
/// untouched in `extra` so saving never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
