use thiserror::Error;
use tracing::{error, warn};

use crate::history::HistoryError;
use crate::shortcuts::ShortcutError;
use crate::store::StoreError;

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // informational
    Warning, // recoverable, user can retry
    Error,   // operation failed
}

/// Top-level error for callers that drive several services
#[derive(Error, Debug)]
pub enum DesktopKitError {
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DesktopKitError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Shortcut(ShortcutError::Store(_)) => ErrorSeverity::Error,
            Self::Shortcut(_) => ErrorSeverity::Warning,
            Self::History(_) => ErrorSeverity::Info,
            Self::Store(_) => ErrorSeverity::Error,
        }
    }

    /// Message suitable for a shortcut recorder or status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Shortcut(ShortcutError::Reserved { keys }) => {
                format!("{} is reserved by the system, choose another shortcut", keys)
            }
            Self::Shortcut(ShortcutError::Conflict { keys, existing_id }) => {
                format!("{} is already assigned to {}", keys, existing_id)
            }
            Self::Shortcut(ShortcutError::Parse { keys, .. }) => {
                format!("{} is not a valid shortcut", keys)
            }
            Self::Shortcut(e) => format!("Could not save shortcuts: {}", e),
            Self::History(e) => e.to_string(),
            Self::Store(e) => format!("Could not access settings: {}", e),
        }
    }
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use desktop_kit::error::ResultExt;
///
/// // Log and continue if the undo shortcut's command fails
/// history.undo().log_err();
///
/// // Log as warning for best-effort persistence
/// save_settings(store, &settings).await.warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
