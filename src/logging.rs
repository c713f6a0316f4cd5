//! Structured JSONL logging plus human-readable stderr output.
//!
//! - **JSONL to file** (`<data-dir>/logs/desktop-kit.jsonl`) for tooling
//! - **Compact to stderr** for developers
//!
//! ```rust,ignore
//! use desktop_kit::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&data_dir.join("logs"));
//! tracing::info!(binding_id = "history.undo", "Shortcut triggered");
//! ```
//!
//! Each file line is a JSON object:
//! ```json
//! {"timestamp":"2026-01-05T10:30:45.123Z","level":"INFO","target":"desktop_kit::shortcuts::manager","fields":{"message":"Shortcut override saved","binding_id":"save"}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "desktop-kit.jsonl";
const DEFAULT_FILTER: &str = "info";

/// Dropping this guard flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Full path of the JSONL log inside `log_dir`.
pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Initialize the dual-output logging system.
///
/// `RUST_LOG` overrides the default `info` filter. If the log file cannot be
/// opened, file output is discarded and stderr logging still works. Calling
/// this twice keeps the first subscriber.
pub fn init(log_dir: &Path) -> LoggingGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let path = log_path(log_dir);
    let writer: Box<dyn Write + Send> = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            Box::new(std::io::sink())
        }
    };

    // Non-blocking so a slow disk never stalls key handling
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(writer);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::new(Rfc3339))
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init();

    match installed {
        Ok(()) => tracing::info!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %path.display(),
            "Logging initialized"
        ),
        Err(e) => eprintln!("[LOGGING] Subscriber already installed: {}", e),
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}
