//! # stdlog
//!
//! stdlog sets up named loggers the same way every time: **terse reports to
//! the console and verbose records to a log file**, the file kept in a
//! `.logs` directory under the working directory and optionally rolled over
//! by size.
//!
//! A console report is one short line, the first letter of the level, the
//! weekday and the 24-hour time:
//!
//! ```text
//! I Fri-12:43:19.180 - writing to SPEC file: /tmp/20200214-124319.dat
//! ```
//!
//! The same record in the log file carries the diagnostics, separated from
//! the message by vertical bars (timestamp, level, process id, logger name,
//! module, line number and thread name):
//!
//! ```text
//! |2020-02-14 12:43:19.180|INFO|12056|bluesky-session|callbacks|29|main| - writing to SPEC file: /tmp/20200214-124319.dat
//! ```
//!
//! Loggers live in an explicit [`Registry`] owned by the application rather
//! than in global state.
//!
//! ## Example
//!
//! ```rust
//! use stdlog::{Level, LoggingSetup, Registry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    # let dir = tempfile::tempdir()?;
//!    let registry = Registry::new();
//!    let logger = LoggingSetup::new("stdlog-demo")
//!        # .log_path(dir.path())
//!        .level(Level::Info)
//!        .max_bytes(100 * 1024) // Roll over near 100 KB
//!        .backup_count(3) // Keep stdlog-demo.log.1 .. .3
//!        .install(&registry)?;
//!
//!    logger.info("hello")?;
//!    logger.warning(format_args!("{} retries left", 2))?;
//!    logger.debug("below the threshold, not reported")?;
//!
//!    Ok(())
//! }
//! ```
mod error;
mod format;
mod handler;
#[cfg(feature = "tracing")]
mod layer;
mod level;
mod logger;
mod record;
mod rotate;
mod setup;

pub use {
    error::{Result, StdLogError},
    format::{ConsoleFormatter, FileFormatter, Formatter, TimeZone, CONSOLE_DATE_FORMAT, FILE_DATE_FORMAT},
    handler::{ConsoleHandler, ConsoleTarget, FileHandler, Handler},
    level::Level,
    logger::{Logger, Registry},
    record::Record,
    rotate::{RotatingFile, RotatingFileBuilder, RotationSize},
    setup::{
        console_report_handler, default_log_path, ensure_log_dir, file_report_handler, standard_logging_setup,
        LoggingSetup, DEFAULT_LOGGING_LEVEL, LOG_DIR_BASE,
    },
};

#[cfg(feature = "tracing")]
pub use layer::StdLogLayer;
