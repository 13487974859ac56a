use {
    crate::{
        error::StdLogError,
        format::{ConsoleFormatter, FileFormatter, TimeZone},
        handler::{ConsoleHandler, ConsoleTarget, FileHandler},
        level::Level,
        logger::{Logger, Registry},
        rotate::{RotatingFileBuilder, RotationSize},
    },
    std::{
        fs,
        path::{Path, PathBuf},
        sync::Arc,
    },
};

/// Name of the log directory created under the working directory.
pub const LOG_DIR_BASE: &str = ".logs";

/// Threshold used when setup is not given a level.
pub const DEFAULT_LOGGING_LEVEL: Level = Level::Debug;

/// Settings for one logger's console and file handlers.
#[derive(Debug, Clone)]
struct LoggingSetupMeta {
    logger_name: String,
    /// Log file is `<log_path>/<file_name_base>.log`.
    file_name_base: Option<String>,
    /// Defaults to `<cwd>/.logs`.
    log_path: Option<PathBuf>,
    level: Level,
    max_bytes: u64,
    backup_count: usize,
    time_zone: TimeZone,
    console: ConsoleTarget,
}

/// Provides a fluent interface for attaching the standard console and file
/// handlers to a named logger.
///
/// # Default Configuration
///
/// * Log file named after the logger, in `<cwd>/.logs`
/// * `DEBUG` threshold
/// * No rollover (`max_bytes` and `backup_count` of zero)
/// * Timestamps in the local time zone
/// * Console reports on standard error
///
/// Rollover only happens when both `max_bytes` and `backup_count` are
/// non-zero, so a rotating setup generally wants `backup_count` of at least
/// one.
///
/// Installing twice for the same logger name attaches a second pair of
/// handlers; callers that may repeat setup must guard against it.
///
/// # Examples
///
/// ```rust
/// use stdlog::{Level, LoggingSetup, Registry};
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = Registry::new();
/// let logger = LoggingSetup::new("bluesky-session")
///     .log_path(dir.path())
///     .level(Level::Info)
///     .max_bytes(1024 * 1024)
///     .backup_count(5)
///     .install(&registry)
///     .unwrap();
/// logger.info("session started").unwrap();
/// assert!(dir.path().join("bluesky-session.log").exists());
/// ```
#[derive(Debug, Clone)]
pub struct LoggingSetup {
    meta: LoggingSetupMeta,
}

impl LoggingSetup {
    pub fn new(logger_name: &str) -> Self {
        LoggingSetup {
            meta: LoggingSetupMeta {
                logger_name: logger_name.to_string(),
                file_name_base: None,
                log_path: None,
                level: DEFAULT_LOGGING_LEVEL,
                max_bytes: 0,
                backup_count: 0,
                time_zone: TimeZone::default(),
                console: ConsoleTarget::default(),
            },
        }
    }

    /// Set the log file's base name; `.log` is appended.
    pub fn file_name_base(self, file_name_base: &str) -> Self {
        Self {
            meta: LoggingSetupMeta {
                file_name_base: Some(file_name_base.to_string()),
                ..self.meta
            },
        }
    }

    /// Set the directory that holds the log file.
    pub fn log_path<P: AsRef<Path>>(self, log_path: P) -> Self {
        Self {
            meta: LoggingSetupMeta {
                log_path: Some(log_path.as_ref().to_path_buf()),
                ..self.meta
            },
        }
    }

    /// Set the logger's threshold.
    pub fn level(self, level: Level) -> Self {
        Self {
            meta: LoggingSetupMeta { level, ..self.meta },
        }
    }

    /// Set the rollover threshold in bytes.
    pub fn max_bytes(self, max_bytes: u64) -> Self {
        Self {
            meta: LoggingSetupMeta { max_bytes, ..self.meta },
        }
    }

    /// Set the rollover threshold in any [`RotationSize`] unit.
    pub fn max_size(self, size: RotationSize) -> Self {
        self.max_bytes(size.bytes())
    }

    /// Set the number of numbered backups (`.1`, `.2`, ...) to keep.
    pub fn backup_count(self, backup_count: usize) -> Self {
        Self {
            meta: LoggingSetupMeta {
                backup_count,
                ..self.meta
            },
        }
    }

    /// Set the time zone both handlers render timestamps in.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self {
            meta: LoggingSetupMeta { time_zone, ..self.meta },
        }
    }

    /// Set the stream console reports go to.
    pub fn console(self, console: ConsoleTarget) -> Self {
        Self {
            meta: LoggingSetupMeta { console, ..self.meta },
        }
    }

    /// Set the logger's threshold and attach a console handler followed by a
    /// file handler.
    ///
    /// The log directory and file are created before the logger is touched,
    /// so a failure there leaves the logger as it was.
    pub fn install(self, registry: &Registry) -> Result<Arc<Logger>, StdLogError> {
        let meta = self.meta;
        let file_handler = build_file_handler(&meta)?;
        let console_handler =
            ConsoleHandler::new(meta.console).with_formatter(ConsoleFormatter::new(meta.time_zone));

        let logger = registry.get_logger(&meta.logger_name);
        logger.set_level(meta.level);
        logger.add_handler(Arc::new(console_handler));
        logger.add_handler(Arc::new(file_handler));
        Ok(logger)
    }
}

fn build_file_handler(meta: &LoggingSetupMeta) -> Result<FileHandler, StdLogError> {
    let log_path = match &meta.log_path {
        Some(log_path) => log_path.clone(),
        None => default_log_path()?,
    };
    ensure_log_dir(&log_path)?;

    let file_name_base = meta.file_name_base.as_deref().unwrap_or(&meta.logger_name);
    let file = RotatingFileBuilder::new(&log_path, Path::new(&format!("{file_name_base}.log")))
        .max_bytes(meta.max_bytes)
        .backup_count(meta.backup_count)
        .build()?;
    Ok(FileHandler::from_rotating_file(file).with_formatter(FileFormatter::new(meta.time_zone)))
}

/// `<cwd>/.logs`
pub fn default_log_path() -> Result<PathBuf, StdLogError> {
    let cwd = std::env::current_dir().map_err(|err| StdLogError::CurrentDirUnavailable(err.to_string()))?;
    Ok(cwd.join(LOG_DIR_BASE))
}

/// Create the log directory if it doesn't exist. An existing directory is
/// reused; an existing non-directory is an error.
pub fn ensure_log_dir(log_path: &Path) -> Result<(), StdLogError> {
    if log_path.exists() {
        if log_path.is_dir() {
            return Ok(());
        }
        return Err(StdLogError::NotADirectory(log_path.to_path_buf()));
    }
    fs::create_dir_all(log_path)
        .map_err(|err| StdLogError::CreateDirectoryFailed(log_path.to_path_buf(), err.to_string()))
}

/// Terse console handler on standard error.
pub fn console_report_handler() -> ConsoleHandler {
    ConsoleHandler::default()
}

/// Verbose file handler writing `<log_path>/<file_name_base>.log`.
///
/// `file_name_base` defaults to `logger_name` and `log_path` to
/// `<cwd>/.logs`; the directory is created if needed.
pub fn file_report_handler(
    logger_name: &str,
    file_name_base: Option<&str>,
    max_bytes: u64,
    backup_count: usize,
    log_path: Option<&Path>,
) -> Result<FileHandler, StdLogError> {
    let mut setup = LoggingSetup::new(logger_name)
        .max_bytes(max_bytes)
        .backup_count(backup_count);
    if let Some(file_name_base) = file_name_base {
        setup = setup.file_name_base(file_name_base);
    }
    if let Some(log_path) = log_path {
        setup = setup.log_path(log_path);
    }
    build_file_handler(&setup.meta)
}

/// Attach the standard handlers to `logger_name` with every default.
pub fn standard_logging_setup(registry: &Registry, logger_name: &str) -> Result<Arc<Logger>, StdLogError> {
    LoggingSetup::new(logger_name).install(registry)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::handler::Handler, crate::record::Record};

    #[test]
    fn defaults() {
        let setup = LoggingSetup::new("demo");
        assert_eq!(setup.meta.level, Level::Debug);
        assert_eq!(setup.meta.max_bytes, 0);
        assert_eq!(setup.meta.backup_count, 0);
        assert!(setup.meta.file_name_base.is_none());
        assert!(setup.meta.log_path.is_none());
    }

    #[test]
    fn ensure_log_dir_creates_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join(".logs");
        ensure_log_dir(&log_path).unwrap();
        assert!(log_path.is_dir());
        ensure_log_dir(&log_path).unwrap();
    }

    #[test]
    fn ensure_log_dir_rejects_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let collision = dir.path().join("taken");
        fs::write(&collision, "not a directory").unwrap();
        assert!(matches!(ensure_log_dir(&collision), Err(StdLogError::NotADirectory(_))));
    }

    #[test]
    fn failed_install_leaves_logger_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let collision = dir.path().join("taken");
        fs::write(&collision, "").unwrap();

        let registry = Registry::new();
        let result = LoggingSetup::new("demo")
            .log_path(&collision)
            .level(Level::Error)
            .install(&registry);
        assert!(matches!(result, Err(StdLogError::NotADirectory(_))));
        assert!(registry.get("demo").is_none());
    }

    #[test]
    fn file_report_handler_names_file_after_logger() {
        let dir = tempfile::tempdir().unwrap();
        let handler = file_report_handler("session", None, 0, 0, Some(dir.path())).unwrap();
        assert_eq!(handler.path(), dir.path().join("session.log"));

        let handler = file_report_handler("session", Some("custom"), 0, 0, Some(dir.path())).unwrap();
        handler.emit(&Record::new("session", Level::Info, "x")).unwrap();
        assert!(dir.path().join("custom.log").exists());
    }
}
