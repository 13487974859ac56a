use {
    crate::{
        error::StdLogError,
        format::{ConsoleFormatter, FileFormatter, Formatter},
        level::Level,
        record::Record,
        rotate::{RotatingFile, RotatingFileBuilder},
    },
    std::{
        io::{self, Write},
        path::{Path, PathBuf},
        sync::{Mutex, PoisonError},
    },
};

/// A sink that formats and emits records.
///
/// Implementations serialize their own writes, so one handler may be shared
/// by loggers used from many threads.
pub trait Handler: Send + Sync {
    /// Optional per-handler threshold. Records below it are skipped.
    fn level(&self) -> Option<Level> {
        None
    }

    /// Whether this handler accepts a record at `level`.
    fn accepts(&self, level: Level) -> bool {
        self.level().map_or(true, |threshold| level >= threshold)
    }

    /// Format and write one record.
    fn emit(&self, record: &Record) -> Result<(), StdLogError>;

    /// Push buffered output to the destination.
    fn flush(&self) -> Result<(), StdLogError> {
        Ok(())
    }
}

/// Where console reports go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Writes terse one-line reports to a stream, standard error by default.
pub struct ConsoleHandler {
    level: Option<Level>,
    formatter: Box<dyn Formatter>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    /// Report to standard error or standard output.
    pub fn new(target: ConsoleTarget) -> Self {
        match target {
            ConsoleTarget::Stderr => Self::with_writer(Box::new(io::stderr())),
            ConsoleTarget::Stdout => Self::with_writer(Box::new(io::stdout())),
        }
    }

    /// Report to an arbitrary stream.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        ConsoleHandler {
            level: None,
            formatter: Box::new(ConsoleFormatter::default()),
            writer: Mutex::new(writer),
        }
    }

    pub fn with_formatter(self, formatter: impl Formatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            ..self
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        Self {
            level: Some(level),
            ..self
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }
}

impl Handler for ConsoleHandler {
    fn level(&self) -> Option<Level> {
        self.level
    }

    fn emit(&self, record: &Record) -> Result<(), StdLogError> {
        let line = self.formatter.format(record);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StdLogError> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner).flush()?;
        Ok(())
    }
}

/// Appends verbose records to `<directory>/<file_name>`, rolling the file
/// over by size when configured to.
pub struct FileHandler {
    level: Option<Level>,
    formatter: Box<dyn Formatter>,
    file: Mutex<RotatingFile>,
}

impl FileHandler {
    /// Open (or create) the log file and wrap it in a handler.
    /// # Arguments
    /// * `directory` - The directory holding the log file. It must already
    ///   exist.
    /// * `file_name` - The name of the active log file.
    /// * `max_bytes` - Rollover threshold; zero disables rollover.
    /// * `backup_count` - Number of numbered backups to keep; zero disables
    ///   rollover.
    pub fn new(directory: &Path, file_name: &str, max_bytes: u64, backup_count: usize) -> Result<Self, StdLogError> {
        let file = RotatingFileBuilder::new(directory, Path::new(file_name))
            .max_bytes(max_bytes)
            .backup_count(backup_count)
            .build()?;
        Ok(Self::from_rotating_file(file))
    }

    /// Wrap an already-built [`RotatingFile`], using the verbose file
    /// format in the local time zone.
    pub fn from_rotating_file(file: RotatingFile) -> Self {
        FileHandler {
            level: None,
            formatter: Box::new(FileFormatter::default()),
            file: Mutex::new(file),
        }
    }

    pub fn with_formatter(self, formatter: impl Formatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            ..self
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        Self {
            level: Some(level),
            ..self
        }
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.file.lock().unwrap_or_else(PoisonError::into_inner).path()
    }

    /// Existing numbered backups, ordered `.1`, `.2`, ...
    pub fn backup_files(&self) -> Result<Vec<PathBuf>, StdLogError> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner).backup_files()
    }
}

impl Handler for FileHandler {
    fn level(&self) -> Option<Level> {
        self.level
    }

    fn emit(&self, record: &Record) -> Result<(), StdLogError> {
        let mut line = self.formatter.format(record);
        line.push('\n');
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_record(line.as_bytes())
    }

    fn flush(&self) -> Result<(), StdLogError> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner).flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        std::sync::Arc,
    };

    /// A cloneable in-memory stream for capturing console output.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub(crate) Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_handler_writes_one_line_per_record() {
        let buffer = SharedBuffer::default();
        let handler = ConsoleHandler::with_writer(Box::new(buffer.clone()));
        handler.emit(&Record::new("demo", Level::Info, "hello")).unwrap();
        handler.emit(&Record::new("demo", Level::Error, "boom")).unwrap();

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("I ") && lines[0].ends_with(" - hello"));
        assert!(lines[1].starts_with("E ") && lines[1].ends_with(" - boom"));
    }

    #[test]
    fn handler_threshold_filters() {
        let handler = ConsoleHandler::with_writer(Box::new(io::sink())).with_level(Level::Warning);
        assert!(!handler.accepts(Level::Info));
        assert!(handler.accepts(Level::Warning));
        assert!(handler.accepts(Level::Critical));
        assert!(ConsoleHandler::with_writer(Box::new(io::sink())).accepts(Level::Debug));
    }

    #[test]
    fn file_handler_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(dir.path(), "demo.log", 0, 0).unwrap();
        handler.emit(&Record::new("demo", Level::Warning, "first")).unwrap();
        handler.emit(&Record::new("demo", Level::Debug, "second")).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("demo.log")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("|WARNING|") && lines[0].ends_with("| - first"));
        assert!(lines[1].contains("|DEBUG|") && lines[1].ends_with("| - second"));
        assert_eq!(handler.path(), dir.path().join("demo.log"));
    }

    #[test]
    fn file_handler_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileHandler::new(&missing, "demo.log", 0, 0),
            Err(StdLogError::CreateFileFailed(_, _))
        ));
    }
}
