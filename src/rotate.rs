use {
    crate::error::StdLogError,
    regex::Regex,
    std::{
        fs,
        io::{self, Write as _},
        path::{Path, PathBuf},
    },
};

/// Defines size thresholds for rotating log files in various units.
///
/// * `Bytes` - Direct byte count (e.g., 1048576 bytes)
/// * `KB` - Kilobytes (1 KB = 1024 bytes)
/// * `MB` - Megabytes (1 MB = 1024 KB)
/// * `GB` - Gigabytes (1 GB = 1024 MB)
///
/// A size of zero disables rotation.
///
/// # Examples
/// ```
/// use stdlog::{RotatingFileBuilder, RotationSize};
///
/// let dir = tempfile::tempdir().unwrap();
/// let file = RotatingFileBuilder::new(dir.path(), "large.log".as_ref())
///     .max_size(RotationSize::MB(100))
///     .backup_count(5)
///     .build()
///     .unwrap();
/// assert!(file.rotation_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSize {
    /// Raw byte count
    Bytes(u64),
    /// Kilobytes (1 KB = 1024 bytes)
    KB(u64),
    /// Megabytes (1 MB = 1024 KB = 1,048,576 bytes)
    MB(u64),
    /// Gigabytes (1 GB = 1024 MB = 1,073,741,824 bytes)
    GB(u64),
}

impl RotationSize {
    /// Get the threshold in bytes.
    pub fn bytes(&self) -> u64 {
        match self {
            RotationSize::Bytes(b) => *b,
            RotationSize::KB(kb) => kb * 1024,
            RotationSize::MB(mb) => mb * 1024 * 1024,
            RotationSize::GB(gb) => gb * 1024 * 1024 * 1024,
        }
    }
}

impl Default for RotationSize {
    fn default() -> Self {
        RotationSize::Bytes(0)
    }
}

/// Configuration for a rotating file.
#[derive(Debug, Clone)]
struct RotatingFileMeta {
    /// The directory where the log files are stored.
    directory: PathBuf,
    /// The name of the active log file. Backups append `.1`, `.2`, ...
    filename: PathBuf,
    /// Rollover begins when the active file would reach this many bytes.
    max_bytes: u64,
    /// The number of numbered backups to keep.
    backup_count: usize,
}

impl RotatingFileMeta {
    fn curr_log_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.filename.to_string_lossy(), index))
    }

    /// Both a size limit and at least one backup are needed for rollover.
    fn rotation_enabled(&self) -> bool {
        self.max_bytes > 0 && self.backup_count > 0
    }

    /// Open the active log file for appending, creating it if needed.
    fn create_log_file(&self, log_path: &Path) -> Result<fs::File, StdLogError> {
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)
            .map_err(|err| StdLogError::CreateFileFailed(log_path.to_path_buf(), err.to_string()))
    }

    fn rename(from: &Path, to: &Path) -> Result<(), StdLogError> {
        fs::rename(from, to).map_err(|err| StdLogError::RenameFileError {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: err.to_string(),
        })
    }

    fn remove_if_exists(path: &Path) -> Result<(), StdLogError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StdLogError::RemoveFileError {
                path: path.to_path_buf(),
                error: err.to_string(),
            }),
        }
    }

    /// Shift the numbered backups up by one and move the active file to
    /// `.1`. Whatever sat at `.backup_count` is overwritten.
    fn shift_backups(&self) -> Result<(), StdLogError> {
        for idx in (1..self.backup_count).rev() {
            let source_file = self.backup_path(idx);
            let target_file = self.backup_path(idx + 1);
            if source_file.exists() {
                Self::remove_if_exists(&target_file)?;
                Self::rename(&source_file, &target_file)?;
            }
        }

        let first_backup = self.backup_path(1);
        Self::remove_if_exists(&first_backup)?;
        let curr_log_path = self.curr_log_path();
        if curr_log_path.exists() {
            Self::rename(&curr_log_path, &first_backup)?;
        }
        Ok(())
    }
}

/// An append-only log file that rolls over by size.
///
/// Before each record is written, the file checks whether the record would
/// bring it to `max_bytes`. If so, and the file is not empty, the active
/// file becomes `<name>.1`, older backups move up one number, and a fresh
/// active file is opened. At most `backup_count` backups are kept, so the
/// directory never holds more than `backup_count + 1` files for this log.
///
/// When either `max_bytes` or `backup_count` is zero, rollover never
/// happens and the file grows without bound.
pub struct RotatingFile {
    meta: RotatingFileMeta,
    writer: fs::File,
    curr_file_size_bytes: u64,
    /// Set when the active file was moved to `.1` but a fresh one could not
    /// be opened; `writer` then still points at the backup.
    reopen_pending: bool,
}

impl RotatingFile {
    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.meta.curr_log_path()
    }

    /// Rollover threshold in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.meta.max_bytes
    }

    pub fn backup_count(&self) -> usize {
        self.meta.backup_count
    }

    /// Whether rollover can ever happen for this file.
    pub fn rotation_enabled(&self) -> bool {
        self.meta.rotation_enabled()
    }

    /// Bytes currently in the active file, including whatever it held when
    /// it was opened.
    pub fn current_size(&self) -> u64 {
        self.curr_file_size_bytes
    }

    /// Check if writing `incoming` more bytes should first roll the file
    /// over. An empty file never rolls over.
    pub fn should_rollover(&self, incoming: u64) -> bool {
        self.meta.rotation_enabled()
            && self.curr_file_size_bytes > 0
            && self.curr_file_size_bytes + incoming >= self.meta.max_bytes
    }

    /// Roll the active file over to `.1` and reopen a fresh one.
    ///
    /// If the backups were shifted but the fresh file cannot be created, the
    /// error is returned and the reopen is retried before the next write, so
    /// no record lands in the backup.
    pub fn rollover(&mut self) -> Result<(), StdLogError> {
        self.writer.flush()?;
        self.meta.shift_backups()?;
        self.curr_file_size_bytes = 0;
        self.reopen_pending = true;
        self.reopen()
    }

    /// Open a fresh active file. Only swaps the writer once the file exists.
    fn reopen(&mut self) -> Result<(), StdLogError> {
        let curr_log_path = self.meta.curr_log_path();
        let writer = self.meta.create_log_file(&curr_log_path)?;
        self.curr_file_size_bytes = writer.metadata().map_or(0, |m| m.len());
        self.writer = writer;
        self.reopen_pending = false;
        Ok(())
    }

    /// Write one complete record, rolling over first if needed.
    pub fn write_record(&mut self, record: &[u8]) -> Result<(), StdLogError> {
        if self.reopen_pending {
            self.reopen()?;
        }
        if self.should_rollover(record.len() as u64) {
            self.rollover()?;
        }
        self.writer.write_all(record)?;
        self.writer.flush()?;
        self.curr_file_size_bytes += record.len() as u64;
        Ok(())
    }

    /// Existing numbered backups of this log, ordered `.1`, `.2`, ...
    pub fn backup_files(&self) -> Result<Vec<PathBuf>, StdLogError> {
        let file_pattern = Regex::new(&format!(
            r"^{}\.(\d+)$",
            regex::escape(&self.meta.filename.to_string_lossy())
        ))
        .map_err(|err| StdLogError::InternalError(err.to_string()))?;

        let mut backups = Vec::new();
        for file in fs::read_dir(&self.meta.directory)?.flatten() {
            if !file.metadata().map(|m| m.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(file_name) = file.file_name().to_str() {
                if let Some(index) = file_pattern
                    .captures(file_name)
                    .and_then(|caps| caps[1].parse::<usize>().ok())
                {
                    backups.push((index, file.path()));
                }
            }
        }
        backups.sort_by_key(|(index, _)| *index);
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }
}

#[allow(clippy::io_other_error)]
impl io::Write for RotatingFile {
    /// Each call is treated as one record for rollover purposes.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Provides a fluent interface for configuring a [`RotatingFile`].
///
/// # Default Configuration
///
/// * No size limit (`max_bytes` of zero)
/// * No backups
///
/// With these defaults the file is a plain append-only log.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use stdlog::RotatingFileBuilder;
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut file = RotatingFileBuilder::new(dir.path(), "app.log".as_ref())
///     .max_bytes(1024)
///     .backup_count(3)
///     .build()
///     .unwrap();
/// writeln!(file, "first record").unwrap();
/// ```
pub struct RotatingFileBuilder {
    meta: RotatingFileMeta,
}

impl RotatingFileBuilder {
    /// Create a new builder.
    /// # Arguments
    /// * `directory` - The directory where the log files are stored. It must
    ///   already exist.
    /// * `filename` - The name of the active log file.
    pub fn new(directory: &Path, filename: &Path) -> Self {
        RotatingFileBuilder {
            meta: RotatingFileMeta {
                directory: directory.to_path_buf(),
                filename: filename.to_path_buf(),
                max_bytes: 0,
                backup_count: 0,
            },
        }
    }

    /// Set the rollover threshold in bytes.
    pub fn max_bytes(self, max_bytes: u64) -> Self {
        Self {
            meta: RotatingFileMeta { max_bytes, ..self.meta },
        }
    }

    /// Set the rollover threshold in any [`RotationSize`] unit.
    pub fn max_size(self, size: RotationSize) -> Self {
        self.max_bytes(size.bytes())
    }

    /// Set the number of numbered backups to keep.
    pub fn backup_count(self, backup_count: usize) -> Self {
        Self {
            meta: RotatingFileMeta {
                backup_count,
                ..self.meta
            },
        }
    }

    /// Open the active log file.
    pub fn build(self) -> Result<RotatingFile, StdLogError> {
        let curr_file_path = self.meta.curr_log_path();
        let writer = self.meta.create_log_file(&curr_file_path)?;
        let curr_file_size_bytes = writer.metadata().map_or(0, |m| m.len());
        Ok(RotatingFile {
            meta: self.meta,
            writer,
            curr_file_size_bytes,
            reopen_pending: false,
        })
    }
}
