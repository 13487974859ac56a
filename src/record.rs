use {
    crate::level::Level,
    chrono::{DateTime, Utc},
    std::{panic::Location, path::Path},
};

/// A single log event, created at the log call and shared read-only with
/// every handler that emits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    created: DateTime<Utc>,
    level: Level,
    message: String,
    process_id: u32,
    logger_name: String,
    module: String,
    line: u32,
    thread_name: String,
}

impl Record {
    /// Create a record stamped with the current time, process and thread.
    /// The module and line default to the caller's location.
    #[track_caller]
    pub fn new(logger_name: &str, level: Level, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Record {
            created: Utc::now(),
            level,
            message: message.into(),
            process_id: std::process::id(),
            logger_name: logger_name.to_string(),
            module: module_from_file(location.file()),
            line: location.line(),
            thread_name: current_thread_name(),
        }
    }

    /// Override the source location, for records that originate elsewhere
    /// (e.g. a bridged `tracing` event).
    pub fn with_location(self, module: impl Into<String>, line: u32) -> Self {
        Record {
            module: module.into(),
            line,
            ..self
        }
    }

    /// Override the creation time.
    pub fn with_created(self, created: DateTime<Utc>) -> Self {
        Record { created, ..self }
    }

    /// When the record was created, in UTC. Formatters convert it to their
    /// own time zone.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message text, already formatted.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Id of the process that created the record.
    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Name of the logger the record was logged through.
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Stem of the source file the record was logged from.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Source line the record was logged from.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Name of the thread that created the record, or its id when the
    /// thread has no usable name.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

/// Reduce a source path such as `src/net/conn.rs` to its stem, `conn`.
pub fn module_from_file(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Name of the calling thread. Unnamed or blank-named threads are reported
/// by id, e.g. `ThreadId(7)`, so the value is never empty and never contains
/// whitespace.
fn current_thread_name() -> String {
    let thread = std::thread::current();
    let name = thread
        .name()
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
        .unwrap_or_default();
    if name.is_empty() {
        format!("{:?}", thread.id())
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_caller_location_and_process() {
        let line = line!() + 1;
        let record = Record::new("demo", Level::Info, "hello");
        assert_eq!(record.module(), "record");
        assert_eq!(record.line(), line);
        assert_eq!(record.process_id(), std::process::id());
        assert_eq!(record.logger_name(), "demo");
        assert_eq!(record.message(), "hello");
    }

    #[test]
    fn module_is_file_stem() {
        assert_eq!(module_from_file("src/net/conn.rs"), "conn");
        assert_eq!(module_from_file("main.rs"), "main");
        assert_eq!(module_from_file(""), "unknown");
    }

    #[test]
    fn thread_names_have_no_whitespace() {
        let named = std::thread::Builder::new()
            .name("worker one".to_string())
            .spawn(|| Record::new("demo", Level::Debug, "x").thread_name().to_string())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(named, "worker_one");

        let unnamed = std::thread::spawn(|| Record::new("demo", Level::Debug, "x").thread_name().to_string())
            .join()
            .unwrap();
        assert!(unnamed.starts_with("ThreadId("));

        for blank in ["", "   "] {
            let blank_named = std::thread::Builder::new()
                .name(blank.to_string())
                .spawn(|| Record::new("demo", Level::Debug, "x").thread_name().to_string())
                .unwrap()
                .join()
                .unwrap();
            assert!(blank_named.starts_with("ThreadId("), "{blank:?} gave {blank_named:?}");
        }
    }
}
