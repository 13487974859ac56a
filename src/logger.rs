use {
    crate::{error::StdLogError, handler::Handler, level::Level, record::Record},
    std::{
        collections::HashMap,
        fmt::{self, Display},
        sync::{Arc, PoisonError, RwLock},
    },
};

/// A named logger: a severity threshold plus an ordered list of handlers.
///
/// Handlers are only ever appended. Every logging method returns the first
/// error raised by a handler, after giving every accepting handler the
/// record.
pub struct Logger {
    name: String,
    level: RwLock<Level>,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
}

impl Logger {
    /// Create a logger with no handlers and the default `DEBUG` threshold.
    ///
    /// Most callers should go through [`Registry::get_logger`] instead, so
    /// that one name maps to one logger.
    pub fn new(name: &str) -> Self {
        Logger {
            name: name.to_string(),
            level: RwLock::new(Level::default()),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// The name this logger was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current threshold.
    pub fn level(&self) -> Level {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the threshold. Records less severe than `level` are dropped
    /// before they reach any handler.
    pub fn set_level(&self, level: Level) {
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Whether a record at `level` passes the logger threshold.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Append a handler. Adding the same kind of handler twice emits every
    /// record twice.
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// A snapshot of the attached handlers, in the order they were added.
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Pass an already-built record to every handler that accepts its level.
    /// The logger threshold is not consulted here.
    pub fn handle(&self, record: &Record) -> Result<(), StdLogError> {
        let handlers = self.handlers();
        let mut first_err = None;
        for handler in handlers.iter().filter(|h| h.accepts(record.level())) {
            if let Err(err) = handler.emit(record) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Log `message` at `level` from the caller's location.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl Display) -> Result<(), StdLogError> {
        if !self.is_enabled_for(level) {
            return Ok(());
        }
        self.handle(&Record::new(&self.name, level, message.to_string()))
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) -> Result<(), StdLogError> {
        self.log(Level::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) -> Result<(), StdLogError> {
        self.log(Level::Info, message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) -> Result<(), StdLogError> {
        self.log(Level::Warning, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) -> Result<(), StdLogError> {
        self.log(Level::Error, message)
    }

    #[track_caller]
    pub fn critical(&self, message: impl Display) -> Result<(), StdLogError> {
        self.log(Level::Critical, message)
    }

    /// Flush every handler.
    /// # Returns
    /// The first flush error, after every handler has been flushed.
    pub fn flush(&self) -> Result<(), StdLogError> {
        let mut first_err = None;
        for handler in self.handlers() {
            if let Err(err) = handler.flush() {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handlers.read().unwrap_or_else(PoisonError::into_inner).len())
            .finish()
    }
}

/// Named loggers for one process.
///
/// Create one at startup and pass it by reference to whatever sets up or
/// looks up loggers. Dropping the registry flushes every handler it holds.
#[derive(Debug, Default)]
pub struct Registry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The logger called `name`, created with no handlers and the default
    /// threshold on first request.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.get(name) {
            return logger;
        }
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::new(name)))
            .clone()
    }

    /// The logger called `name`, if it was already created.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Names of every logger created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Flush every handler of every logger.
    pub fn flush(&self) -> Result<(), StdLogError> {
        let loggers: Vec<Arc<Logger>> = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut first_err = None;
        for logger in loggers {
            if let Err(err) = logger.flush() {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            eprintln!("Failed to flush log handlers: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::handler::{tests::SharedBuffer, ConsoleHandler},
    };

    struct FailingHandler;

    impl Handler for FailingHandler {
        fn emit(&self, _record: &Record) -> Result<(), StdLogError> {
            Err(StdLogError::InternalError("sink is gone".to_string()))
        }
    }

    fn console(buffer: &SharedBuffer) -> Arc<dyn Handler> {
        Arc::new(ConsoleHandler::with_writer(Box::new(buffer.clone())))
    }

    #[test]
    fn registry_returns_same_logger_for_a_name() {
        let registry = Registry::new();
        let a = registry.get_logger("session");
        let b = registry.get_logger("session");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(registry.get("other").is_none());
        registry.get_logger("other");
        assert_eq!(registry.names(), vec!["other".to_string(), "session".to_string()]);
    }

    #[test]
    fn threshold_drops_less_severe_records() {
        let buffer = SharedBuffer::default();
        let logger = Logger::new("demo");
        logger.add_handler(console(&buffer));
        logger.set_level(Level::Warning);

        logger.info("ignored").unwrap();
        logger.warning("kept").unwrap();
        logger.critical(format_args!("also {}", "kept")).unwrap();

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("W ") && lines[0].ends_with(" - kept"));
        assert!(lines[1].starts_with("C ") && lines[1].ends_with(" - also kept"));
    }

    #[test]
    fn handlers_accumulate() {
        let buffer = SharedBuffer::default();
        let logger = Logger::new("demo");
        logger.add_handler(console(&buffer));
        logger.add_handler(console(&buffer));
        logger.debug("twice").unwrap();
        assert_eq!(buffer.contents().lines().count(), 2);
        assert_eq!(logger.handlers().len(), 2);
    }

    #[test]
    fn failing_handler_does_not_starve_the_rest() {
        let buffer = SharedBuffer::default();
        let logger = Logger::new("demo");
        logger.add_handler(Arc::new(FailingHandler));
        logger.add_handler(console(&buffer));

        let result = logger.error("still reported");
        assert!(matches!(result, Err(StdLogError::InternalError(_))));
        assert!(buffer.contents().ends_with(" - still reported\n"));
    }

    #[test]
    fn logger_is_shared_across_threads() {
        let buffer = SharedBuffer::default();
        let registry = Registry::new();
        registry.get_logger("threads").add_handler(console(&buffer));

        std::thread::scope(|scope| {
            for n in 0..4 {
                let logger = registry.get_logger("threads");
                scope.spawn(move || {
                    for i in 0..25 {
                        logger.info(format_args!("worker {n} record {i}")).unwrap();
                    }
                });
            }
        });

        let contents = buffer.contents();
        assert_eq!(contents.lines().count(), 100);
        assert!(contents.lines().all(|line| line.starts_with("I ")));
    }
}
