use {
    crate::error::StdLogError,
    std::{fmt, str::FromStr},
};

/// Severity of a log record.
///
/// Levels carry the conventional numeric values (`DEBUG` is 10, `CRITICAL`
/// is 50) and are ordered by them, so `Level::Info > Level::Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Detailed diagnostics, usually only of interest while debugging.
    #[default]
    Debug = 10,
    /// Confirmation that things are working as expected.
    Info = 20,
    /// Something unexpected happened, but the program keeps working.
    Warning = 30,
    /// A function could not be performed.
    Error = 40,
    /// The program itself may be unable to continue.
    Critical = 50,
}

impl Level {
    /// Every level, least severe first.
    pub const ALL: [Level; 5] = [Level::Debug, Level::Info, Level::Warning, Level::Error, Level::Critical];

    /// Upper-case level name as it appears in file records.
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// First letter of the level name, used by console reports.
    pub fn initial(self) -> char {
        match self {
            Level::Debug => 'D',
            Level::Info => 'I',
            Level::Warning => 'W',
            Level::Error => 'E',
            Level::Critical => 'C',
        }
    }

    /// Numeric severity, e.g. 20 for `INFO`.
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Look up a level by its exact numeric value.
    pub fn from_value(value: u32) -> Option<Level> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = StdLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u32>() {
            return Level::from_value(value).ok_or_else(|| StdLogError::InvalidLevel(s.to_string()));
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" | "FATAL" => Ok(Level::Critical),
            _ => Err(StdLogError::InvalidLevel(s.to_string())),
        }
    }
}

#[cfg(feature = "tracing")]
impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}
