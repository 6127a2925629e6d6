//! Severity levels understood by the logger.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::LoggerError;

/// Severity of a log record, ordered from least to most severe.
///
/// The numeric ranks start at `1`; there is no variant for `0`, so an unset level cannot be
/// represented, and [`Level::try_from`] rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Verbose diagnostic output.
    Debug = 1,

    /// Routine operational messages.
    Info = 2,

    /// Something unexpected that the application can recover from.
    Warn = 3,

    /// A failed operation.
    Error = 4,

    /// A failure after which the calling path is expected to panic.
    Panic = 5,

    /// A failure after which the process is expected to exit.
    Fatal = 6,
}

impl Level {
    /// All levels, in increasing order of severity.
    pub const ALL: [Self; 6] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Panic,
        Self::Fatal,
    ];

    /// Returns the lowercase name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Returns the numeric rank of the level.
    #[allow(clippy::as_conversions)] // Fieldless `repr(u8)` enum
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Parses a lowercase level name, falling back to [`Level::Debug`] for anything that is not
    /// a known level name (including the empty string).
    ///
    /// Use [`str::parse`] instead when an unknown name should be an error.
    ///
    /// ```
    /// use ylog::Level;
    ///
    /// assert_eq!(Level::parse("warn"), Level::Warn);
    /// assert_eq!(Level::parse("verbose"), Level::Debug);
    /// ```
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .unwrap_or(Self::Debug)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| LoggerError::UnknownLevel(s.to_owned()))
    }
}

impl TryFrom<u8> for Level {
    type Error = LoggerError;

    fn try_from(rank: u8) -> Result<Self, LoggerError> {
        Self::ALL
            .into_iter()
            .find(|level| level.rank() == rank)
            .ok_or(LoggerError::InvalidLevel(rank))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}
