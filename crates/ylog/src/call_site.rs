//! The source location a log call originates from.

use std::{fmt, panic::Location};

/// The source location of a log call.
///
/// A call site is captured once, at the outermost public entry point (the logging macros or a
/// `#[track_caller]` method), and is carried unchanged through every layer down to the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    function: &'static str,
}

impl CallSite {
    /// Function name recorded when it cannot be determined.
    pub const UNKNOWN_FUNCTION: &'static str = "?";

    /// Creates a call site from its parts.
    ///
    /// The logging macros call this with `file!()`, `line!()` and `module_path!()`.
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// The location of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    /// The source file, as given at construction.
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// The line number in the source file.
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// The enclosing function or module path.
    pub const fn function(&self) -> &'static str {
        self.function
    }

    fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), Self::UNKNOWN_FUNCTION)
    }
}

/// Formats the call site as `file:line(function)`, with the file reduced to its base name.
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.file_name(), self.line, self.function)
    }
}
