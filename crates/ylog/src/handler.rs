//! The [`Handler`] abstraction, the [`Record`]s passed to handlers, and [`HandlerSet`], which
//! fans a record out to multiple handlers.

mod file;
mod forward;

use std::{borrow::Cow, fmt};

pub use self::{
    file::{ERROR_FILE_NAME, FileHandler, INFO_FILE_NAME, Sink},
    forward::TracingHandler,
};
use super::{CallSite, Context, Field, Level, LoggerError, Value, message::resolve_message};

/// A single log call, as passed to [`Handler::log`].
///
/// The message is kept as a format string and positional arguments until a handler decides to
/// log the record, so that filtered records cost no formatting work.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    level: Level,
    context: &'a Context,
    call_site: CallSite,
    format: &'a str,
    args: &'a [Value],
    fields: &'a [Field],
}

impl<'a> Record<'a> {
    /// Creates a record without additional fields.
    pub fn new(
        level: Level,
        context: &'a Context,
        call_site: CallSite,
        format: &'a str,
        args: &'a [Value],
    ) -> Self {
        Self {
            level,
            context,
            call_site,
            format,
            args,
            fields: &[],
        }
    }

    /// Attaches structured fields to the record.
    #[must_use]
    pub fn with_fields(mut self, fields: &'a [Field]) -> Self {
        self.fields = fields;
        self
    }

    /// The level of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The context the record was logged with.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Where the record was logged from.
    pub fn call_site(&self) -> CallSite {
        self.call_site
    }

    /// The unresolved format string.
    pub fn format(&self) -> &'a str {
        self.format
    }

    /// The positional arguments for the format string.
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// The structured fields of the record.
    pub fn fields(&self) -> &'a [Field] {
        self.fields
    }

    /// Resolves the message from the format string and arguments.
    ///
    /// See [`resolve_message`] for the rules.
    pub fn message(&self) -> Cow<'a, str> {
        resolve_message(self.format, self.args)
    }
}

/// A destination for log records.
///
/// Implementations must be safe to call from multiple threads at once, and must never fail,
/// panic or exit from [`Handler::log`], regardless of the level of the record.
pub trait Handler: Send + Sync + fmt::Debug {
    /// A short name identifying the handler in errors.
    fn name(&self) -> &str;

    /// Writes or forwards the record, if its level passes the handler's threshold.
    fn log(&self, record: &Record<'_>);

    /// Flushes and releases the resources held by the handler.
    ///
    /// Records logged after closing are dropped. Closing an already closed handler succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered records could not be flushed.
    fn close(&self) -> Result<(), LoggerError>;
}

/// A list of handlers, each of which receives every record.
///
/// A [`HandlerSet`] is itself a [`Handler`], so sets can be nested.
#[derive(Debug, Default)]
pub struct HandlerSet {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerSet {
    /// Creates a set from handlers, in the order they receive records.
    pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { handlers }
    }

    /// Adds a handler after the existing ones.
    pub fn push(&mut self, handler: impl Handler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Adds a handler after the existing ones.
    #[must_use]
    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.push(handler);
        self
    }

    /// The number of handlers in the set.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the set contains no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Handler for HandlerSet {
    fn name(&self) -> &str {
        "handler_set"
    }

    /// Passes the record to every handler, in registration order.
    fn log(&self, record: &Record<'_>) {
        for handler in &self.handlers {
            handler.log(record);
        }
    }

    /// Closes every handler in registration order, including the handlers after one which
    /// failed to close.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Close`] naming every handler which failed to close.
    fn close(&self) -> Result<(), LoggerError> {
        let mut failures = Vec::new();

        for handler in &self.handlers {
            if let Err(error) = handler.close() {
                tracing::warn!(handler = handler.name(), %error, "Failed to close log handler");
                failures.push((handler.name().to_string(), error));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CloseError { failures }.into())
        }
    }
}

/// The handlers of a [`HandlerSet`] which failed to close, with their errors.
#[derive(Debug)]
pub struct CloseError {
    failures: Vec<(String, LoggerError)>,
}

impl CloseError {
    /// The names of the handlers which failed to close, with their errors, in registration order.
    pub fn failures(&self) -> &[(String, LoggerError)] {
        &self.failures
    }
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to close {} log handler(s):", self.failures.len())?;
        for (name, error) in &self.failures {
            write!(f, " [{name}: {error}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for CloseError {}
