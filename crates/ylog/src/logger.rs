//! The [`Logger`] type and the process-wide default logger.

use std::sync::{Arc, OnceLock};

use super::{
    CallSite, Config, Context, FileHandler, Handler, HandlerSet, Level, LoggerError, Record,
    TracingHandler, Value,
};

/// Exit status of the process after [`Logger::log_and_exit`].
const FATAL_EXIT_CODE: i32 = 1;

/// The user-facing logger, which passes every call to its [`HandlerSet`].
///
/// Cloning a logger is cheap; clones share the same handlers. Loggers created separately are
/// fully independent of each other.
#[derive(Clone, Debug)]
pub struct Logger {
    handlers: Arc<HandlerSet>,
}

impl Logger {
    /// Creates a logger from the configuration, or from [`Config::default`] if none is provided
    /// (console output only, at the `debug` level).
    ///
    /// # Errors
    ///
    /// Returns an error if a handler fails to initialize, see [`FileHandler::new`].
    pub fn new(config: Option<Config>) -> Result<Self, LoggerError> {
        let config = config.unwrap_or_default();

        let mut handlers = HandlerSet::default();
        handlers.push(FileHandler::new(&config.file_config)?);
        if config.forward_to_tracing {
            handlers.push(TracingHandler::new(Level::parse(
                &config.file_config.level_string,
            )));
        }

        Ok(Self::with_handlers(handlers))
    }

    /// Creates a logger passing every call to the specified handlers.
    pub fn with_handlers(handlers: HandlerSet) -> Self {
        Self {
            handlers: Arc::new(handlers),
        }
    }

    /// The handlers of this logger.
    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Passes a record to every handler.
    pub fn emit(&self, record: &Record<'_>) {
        self.handlers.log(record);
    }

    /// Passes a record to every handler, then panics with the record's message.
    ///
    /// # Panics
    ///
    /// Always panics, after the record has been passed to the handlers.
    #[allow(clippy::panic)]
    pub fn emit_and_panic(&self, record: &Record<'_>) -> ! {
        self.emit(record);
        panic!("{}", record.message())
    }

    /// Passes a record to every handler, closes all handlers, then terminates the process with
    /// exit status `1`.
    pub fn emit_and_exit(&self, record: &Record<'_>) -> ! {
        self.emit(record);
        if let Err(error) = self.close() {
            tracing::error!(%error, "Failed to close log handlers before exiting");
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Logs a message at the specified level.
    ///
    /// This only records the message, even for [`Level::Panic`] and [`Level::Fatal`]; use
    /// [`Logger::log_and_panic`] or [`Logger::log_and_exit`] to escalate.
    #[track_caller]
    pub fn log(&self, ctx: &Context, level: Level, format: &str, args: &[Value]) {
        self.emit(&Record::new(level, ctx, CallSite::caller(), format, args));
    }

    /// Logs a message at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, ctx: &Context, format: &str, args: &[Value]) {
        self.log(ctx, Level::Debug, format, args);
    }

    /// Logs a message at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, ctx: &Context, format: &str, args: &[Value]) {
        self.log(ctx, Level::Info, format, args);
    }

    /// Logs a message at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, ctx: &Context, format: &str, args: &[Value]) {
        self.log(ctx, Level::Warn, format, args);
    }

    /// Logs a message at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, ctx: &Context, format: &str, args: &[Value]) {
        self.log(ctx, Level::Error, format, args);
    }

    /// Logs a message at [`Level::Panic`], then panics with the message.
    ///
    /// # Panics
    ///
    /// Always panics, after the message has been logged.
    #[track_caller]
    pub fn log_and_panic(&self, ctx: &Context, format: &str, args: &[Value]) -> ! {
        self.emit_and_panic(&Record::new(Level::Panic, ctx, CallSite::caller(), format, args))
    }

    /// Logs a message at [`Level::Fatal`], closes all handlers, then terminates the process with
    /// exit status `1`.
    #[track_caller]
    pub fn log_and_exit(&self, ctx: &Context, format: &str, args: &[Value]) -> ! {
        self.emit_and_exit(&Record::new(Level::Fatal, ctx, CallSite::caller(), format, args))
    }

    /// Closes all handlers of this logger, and of every clone of it.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Close`] naming every handler which failed to close.
    pub fn close(&self) -> Result<(), LoggerError> {
        self.handlers.close()
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Initializes the process-wide default logger from the configuration, or from
/// [`Config::default`] if none is provided.
///
/// This should be the first thing the process does before logging through the default logger.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if the default logger has already been set, or
/// any error from [`Logger::new`].
pub fn init(config: Option<Config>) -> Result<(), LoggerError> {
    if DEFAULT_LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    set_default(Logger::new(config)?)
}

/// Sets the process-wide default logger.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if the default logger has already been set; the
/// existing logger is kept.
pub fn set_default(logger: Logger) -> Result<(), LoggerError> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_rejected| LoggerError::AlreadyInitialized)
}

/// The process-wide default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized with [`init`] or [`set_default`].
#[allow(clippy::panic)]
pub fn default_logger() -> &'static Logger {
    match DEFAULT_LOGGER.get() {
        Some(logger) => logger,
        None => panic!(
            "The default logger was used before it was initialized; call `ylog::init()` first"
        ),
    }
}

/// The process-wide default logger, if it has been initialized.
pub fn try_default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Logs a message at the specified level with the default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn log(ctx: &Context, level: Level, format: &str, args: &[Value]) {
    default_logger().log(ctx, level, format, args);
}

/// Logs a message at [`Level::Debug`] with the default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn debug(ctx: &Context, format: &str, args: &[Value]) {
    default_logger().debug(ctx, format, args);
}

/// Logs a message at [`Level::Info`] with the default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn info(ctx: &Context, format: &str, args: &[Value]) {
    default_logger().info(ctx, format, args);
}

/// Logs a message at [`Level::Warn`] with the default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn warn(ctx: &Context, format: &str, args: &[Value]) {
    default_logger().warn(ctx, format, args);
}

/// Logs a message at [`Level::Error`] with the default logger.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn error(ctx: &Context, format: &str, args: &[Value]) {
    default_logger().error(ctx, format, args);
}

/// Logs a message at [`Level::Panic`] with the default logger, then panics with the message.
///
/// # Panics
///
/// Always panics.
#[track_caller]
pub fn log_and_panic(ctx: &Context, format: &str, args: &[Value]) -> ! {
    default_logger().log_and_panic(ctx, format, args)
}

/// Logs a message at [`Level::Fatal`] with the default logger, closes its handlers, then
/// terminates the process.
///
/// # Panics
///
/// Panics if the default logger has not been initialized.
#[track_caller]
pub fn log_and_exit(ctx: &Context, format: &str, args: &[Value]) -> ! {
    default_logger().log_and_exit(ctx, format, args)
}

/// Closes the handlers of the default logger. Does nothing if it has not been initialized.
///
/// # Errors
///
/// Returns [`LoggerError::Close`] naming every handler which failed to close.
pub fn close() -> Result<(), LoggerError> {
    try_default_logger().map_or(Ok(()), Logger::close)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        panic::{self, AssertUnwindSafe},
    };

    use super::*;
    use crate::{FileConfig, JsonEncoder, Sink, test_utils::SharedBuffer};

    fn memory_logger(level: Level) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let handler = FileHandler::from_sinks(
            level,
            JsonEncoder::new(HashMap::new()).unwrap(),
            vec![Sink::new("memory", Level::Debug, buffer.clone())],
        );
        (
            Logger::with_handlers(HandlerSet::default().with(handler)),
            buffer,
        )
    }

    #[test]
    fn level_methods_record_their_level_and_caller() {
        let (logger, buffer) = memory_logger(Level::Debug);
        let ctx = Context::background().with_trace_id("trace_xxxx");

        logger.debug(&ctx, "d", &[]);
        logger.info(&ctx, "i", &[]);
        let warn_line = line!() + 1;
        logger.warn(&ctx, "w", &[]);
        logger.error(&ctx, "e", &[]);
        logger.log(&ctx, Level::Fatal, "f", &[]);

        let records = buffer.records();
        let levels: Vec<&str> = records
            .iter()
            .map(|record| record["level"].as_str().unwrap())
            .collect();
        assert_eq!(levels, ["debug", "info", "warn", "error", "fatal"]);
        assert_eq!(
            records[2]["caller"],
            format!("logger.rs:{warn_line}({})", CallSite::UNKNOWN_FUNCTION)
        );
        assert!(records.iter().all(|record| record["trace_id"] == "trace_xxxx"));
    }

    #[test]
    fn console_only_logger_writes_hello_world() {
        let console = SharedBuffer::default();
        let handler =
            FileHandler::with_console(&FileConfig::console_only(), console.clone()).unwrap();
        let logger = Logger::with_handlers(HandlerSet::default().with(handler));

        logger.info(&Context::background(), "hello %s", &[Value::from("world")]);
        logger.close().unwrap();

        let records = console.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "hello world");
        assert_eq!(records[0]["trace_id"], "");
    }

    #[test]
    fn loggers_are_isolated() {
        let (logger_a, buffer_a) = memory_logger(Level::Debug);
        let (logger_b, buffer_b) = memory_logger(Level::Error);
        let ctx = Context::background();

        logger_a.info(&ctx, "this is (A) info msg, hello %s", &[Value::from("world")]);
        logger_b.info(&ctx, "this is (B) info msg, hello %s", &[Value::from("world")]);

        assert_eq!(buffer_a.records().len(), 1);
        assert!(buffer_b.contents().is_empty());
    }

    #[test]
    fn clones_share_handlers() {
        let (logger, buffer) = memory_logger(Level::Debug);
        let clone = logger.clone();

        clone.close().unwrap();
        logger.info(&Context::background(), "after close", &[]);

        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn escalation_is_recorded_before_panicking() {
        let (logger, buffer) = memory_logger(Level::Debug);
        let ctx = Context::background();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            logger.log_and_panic(&ctx, "invariant %s broken", &[Value::from("x")]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("invariant x broken")
        );
        let records = buffer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "panic");
    }

    #[test]
    fn forwarding_to_tracing_adds_a_handler() {
        let logger = Logger::new(Some(Config {
            forward_to_tracing: true,
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(logger.handlers().len(), 2);
        logger.close().unwrap();
    }
}
