//! `ylog` is a context-aware structured logging facade.
//!
//! Application code logs leveled messages together with a request-scoped [`Context`], without
//! binding to a specific destination. Each call is routed through a [`Logger`] to its
//! [`HandlerSet`], which fans the call out to every [`Handler`]:
//!
//! - A [`FileHandler`] encodes records as one JSON object per line and writes them to rotating
//!   `info.log` / `error.log` files and optionally to standard output.
//! - A [`TracingHandler`] forwards records into the [`tracing`] ecosystem.
//! - Any other destination can be added by implementing [`Handler`].
//!
//! Every record carries the resolved message, the level, an RFC 3339 timestamp, the call site
//! (`file:line(function)`) and the trace identifier of the context.
//!
//! # Example
//!
//! ```
//! use ylog::{Config, Context, FileConfig, Logger};
//!
//! let logger = Logger::new(Some(Config {
//!     file_config: FileConfig {
//!         console: true,
//!         level_string: "info".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! }))
//! .expect("console logging cannot fail to initialize");
//!
//! let ctx = Context::background().with_trace_id("trace_xxxx");
//! ylog::info!(logger: &logger, ctx, "hello %s", "world"; attempt = 1);
//! ylog::debug!(logger: &logger, ctx, "filtered out by the `info` threshold");
//!
//! logger.close().expect("console logging cannot fail to close");
//! ```
//!
//! The process-wide default logger is initialized once with [`init`] and is used by the
//! free functions ([`info()`], [`error()`], …) and by the macros when no `logger:` is given.
//!
//! # Panic and fatal levels
//!
//! Logging at [`Level::Panic`] or [`Level::Fatal`] through [`Logger::log`] or any [`Handler`]
//! only records the message. Escalation is a separate, explicitly named operation:
//! [`Logger::log_and_panic`] panics after recording, and [`Logger::log_and_exit`] closes all
//! handlers and terminates the process.

mod call_site;
mod config;
mod context;
mod encoder;
mod handler;
mod level;
mod logger;
mod macros;
pub mod message;
mod rotation;
mod value;

#[cfg(test)]
mod test_utils;

pub use self::{
    call_site::CallSite,
    config::{Config, FileConfig},
    context::Context,
    encoder::JsonEncoder,
    handler::{
        CloseError, ERROR_FILE_NAME, FileHandler, Handler, HandlerSet, INFO_FILE_NAME, Record,
        Sink, TracingHandler,
    },
    level::Level,
    logger::{
        Logger, close, debug, default_logger, error, info, init, log, log_and_exit,
        log_and_panic, set_default, try_default_logger, warn,
    },
    rotation::{RollingFile, RotationPolicy},
    value::{Field, Value},
};

mod keys {
    use std::sync::LazyLock;

    use rustc_hash::FxHashSet;

    pub(crate) const MESSAGE: &str = "message";
    pub(crate) const LEVEL: &str = "level";
    pub(crate) const TIME: &str = "time";
    pub(crate) const CALLER: &str = "caller";
    pub(crate) const TRACE_ID: &str = "trace_id";
    pub(crate) const HOSTNAME: &str = "hostname";
    pub(crate) const PID: &str = "pid";

    pub(crate) static IMPLICIT_KEYS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
        [MESSAGE, LEVEL, TIME, CALLER, TRACE_ID, HOSTNAME, PID]
            .iter()
            .copied()
            .collect()
    });
}

/// Errors that can occur within the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Represents an error in configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Represents an error during JSON serialization.
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// A log file could not be opened.
    #[error("Failed to open log sink `{}`: {source}", path.display())]
    SinkOpen {
        /// The path of the log file.
        path: std::path::PathBuf,

        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Represents an I/O error while flushing or closing a sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A numeric level outside of the valid range `1..=6`.
    #[error("Invalid level rank: {0}")]
    InvalidLevel(u8),

    /// A level name which is not one of `debug`, `info`, `warn`, `error`, `panic`, `fatal`.
    #[error("Unknown level name: `{0}`")]
    UnknownLevel(String),

    /// The default logger was initialized more than once.
    #[error("The default logger has already been initialized")]
    AlreadyInitialized,

    /// One or more handlers failed to close.
    #[error(transparent)]
    Close(#[from] CloseError),
}
