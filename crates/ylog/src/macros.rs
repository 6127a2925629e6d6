//! Logging macros, which capture the call site and build the record in place.
//!
//! Every macro accepts an optional leading `logger: <expr>,` naming the [`Logger`](crate::Logger)
//! to log with; without it, the process-wide default logger is used. The context is followed by
//! the format string and its positional arguments, and optionally by `;` and `key = value`
//! structured fields:
//!
//! ```ignore
//! ylog::warn!(ctx, "retrying %s", url; attempt = 3, backoff = delay);
//! ylog::error!(logger: &logger, ctx, "payment failed"; code = 502);
//! ```

/// Builds a [`Record`](crate::Record) at the call site. Not part of the public API.
#[doc(hidden)]
#[macro_export]
macro_rules! __record {
    (
        $level:expr,
        $ctx:expr,
        $format:expr
        $(, $arg:expr)*
        $(; $($key:ident = $value:expr),+ $(,)?)?
    ) => {
        $crate::Record::new(
            $level,
            &$ctx,
            $crate::CallSite::new(::core::file!(), ::core::line!(), ::core::module_path!()),
            $format,
            &[$($crate::Value::from($arg)),*],
        )
        .with_fields(&[$($((::core::stringify!($key), $crate::Value::from($value))),+)?])
    };
}

/// Logs a message at the specified [`Level`](crate::Level).
///
/// ```ignore
/// ylog::log!(ctx, Level::Warn, "cache miss for %s", key);
/// ylog::log!(logger: &logger, ctx, Level::Info, "started"; port = 8080);
/// ```
///
/// # Panics
///
/// Panics if no `logger:` is given and the default logger has not been initialized.
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $ctx:expr, $level:expr, $($rest:tt)+) => {
        $logger.emit(&$crate::__record!($level, $ctx, $($rest)+))
    };
    ($ctx:expr, $level:expr, $($rest:tt)+) => {
        $crate::default_logger().emit(&$crate::__record!($level, $ctx, $($rest)+))
    };
}

/// Logs a message at [`Level::Debug`](crate::Level::Debug). See [`log!`](crate::log!).
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::log!(logger: $logger, $ctx, $crate::Level::Debug, $($rest)+)
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::log!($ctx, $crate::Level::Debug, $($rest)+)
    };
}

/// Logs a message at [`Level::Info`](crate::Level::Info). See [`log!`](crate::log!).
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::log!(logger: $logger, $ctx, $crate::Level::Info, $($rest)+)
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::log!($ctx, $crate::Level::Info, $($rest)+)
    };
}

/// Logs a message at [`Level::Warn`](crate::Level::Warn). See [`log!`](crate::log!).
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::log!(logger: $logger, $ctx, $crate::Level::Warn, $($rest)+)
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::log!($ctx, $crate::Level::Warn, $($rest)+)
    };
}

/// Logs a message at [`Level::Error`](crate::Level::Error). See [`log!`](crate::log!).
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $crate::log!(logger: $logger, $ctx, $crate::Level::Error, $($rest)+)
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::log!($ctx, $crate::Level::Error, $($rest)+)
    };
}

/// Logs a message at [`Level::Panic`](crate::Level::Panic), then panics with the message.
///
/// # Panics
///
/// Always panics.
#[macro_export]
macro_rules! log_and_panic {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $logger.emit_and_panic(&$crate::__record!($crate::Level::Panic, $ctx, $($rest)+))
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::default_logger()
            .emit_and_panic(&$crate::__record!($crate::Level::Panic, $ctx, $($rest)+))
    };
}

/// Logs a message at [`Level::Fatal`](crate::Level::Fatal), closes all handlers of the logger,
/// then terminates the process with exit status `1`.
///
/// # Panics
///
/// Panics if no `logger:` is given and the default logger has not been initialized.
#[macro_export]
macro_rules! log_and_exit {
    (logger: $logger:expr, $ctx:expr, $($rest:tt)+) => {
        $logger.emit_and_exit(&$crate::__record!($crate::Level::Fatal, $ctx, $($rest)+))
    };
    ($ctx:expr, $($rest:tt)+) => {
        $crate::default_logger()
            .emit_and_exit(&$crate::__record!($crate::Level::Fatal, $ctx, $($rest)+))
    };
}
