//! Provides the [`FileHandler`], which writes JSON records to rotating log files and standard
//! output.

use std::{
    borrow::Cow,
    fmt,
    io::{self, Write},
    mem,
    path::PathBuf,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::{MakeWriter, writer::BoxMakeWriter};

use super::{Handler, Record};
use crate::{FileConfig, JsonEncoder, Level, LoggerError, RollingFile, RotationPolicy};

/// Name of the log file receiving records of every level, appended to [`FileConfig::path`].
pub const INFO_FILE_NAME: &str = "info.log";

/// Name of the log file receiving records at [`Level::Error`] and above, appended to
/// [`FileConfig::path`].
pub const ERROR_FILE_NAME: &str = "error.log";

const CONSOLE_SINK_NAME: &str = "console";

/// A destination of a [`FileHandler`], which accepts records at or above its own minimum level.
pub struct Sink {
    name: Cow<'static, str>,
    level: Level,
    writer: BoxMakeWriter,
}

impl Sink {
    /// Creates a sink writing records at or above `level` to `writer`.
    pub fn new<W>(name: impl Into<Cow<'static, str>>, level: Level, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            level,
            writer: BoxMakeWriter::new(writer),
        }
    }

    /// The name of the sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the sink accepts records at the specified level.
    pub fn accepts(&self, level: Level) -> bool {
        level >= self.level
    }

    fn write(&self, buffer: &[u8]) -> io::Result<()> {
        self.writer.make_writer().write_all(buffer)
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.make_writer().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// A [`Handler`] which encodes records as JSON and writes them to a set of [`Sink`]s.
///
/// Built from a [`FileConfig`], the handler writes every record to `<path>info.log`, records at
/// [`Level::Error`] and above additionally to `<path>error.log`, and every record to standard
/// output if console output is enabled. Files are rotated according to the size, count and age
/// limits of the configuration. Writes happen on background threads, which are flushed and
/// stopped by [`Handler::close`] or when the handler is dropped.
pub struct FileHandler {
    level: Level,
    encoder: JsonEncoder,
    sinks: Vec<Sink>,
    guards: Mutex<Vec<WorkerGuard>>,
    closed: AtomicBool,
}

impl FileHandler {
    /// Opens the sinks described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SinkOpen`] if a log file cannot be opened, and
    /// [`LoggerError::Configuration`] if a static field uses a reserved key.
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        Self::with_console(config, io::stdout())
    }

    /// Opens the sinks described by the configuration, with console output written to
    /// `console` instead of standard output.
    ///
    /// # Errors
    ///
    /// See [`FileHandler::new`].
    pub fn with_console<W>(config: &FileConfig, console: W) -> Result<Self, LoggerError>
    where
        W: Write + Send + 'static,
    {
        let level = Level::parse(&config.level_string);
        let encoder = JsonEncoder::new(config.static_fields.clone())?;

        let mut sinks = Vec::new();
        let mut guards = Vec::new();

        // File logging
        if !config.path.is_empty() {
            let policy = RotationPolicy::from_config(config);

            for (file_name, sink_level) in [
                (INFO_FILE_NAME, Level::Debug),
                (ERROR_FILE_NAME, Level::Error),
            ] {
                let path = PathBuf::from(format!("{}{file_name}", config.path));
                let file = RollingFile::open(&path, policy).map_err(|source| {
                    LoggerError::SinkOpen {
                        path: path.clone(),
                        source,
                    }
                })?;

                let (non_blocking_appender, guard) = NonBlockingBuilder::default()
                    .lossy(false)
                    .thread_name("ylog-file-appender")
                    .finish(file);
                guards.push(guard);

                tracing::debug!(
                    path = %path.display(),
                    level = %sink_level,
                    "Opened log file sink"
                );
                sinks.push(Sink::new(file_name, sink_level, non_blocking_appender));
            }
        }

        // Console logging
        if config.console {
            let (non_blocking_console, guard) = NonBlockingBuilder::default()
                .lossy(false)
                .thread_name("ylog-console-appender")
                .finish(console);
            guards.push(guard);
            sinks.push(Sink::new(CONSOLE_SINK_NAME, Level::Debug, non_blocking_console));
        }

        Ok(Self {
            level,
            encoder,
            sinks,
            guards: Mutex::new(guards),
            closed: AtomicBool::new(false),
        })
    }

    /// Creates a handler writing records at or above `level` to the specified sinks.
    pub fn from_sinks(level: Level, encoder: JsonEncoder, sinks: Vec<Sink>) -> Self {
        Self {
            level,
            encoder,
            sinks,
            guards: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// The minimum level of records written by this handler.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The sinks of this handler.
    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }
}

impl Handler for FileHandler {
    fn name(&self) -> &str {
        "file"
    }

    fn log(&self, record: &Record<'_>) {
        let level = record.level();
        if level < self.level || self.closed.load(Ordering::Acquire) {
            return;
        }

        let mut sinks = self
            .sinks
            .iter()
            .filter(|sink| sink.accepts(level))
            .peekable();
        if sinks.peek().is_none() {
            return;
        }

        let message = record.message();
        match self.encoder.encode(record, &message) {
            Ok(buffer) => {
                for sink in sinks {
                    let _ = sink.write(&buffer);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to encode log record. Skipping.");
            }
        }
    }

    fn close(&self) -> Result<(), LoggerError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut result = Ok(());
        for sink in &self.sinks {
            if let Err(error) = sink.flush() {
                tracing::warn!(sink = sink.name(), %error, "Failed to flush log sink");
                if result.is_ok() {
                    result = Err(LoggerError::Io(error));
                }
            }
        }

        // Dropping the guards flushes the remaining records and stops the writer threads
        let guards = mem::take(&mut *self.guards.lock().unwrap_or_else(PoisonError::into_inner));
        drop(guards);

        result
    }
}

impl fmt::Debug for FileHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandler")
            .field("level", &self.level)
            .field("sinks", &self.sinks)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
