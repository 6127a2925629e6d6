//! Configuration of loggers and file handlers.
//!
//! Both structures implement [`serde::Deserialize`], so that they can be loaded from the
//! application's configuration with any serde format. Missing keys take their default values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration consumed by [`Logger::new`][crate::Logger::new] and [`crate::init`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration of the file and console handler.
    #[serde(rename = "fileConfig", default = "FileConfig::console_only")]
    pub file_config: FileConfig,

    /// If `true`, records are additionally forwarded to the `tracing` ecosystem through a
    /// [`TracingHandler`][crate::TracingHandler].
    #[serde(rename = "forwardToTracing")]
    pub forward_to_tracing: bool,
}

/// The configuration used when none is provided: no log files, console output enabled, and
/// the `debug` minimum level.
impl Default for Config {
    fn default() -> Self {
        Self {
            file_config: FileConfig::console_only(),
            forward_to_tracing: false,
        }
    }
}

/// Configuration for a [`FileHandler`][crate::FileHandler].
///
/// The configuration is only read while constructing the handler.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Prefix of the log file paths, to which `info.log` and `error.log` are appended
    /// verbatim. Use a trailing separator (`logs/`) to place the files in a directory.
    /// An empty path disables file logging.
    pub path: String,

    /// Maximum size of a single log file, in megabytes, before it is rotated.
    /// `0` uses the default of 100 megabytes.
    pub max_size: u64,

    /// Maximum number of rotated files to keep. `0` keeps all of them.
    pub max_backups: usize,

    /// Maximum number of days to keep rotated files for. `0` keeps them regardless of age.
    pub max_age: u64,

    /// If `true`, records are also written to standard output.
    pub console: bool,

    /// Minimum level of records to log: one of `debug`, `info`, `warn`, `error`, `panic`,
    /// `fatal`. Any other value, including an empty one, is treated as `debug`.
    pub level_string: String,

    /// Fields included at the top level of every record, such as the service name or
    /// environment.
    pub static_fields: HashMap<String, serde_json::Value>,
}

impl FileConfig {
    /// A configuration which writes every record to standard output only.
    pub fn console_only() -> Self {
        Self {
            console: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_logs_to_console_only() {
        let config = Config::default();
        assert!(config.file_config.console);
        assert!(config.file_config.path.is_empty());
        assert!(config.file_config.level_string.is_empty());
        assert!(!config.forward_to_tracing);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());

        let config: Config = serde_json::from_str(
            r#"{
                "fileConfig": {
                    "path": "./logs/",
                    "max_size": 10,
                    "max_backups": 5,
                    "max_age": 7,
                    "level_string": "warn",
                    "static_fields": { "service": "orders" }
                },
                "forwardToTracing": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.file_config.path, "./logs/");
        assert_eq!(config.file_config.max_size, 10);
        assert_eq!(config.file_config.max_backups, 5);
        assert_eq!(config.file_config.max_age, 7);
        assert!(!config.file_config.console);
        assert_eq!(config.file_config.level_string, "warn");
        assert_eq!(config.file_config.static_fields["service"], "orders");
        assert!(config.forward_to_tracing);
    }
}
