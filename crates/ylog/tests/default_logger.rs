//! The process-wide default logger. Kept in its own test binary, since it can only be
//! initialized once per process.

use std::fs;

use ylog::{Config, Context, FileConfig, INFO_FILE_NAME, Level, LoggerError, Value};

#[test]
fn default_logger_is_initialized_once() {
    assert!(ylog::try_default_logger().is_none());
    assert!(ylog::close().is_ok());

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        file_config: FileConfig {
            path: format!("{}/", dir.path().display()),
            ..Default::default()
        },
        ..Default::default()
    };
    ylog::init(Some(config.clone())).unwrap();

    assert!(matches!(
        ylog::init(Some(config)),
        Err(LoggerError::AlreadyInitialized)
    ));
    assert!(matches!(
        ylog::set_default(ylog::Logger::new(None).unwrap()),
        Err(LoggerError::AlreadyInitialized)
    ));

    let ctx = Context::background().with_trace_id("trace_xxxx");
    ylog::info(&ctx, "hello %s", &[Value::from("world")]);
    ylog::log(&ctx, Level::Warn, "", &[Value::from(1), Value::from(2)]);
    ylog::error!(ctx, "via macro"; code = 7);
    ylog::close().unwrap();

    let contents = fs::read_to_string(dir.path().join(INFO_FILE_NAME)).unwrap();
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let messages: Vec<&str> = records
        .iter()
        .map(|record| record["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["hello world", "1 2", "via macro"]);
    assert_eq!(records[2]["code"], 7);
    assert!(records
        .iter()
        .all(|record| record["trace_id"] == "trace_xxxx"));
}
