//! Provides the [`JsonEncoder`], which serializes log records into one JSON object per line.

use std::collections::{HashMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::{LoggerError, Record, keys};

/// Serializes [`Record`]s into compact JSON objects, each terminated by a newline.
///
/// Every record contains the implicit fields `message`, `level`, `time`, `caller`, `trace_id`,
/// `hostname` and `pid`, followed by the statically configured top-level fields, the fields of
/// the record, and the fields of the record's context which were not overridden by the record.
#[derive(Clone, Debug)]
pub struct JsonEncoder {
    pid: u32,
    hostname: String,
    static_top_level_fields: HashMap<String, Value>,
}

impl JsonEncoder {
    /// Creates a new [`JsonEncoder`] with the specified static top-level fields.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if a static field uses one of the implicit keys.
    pub fn new(static_top_level_fields: HashMap<String, Value>) -> Result<Self, LoggerError> {
        let pid = std::process::id();
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();

        for key in static_top_level_fields.keys() {
            if keys::IMPLICIT_KEYS.contains(key.as_str()) {
                return Err(LoggerError::Configuration(format!(
                    "A reserved key `{key}` was included in `static_fields` in the log encoder"
                )));
            }
        }

        Ok(Self {
            pid,
            hostname,
            static_top_level_fields,
        })
    }

    /// Serializes implicit fields.
    fn serialize_implicit_fields(
        &self,
        map_serializer: &mut impl SerializeMap<Error = serde_json::Error>,
        record: &Record<'_>,
        message: &str,
    ) -> Result<(), LoggerError> {
        map_serializer.serialize_entry(keys::MESSAGE, message)?;
        map_serializer.serialize_entry(keys::LEVEL, record.level().as_str())?;

        if let Ok(time) = OffsetDateTime::now_utc().format(&Rfc3339) {
            map_serializer.serialize_entry(keys::TIME, &time)?;
        }

        map_serializer.serialize_entry(keys::CALLER, &format_args!("{}", record.call_site()))?;
        map_serializer.serialize_entry(
            keys::TRACE_ID,
            record.context().trace_id().unwrap_or_default(),
        )?;
        map_serializer.serialize_entry(keys::HOSTNAME, &self.hostname)?;
        map_serializer.serialize_entry(keys::PID, &self.pid)?;

        Ok(())
    }

    /// Serializes the fields of the record, followed by the fields of its context which the
    /// record did not set itself.
    fn serialize_fields(
        map_serializer: &mut impl SerializeMap<Error = serde_json::Error>,
        record: &Record<'_>,
    ) -> Result<(), LoggerError> {
        let mut explicit_entries_set: HashSet<&str> = HashSet::default();

        for (key, value) in record.fields() {
            if keys::IMPLICIT_KEYS.contains(key) {
                tracing::warn!(
                    "Attempting to log a reserved key `{key}` (value: `{value:?}`) via record. \
                     Skipping."
                );
            } else if explicit_entries_set.insert(*key) {
                map_serializer.serialize_entry(key, value)?;
            }
        }

        for (key, value) in record
            .context()
            .fields()
            .iter()
            .filter(|(key, _value)| !explicit_entries_set.contains(key))
        {
            if keys::IMPLICIT_KEYS.contains(key) {
                tracing::warn!(
                    "Attempting to log a reserved key `{key}` (value: `{value:?}`) via context. \
                     Skipping."
                );
            } else {
                map_serializer.serialize_entry(key, value)?;
            }
        }

        Ok(())
    }

    /// Encodes a record with its already resolved message.
    ///
    /// The returned buffer ends with a newline, so that it can be written to a sink with a single
    /// `write_all` call, which avoids fragmentation of records written from multiple threads.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonSerialization`] if a value fails to serialize.
    pub fn encode(&self, record: &Record<'_>, message: &str) -> Result<Vec<u8>, LoggerError> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut buffer);
        let mut map_serializer = serializer.serialize_map(None)?;

        self.serialize_implicit_fields(&mut map_serializer, record, message)?;

        for (key, value) in self.static_top_level_fields.iter() {
            map_serializer.serialize_entry(key, value)?;
        }

        Self::serialize_fields(&mut map_serializer, record)?;

        map_serializer.end()?;
        buffer.push(b'\n');
        Ok(buffer)
    }
}
