//! Append-only audit trail of tutoring activity.
//!
//! One row per action: `(timestamp, action type, JSON payload)`. This is the
//! audit record of what the assistant did, separate from `tracing`
//! diagnostics. Sink failures are reported through `tracing::warn` and then
//! swallowed: an unwritable audit row never aborts the tutoring workflow.

use chrono::{DateTime, Utc};
use config::PathManager;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One appended audit row. Rows are never mutated or deleted.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub action_type: String,
    pub payload: serde_json::Value,
}

pub trait ActivitySink: Send + Sync {
    fn append(&self, record: &LogRecord) -> anyhow::Result<()>;
}

/// Tab-separated rows appended to a file, RFC 3339 timestamps.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ActivitySink for FileSink {
    fn append(&self, record: &LogRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{}\t{}\t{}",
            record.timestamp.to_rfc3339(),
            record.action_type,
            record.payload
        )?;
        Ok(())
    }
}

/// Captures rows in memory; used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("sink lock poisoned").clone()
    }
}

impl ActivitySink for MemorySink {
    fn append(&self, record: &LogRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .expect("sink lock poisoned")
            .push(record.clone());
        Ok(())
    }
}

pub struct ActivityLogger {
    sink: Arc<dyn ActivitySink>,
}

impl ActivityLogger {
    pub fn new(sink: Arc<dyn ActivitySink>) -> Self {
        Self { sink }
    }

    /// Logger appending to the platform activity log file.
    pub fn to_default_log() -> Self {
        let path = PathManager::activity_log_path()
            .unwrap_or_else(|| PathBuf::from("limera-activity.log"));
        Self::new(Arc::new(FileSink::new(path)))
    }

    /// Append one row. Failures are warned about and swallowed.
    pub fn record(&self, action_type: &str, payload: impl Serialize) {
        let payload = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
        let record = LogRecord {
            timestamp: Utc::now(),
            action_type: action_type.to_string(),
            payload,
        };
        if let Err(e) = self.sink.append(&record) {
            tracing::warn!(action_type, error = %e, "activity log append failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_captures_action_and_payload() {
        let sink = Arc::new(MemorySink::new());
        let logger = ActivityLogger::new(sink.clone());

        logger.record("user_prompt", "Write about the moon");
        logger.record(
            "rhyme_lookup",
            serde_json::json!({"word": "moon", "result": ["june"]}),
        );

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action_type, "user_prompt");
        assert_eq!(records[0].payload, serde_json::json!("Write about the moon"));
        assert_eq!(records[1].payload["word"], "moon");
    }

    #[test]
    fn sink_failure_is_swallowed() {
        struct FailingSink;
        impl ActivitySink for FailingSink {
            fn append(&self, _record: &LogRecord) -> anyhow::Result<()> {
                anyhow::bail!("sink unavailable")
            }
        }

        let logger = ActivityLogger::new(Arc::new(FailingSink));
        // Must not panic or propagate.
        logger.record("user_prompt", "hello");
    }

    #[test]
    fn file_sink_appends_tab_separated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("activity.log");
        let logger = ActivityLogger::new(Arc::new(FileSink::new(path.clone())));

        logger.record("user_prompt", "one");
        logger.record("assistant_reply", "two");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let fields: Vec<&str> = lines[0].split('\t').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1], "user_prompt");
        assert_eq!(fields[2], "\"one\"");
    }
}
