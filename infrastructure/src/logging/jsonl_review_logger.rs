//! JSONL audit log of review events.
//!
//! Each [`ReviewEvent`] becomes one JSON line: the event payload plus
//! `type` and `timestamp` fields. The file is opened in append mode so a
//! log accumulates across runs.

use review_application::{ReviewEvent, ReviewEventLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Review event logger writing one JSON object per line.
///
/// Safe to share between concurrent reviews. Lines are flushed as they
/// are written.
pub struct JsonlReviewLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlReviewLogger {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ReviewEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.event_type.to_string()));
        map.insert("timestamp".to_string(), Value::String(timestamp));
        Value::Object(map)
    }
}

impl ReviewEventLogger for JsonlReviewLogger {
    fn log(&self, event: ReviewEvent) {
        let event_type = event.event_type;
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(
                "Could not write {} event to {}: {}",
                event_type,
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for JsonlReviewLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("reviews.jsonl");
        let logger = JsonlReviewLogger::open(&path).unwrap();

        logger.log(ReviewEvent::new(
            "retrieval_completed",
            json!({"task_id": "T-1", "coverage": 0.82, "retrieved_doc_ids": [3, 7]}),
        ));
        logger.log(ReviewEvent::new(
            "review_completed",
            json!({"task_id": "T-1", "decision": "approve"}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "retrieval_completed");
        assert_eq!(lines[0]["coverage"], 0.82);
        assert_eq!(lines[0]["retrieved_doc_ids"], json!([3, 7]));
        assert_eq!(lines[1]["decision"], "approve");
        for line in &lines {
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.jsonl");

        for task in ["T-1", "T-2"] {
            let logger = JsonlReviewLogger::open(&path).unwrap();
            logger.log(ReviewEvent::new("review_failed", json!({"task_id": task})));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["task_id"], "T-2");
    }

    #[test]
    fn test_non_object_payload_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.jsonl");
        let logger = JsonlReviewLogger::open(&path).unwrap();

        logger.log(ReviewEvent::new("llm_response", json!("raw text")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "llm_response");
        assert_eq!(lines[0]["data"], "raw text");
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlReviewLogger::open(dir.path()).is_err());
    }
}
