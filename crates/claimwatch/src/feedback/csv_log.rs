use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{FeedbackError, FeedbackRecord, FeedbackSink};

const HEADER: [&str; 6] = [
    "timestamp",
    "fraud_type",
    "predicted_label",
    "predicted_probability",
    "user_feedback",
    "input_payload",
];

/// Append-only CSV log of analyst verdicts.
pub struct CsvFeedbackLog {
    path: PathBuf,
    retrain_threshold: usize,
    write_lock: Mutex<()>,
}

impl CsvFeedbackLog {
    pub fn new(path: impl Into<PathBuf>, retrain_threshold: usize) -> Self {
        Self {
            path: path.into(),
            retrain_threshold,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of verdict rows currently stored, excluding the header.
    pub fn len(&self) -> Result<usize, FeedbackError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool, FeedbackError> {
        Ok(self.len()? == 0)
    }
}

impl FeedbackSink for CsvFeedbackLog {
    fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| FeedbackError::Unavailable("feedback log lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let new_file = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if new_file {
            writer.write_record(HEADER)?;
        }

        let payload = serde_json::to_string(&record.input_payload)?;
        let probability = record.predicted_probability.to_string();
        writer.write_record([
            record.timestamp.as_str(),
            record.fraud_type.tag(),
            record.predicted_label.as_str(),
            probability.as_str(),
            record.user_feedback.label(),
            payload.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn should_retrain(&self) -> Result<bool, FeedbackError> {
        Ok(self.len()? >= self.retrain_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Verdict;
    use crate::risk::ClaimType;
    use serde_json::json;

    fn record(label: &str) -> FeedbackRecord {
        FeedbackRecord {
            timestamp: "2025-10-01T08:30:00Z".to_string(),
            fraud_type: ClaimType::Insurance,
            predicted_label: label.to_string(),
            predicted_probability: 0.71,
            user_feedback: Verdict::Yes,
            input_payload: json!({ "claim_amount": 30000.0, "note": "a, b" }),
        }
    }

    #[test]
    fn writes_header_once_and_counts_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = CsvFeedbackLog::new(dir.path().join("data").join("feedback_log.csv"), 2);

        assert!(!log.should_retrain().expect("empty log readable"));
        log.record(record("Policy Manipulation Risk"))
            .expect("first row");
        assert!(!log.should_retrain().expect("one row"));
        log.record(record("Needs Analyst Review")).expect("second row");

        assert_eq!(log.len().expect("count"), 2);
        assert!(log.should_retrain().expect("threshold reached"));

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        assert_eq!(contents.matches("timestamp,fraud_type").count(), 1);
        assert!(contents.contains("Policy Manipulation Risk"));
    }

    #[test]
    fn missing_log_counts_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = CsvFeedbackLog::new(dir.path().join("absent.csv"), 1);
        assert!(log.is_empty().expect("readable"));
        assert!(!log.should_retrain().expect("readable"));
    }
}
