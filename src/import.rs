//! Bulk import of tasks pasted as a JSON array.

use thiserror::Error;

use crate::task::{Task, TaskError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON format. Please check your input. ({0})")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid task at position {position}: {source}")]
    InvalidTask {
        position: usize,
        #[source]
        source: TaskError,
    },
}

/// Parse a pasted batch. Every record must pass `Task::validate`.
pub fn parse_batch(text: &str) -> Result<Vec<Task>, ImportError> {
    let tasks: Vec<Task> = serde_json::from_str(text)?;
    for (index, task) in tasks.iter().enumerate() {
        task.validate().map_err(|source| ImportError::InvalidTask {
            position: index + 1,
            source,
        })?;
    }
    Ok(tasks)
}

/// Text waiting to be imported.
///
/// The buffer is consumed once its tasks have been merged, so a later
/// submission does not import the same batch again.
#[derive(Debug, Clone, Default)]
pub struct ImportBuffer {
    text: String,
}

impl ImportBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// True when the buffer holds something other than whitespace.
    pub fn is_pending(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Parse without consuming; a failed parse leaves the text in place.
    pub fn parse(&self) -> Result<Vec<Task>, ImportError> {
        parse_batch(self.text.trim())
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = r#"[
        {"title": "Fix login", "due_date": "2025-02-01", "estimated_hours": 3, "importance": 9, "dependencies": [2]},
        {"title": "Write docs", "due_date": "2025-02-03", "estimated_hours": 1, "importance": 4}
    ]"#;

    #[test]
    fn test_parse_batch_reads_records_in_order() {
        let tasks = parse_batch(BATCH).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Fix login");
        assert_eq!(tasks[0].dependencies, vec![2]);
        assert!(tasks[1].dependencies.is_empty());
    }

    #[test]
    fn test_parse_batch_rejects_malformed_json() {
        let err = parse_batch("[{\"title\": ").unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_parse_batch_rejects_non_numeric_hours() {
        let text = r#"[{"title": "A", "due_date": "2025-02-01", "estimated_hours": "two", "importance": 5}]"#;
        assert!(matches!(parse_batch(text), Err(ImportError::Malformed(_))));
    }

    #[test]
    fn test_parse_batch_reports_invalid_record_position() {
        let text = r#"[
            {"title": "A", "due_date": "2025-02-01", "estimated_hours": 1, "importance": 5},
            {"title": "B", "due_date": "2025-02-01", "estimated_hours": 1, "importance": 12}
        ]"#;
        match parse_batch(text) {
            Err(ImportError::InvalidTask { position, source }) => {
                assert_eq!(position, 2);
                assert_eq!(source, TaskError::ImportanceOutOfRange(12));
            }
            other => panic!("expected invalid task error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_batch("[]").unwrap().is_empty());
    }

    #[test]
    fn test_buffer_pending_and_clear() {
        let mut buffer = ImportBuffer::new();
        assert!(!buffer.is_pending());
        buffer.stage("   \n");
        assert!(!buffer.is_pending());
        buffer.stage(BATCH);
        assert!(buffer.is_pending());
        assert_eq!(buffer.parse().unwrap().len(), 2);
        // parsing does not consume
        assert!(buffer.is_pending());
        buffer.clear();
        assert!(!buffer.is_pending());
    }
}
