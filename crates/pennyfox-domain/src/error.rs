use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid recurrence kind: {0}")]
    InvalidRecurrenceKind(String),
}
