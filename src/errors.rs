//! Error types for the questionnaire library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Field index {index} is out of range for a form with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid form event '{0}': expected add, delete:N, label:N:TEXT, value:N:TEXT or submit")]
    InvalidEvent(String),

    #[error("Event #{position} '{event}' failed: {source}")]
    EventFailed {
        /// 1-based position of the event in the replayed sequence
        position: usize,
        event: String,
        #[source]
        source: Box<FormError>,
    },

    #[error("Unknown submit format '{0}' (expected json or csv)")]
    UnknownFormat(String),

    #[error("Failed to encode submission as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode submission as CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Wrap the error of the event at 1-based `position` in a replayed sequence
    pub fn at_event(position: usize, event: &crate::events::FormEvent, source: FormError) -> Self {
        FormError::EventFailed {
            position,
            event: event.to_string(),
            source: Box::new(source),
        }
    }
}
