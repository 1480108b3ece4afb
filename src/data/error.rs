use thiserror::Error;

/// Errors raised while producing a [`Dataset`](super::model::Dataset).
///
/// All of them are terminal for the current render: nothing is cached and
/// the UI shows the message instead of the dashboard.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A row-count bound of zero was requested.
    #[error("row limit must be positive, got {0}")]
    InvalidRowLimit(usize),

    /// The source could not be fetched, was truncated, or lacks an expected
    /// column.
    #[error("dataset unavailable from {origin}: {reason}")]
    DataUnavailable { origin: String, reason: String },

    /// A row's timestamp did not match any accepted format. `row` counts data
    /// rows from 1, not including the header.
    #[error("row {row}: unparsable timestamp '{raw}'")]
    MalformedTimestamp { row: usize, raw: String },
}

impl LoadError {
    pub fn unavailable(origin: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::DataUnavailable {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
