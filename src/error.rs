//! Error types for docbatch library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for docbatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building, submitting or inspecting a batch.
#[derive(Error, Debug)]
pub enum Error {
    /// A style descriptor names an unknown axis or carries an out-of-range value.
    #[error("Invalid style in {context}: {reason}")]
    InvalidStyleSpec {
        /// Which element or cell carried the style
        context: String,
        /// What was wrong with it
        reason: String,
    },

    /// A table grid is empty or ragged.
    #[error("Invalid table: {reason}")]
    InvalidTableSpec {
        /// What was wrong with the grid
        reason: String,
    },

    /// An element cannot be laid out (for example an empty list).
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// The engine's own offset bookkeeping went wrong.
    #[error("Offset consistency fault: {0}")]
    OffsetConsistencyFault(String),

    /// The construction session was aborted by an earlier fault.
    #[error("Construction session aborted by an earlier fault")]
    SessionAborted,

    /// The remote API rejected the batch or the call did not complete.
    #[error("Batch submission failed ({outcome}): {message}")]
    BatchSubmissionFailure {
        /// Remote error body or transport error, verbatim
        message: String,
        /// HTTP status, when one was received
        status: Option<u16>,
        /// Whether the remote document may have been modified
        outcome: SubmissionOutcome,
    },

    /// Observed cell offsets disagree with the layout engine's predictions.
    #[error("Inspection mismatch in {} cell(s): {}", .mismatches.len(), summarize(.mismatches))]
    InspectionMismatch {
        /// Every cell whose observed range differs from the prediction
        mismatches: Vec<CellMismatch>,
    },

    /// The inspector could not find the requested table.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// HTTP transport error outside of a batch submission.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidStyleSpec`].
    pub fn invalid_style(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidStyleSpec {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::InvalidTableSpec`].
    pub fn invalid_table(reason: impl Into<String>) -> Self {
        Error::InvalidTableSpec {
            reason: reason.into(),
        }
    }

    /// Validation errors are raised before the cursor moves, so the session
    /// that produced them can keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidStyleSpec { .. } | Error::InvalidTableSpec { .. } | Error::InvalidElement(_)
        )
    }

    /// Whether resubmitting the whole batch is safe and may succeed.
    ///
    /// Only failures known not to have touched the document and caused by
    /// rate limiting qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::BatchSubmissionFailure {
                message,
                status,
                outcome: SubmissionOutcome::NotApplied,
            } => {
                let lower = message.to_lowercase();
                *status == Some(429) || lower.contains("quota") || lower.contains("rate limit")
            }
            _ => false,
        }
    }
}

/// What is known about the remote document after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The API answered with an error; the batch was not applied.
    NotApplied,
    /// The call did not complete; the document must be checked by hand
    /// before anything is resubmitted.
    Unknown,
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionOutcome::NotApplied => write!(f, "not applied"),
            SubmissionOutcome::Unknown => write!(f, "outcome unknown, verify the document"),
        }
    }
}

/// One cell whose observed range differs from the predicted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMismatch {
    /// Row index
    pub row: usize,
    /// Column index
    pub column: usize,
    /// Predicted `[start, end)`
    pub expected: (usize, usize),
    /// Observed `[start, end)`, `None` when the cell had no indexed content
    pub observed: Option<(usize, usize)>,
}

impl fmt::Display for CellMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.observed {
            Some((start, end)) => write!(
                f,
                "({}, {}) expected [{}, {}) observed [{}, {})",
                self.row, self.column, self.expected.0, self.expected.1, start, end
            ),
            None => write!(
                f,
                "({}, {}) expected [{}, {}) observed nothing",
                self.row, self.column, self.expected.0, self.expected.1
            ),
        }
    }
}

fn summarize(mismatches: &[CellMismatch]) -> String {
    mismatches
        .iter()
        .take(3)
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_style("paragraph 2", "unknown style axis 'colour'");
        assert_eq!(
            err.to_string(),
            "Invalid style in paragraph 2: unknown style axis 'colour'"
        );

        let err = Error::BatchSubmissionFailure {
            message: "timed out".into(),
            status: None,
            outcome: SubmissionOutcome::Unknown,
        };
        assert_eq!(
            err.to_string(),
            "Batch submission failed (outcome unknown, verify the document): timed out"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::invalid_table("no rows").is_recoverable());
        assert!(Error::invalid_style("cell (0, 1)", "bad color").is_recoverable());
        assert!(!Error::OffsetConsistencyFault("overflow".into()).is_recoverable());
        assert!(!Error::SessionAborted.is_recoverable());
    }

    #[test]
    fn test_retryable_only_when_not_applied() {
        let quota = Error::BatchSubmissionFailure {
            message: "Quota exceeded for quota metric 'Write requests'".into(),
            status: Some(429),
            outcome: SubmissionOutcome::NotApplied,
        };
        assert!(quota.is_retryable());

        let unknown = Error::BatchSubmissionFailure {
            message: "rate limit".into(),
            status: None,
            outcome: SubmissionOutcome::Unknown,
        };
        assert!(!unknown.is_retryable());

        let forbidden = Error::BatchSubmissionFailure {
            message: "The caller does not have permission".into(),
            status: Some(403),
            outcome: SubmissionOutcome::NotApplied,
        };
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn test_mismatch_display() {
        let err = Error::InspectionMismatch {
            mismatches: vec![CellMismatch {
                row: 1,
                column: 0,
                expected: (17, 19),
                observed: Some((18, 20)),
            }],
        };
        assert_eq!(
            err.to_string(),
            "Inspection mismatch in 1 cell(s): (1, 0) expected [17, 19) observed [18, 20)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
