//! Remote document services and batch submission.
//!
//! [`DocumentService`] is the seam to the remote document API. The
//! [`BatchAssembler`] is the only component that talks to it while
//! populating a document: it reads the append point once and submits the
//! finished batch in a single call.
//!
//! # Example
//!
//! ```
//! use docbatch::service::{BatchAssembler, MemoryDocumentService};
//! use docbatch::model::{Element, Heading, Paragraph};
//! use std::sync::Arc;
//!
//! let service = Arc::new(MemoryDocumentService::new());
//! let id = service.create_document("Report");
//! let assembler = BatchAssembler::new(service.clone());
//!
//! let elements: Vec<Element> = vec![
//!     Heading::new(1, "Summary").into(),
//!     Paragraph::with_text("All figures are final.").into(),
//! ];
//! let (report, receipt) = assembler.append(&id, &elements, Default::default())?;
//! assert!(report.is_clean());
//! assert_eq!(receipt.operations, 3);
//! # Ok::<(), docbatch::Error>(())
//! ```

#[cfg(feature = "http")]
mod http;
mod memory;

#[cfg(feature = "http")]
pub use http::{HttpDocumentService, HttpOptions, DEFAULT_BASE_URL};
pub use memory::MemoryDocumentService;

use crate::api::{document_url, BatchUpdateResponse, Document};
use crate::builder::{BuildReport, DocumentBuilder};
use crate::error::{Error, Result};
use crate::layout::LayoutConstants;
use crate::model::Element;
use crate::ops::Batch;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Access to remote documents.
pub trait DocumentService: Send + Sync {
    /// Fetch a document's structural tree.
    fn get_document(&self, document_id: &str) -> Result<Document>;

    /// Apply a batch as one transaction.
    ///
    /// Failures must be reported as [`Error::BatchSubmissionFailure`] with
    /// an outcome telling whether the document may have changed.
    fn batch_update(&self, document_id: &str, batch: &Batch) -> Result<BatchUpdateResponse>;
}

/// Whole-batch retry policy for rate-limited submissions.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further retry
    pub base_delay: Duration,

    /// Upper bound for any delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set the number of retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Record of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub document_id: String,
    /// Operations submitted
    pub operations: usize,
    /// Replies returned by the API
    pub replies: usize,
    /// Attempts made, 0 when nothing was submitted
    pub attempts: u32,
    pub submitted_at: DateTime<Utc>,
    /// Browser URL of the document
    pub url: String,
}

/// Submits finished batches to a [`DocumentService`].
#[derive(Clone)]
pub struct BatchAssembler {
    service: Arc<dyn DocumentService>,
    retry: RetryPolicy,
}

impl BatchAssembler {
    /// Create an assembler with the default retry policy.
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The underlying service.
    pub fn service(&self) -> &Arc<dyn DocumentService> {
        &self.service
    }

    /// Offset new content should be appended at.
    pub fn append_point(&self, document_id: &str) -> Result<usize> {
        Ok(self.service.get_document(document_id)?.append_offset())
    }

    /// Submit a batch as one call.
    ///
    /// Only failures that left the document untouched and were caused by
    /// rate limiting are retried, always with the whole batch.
    pub fn submit(&self, document_id: &str, batch: &Batch) -> Result<SubmissionReceipt> {
        if batch.is_empty() {
            log::info!("batch for {} is empty, nothing submitted", document_id);
            return Ok(self.receipt(document_id, 0, 0, 0));
        }

        let mut attempt = 0;
        loop {
            match self.service.batch_update(document_id, batch) {
                Ok(response) => {
                    log::info!(
                        "submitted {} operations to {} ({} replies)",
                        batch.len(),
                        document_id,
                        response.replies.len()
                    );
                    return Ok(self.receipt(
                        document_id,
                        batch.len(),
                        response.replies.len(),
                        attempt + 1,
                    ));
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    log::warn!(
                        "submission to {} rate limited, retrying in {:?}: {}",
                        document_id,
                        delay,
                        e
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build elements at the document's append point and submit them.
    ///
    /// Elements that fail validation are reported and skipped; the rest are
    /// submitted in one batch.
    pub fn append(
        &self,
        document_id: &str,
        elements: &[Element],
        constants: LayoutConstants,
    ) -> Result<(BuildReport, SubmissionReceipt)> {
        let origin = self.append_point(document_id)?;
        let mut builder = DocumentBuilder::with_constants(origin, constants);
        let report = builder.extend(elements)?;
        let batch = builder.finish()?;
        let receipt = self.submit(document_id, &batch)?;
        Ok((report, receipt))
    }

    fn receipt(
        &self,
        document_id: &str,
        operations: usize,
        replies: usize,
        attempts: u32,
    ) -> SubmissionReceipt {
        SubmissionReceipt {
            document_id: document_id.to_string(),
            operations,
            replies,
            attempts,
            submitted_at: Utc::now(),
            url: document_url(document_id),
        }
    }
}

impl std::fmt::Debug for BatchAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchAssembler")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Shorthand for a failure the API answered with.
pub(crate) fn not_applied(message: impl Into<String>, status: Option<u16>) -> Error {
    Error::BatchSubmissionFailure {
        message: message.into(),
        status,
        outcome: crate::error::SubmissionOutcome::NotApplied,
    }
}
