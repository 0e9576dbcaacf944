//! HTTP implementation of the document service.

use super::{not_applied, DocumentService};
use crate::api::{BatchUpdateResponse, Document};
use crate::error::{Error, Result, SubmissionOutcome};
use crate::ops::Batch;
use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// Default endpoint of the documents resource.
pub const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com/v1/documents";

/// Options for [`HttpDocumentService`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Documents resource URL, without a trailing slash
    pub base_url: String,

    /// Timeout for a whole request
    pub timeout: Duration,

    /// User agent header
    pub user_agent: String,
}

impl HttpOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("docbatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Talks to the remote document API with a bearer token.
pub struct HttpDocumentService {
    client: Client,
    token: String,
    options: HttpOptions,
}

impl HttpDocumentService {
    /// Create a service with default options.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_options(token, HttpOptions::default())
    }

    /// Create a service with custom options.
    pub fn with_options(token: impl Into<String>, options: HttpOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
            options,
        })
    }

    /// Options in use.
    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    fn document_endpoint(&self, document_id: &str) -> String {
        format!("{}/{}", self.options.base_url, document_id)
    }
}

impl DocumentService for HttpDocumentService {
    fn get_document(&self, document_id: &str) -> Result<Document> {
        let url = self.document_endpoint(document_id);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).bearer_auth(&self.token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Http(format!("{} fetching {}: {}", status, document_id, body)));
        }
        Ok(response.json::<Document>()?)
    }

    fn batch_update(&self, document_id: &str, batch: &Batch) -> Result<BatchUpdateResponse> {
        let url = format!("{}:batchUpdate", self.document_endpoint(document_id));
        log::debug!("POST {} ({} requests)", url, batch.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&batch.to_request_body())
            .send()
            .map_err(transport_failure)?;

        read_batch_response(document_id, response)
    }
}

/// A transport error: only a failed connection proves nothing was sent.
fn transport_failure(err: reqwest::Error) -> Error {
    let outcome = if err.is_connect() || err.is_builder() {
        SubmissionOutcome::NotApplied
    } else {
        SubmissionOutcome::Unknown
    };
    Error::BatchSubmissionFailure {
        message: err.to_string(),
        status: None,
        outcome,
    }
}

fn read_batch_response(document_id: &str, response: Response) -> Result<BatchUpdateResponse> {
    let status = response.status();
    let body = response.text().unwrap_or_default();

    if status.is_client_error() {
        return Err(not_applied(body, Some(status.as_u16())));
    }
    if !status.is_success() {
        return Err(Error::BatchSubmissionFailure {
            message: body,
            status: Some(status.as_u16()),
            outcome: SubmissionOutcome::Unknown,
        });
    }

    match serde_json::from_str(&body) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            // The batch was applied; only the reply body is unreadable.
            log::warn!("unreadable batchUpdate reply for {}: {}", document_id, e);
            Ok(BatchUpdateResponse {
                document_id: document_id.to_string(),
                replies: Vec::new(),
            })
        }
    }
}
