//! Submission transport.
//!
//! [`HttpTransport`] posts an assembled
//! [`SubmissionPayload`](atelier_core::submission::SubmissionPayload) as JSON
//! to the intake endpoint. Exactly one request per call: the caller decides
//! whether a failed submission is retried, so the transport never does.

use std::time::Duration;

use async_trait::async_trait;
use atelier_core::error::CoreError;
use atelier_core::submission::SubmissionPayload;

/// HTTP request timeout for a submission POST.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shown when the server rejects a submission without a readable error body.
pub const DEFAULT_REJECTION_MESSAGE: &str =
    "Error al enviar el cuestionario. Inténtalo de nuevo.";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for submission dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A previous submission has not finished yet.
    #[error("A submission is already in flight")]
    InFlight,

    /// Submission was attempted from a step other than payment.
    #[error("Submission is only available from the payment step")]
    WrongStep,

    /// The submission failed local validation; no request was made.
    #[error("Validation failed: {0}")]
    Invalid(#[from] CoreError),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server rejected submission with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl DispatchError {
    /// Message suitable for inline display next to the submit control.
    pub fn display_message(&self) -> String {
        match self {
            DispatchError::Rejected { message, .. } => message.clone(),
            DispatchError::Invalid(e) => e.to_string(),
            DispatchError::Request(_) => DEFAULT_REJECTION_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmitTransport
// ---------------------------------------------------------------------------

/// Delivery seam for assembled submissions. The production implementation
/// posts to the intake HTTP service; tests substitute a recorder.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Deliver one payload. `Ok(())` means the server accepted it.
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), DispatchError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Posts submissions to the intake endpoint as JSON.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport targeting the given submission URL.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), DispatchError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Rejections carry `{ "error": "..." }`; anything else gets the
        // generic message.
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());

        Err(DispatchError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
