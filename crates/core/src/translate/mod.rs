mod dummy;
mod responses;

use crate::config::{SourceLang, TargetLang};
use crate::normalize::{read_translation, TranslationResult};
use crate::util::is_http_retryable;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use dummy::DummyProvider;
pub use responses::{build_payload, ResponsesApiProvider, ResponsesRequest};

const LOG_TARGET: &str = "translate";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslateRequest {
    pub text: String,
    pub source: SourceLang,
    pub target: TargetLang,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("translation request timed out")]
    Timeout,
    #[error("http error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("no usable translation in provider response")]
    EmptyTranslation,
}

impl TranslateError {
    /// Whether a caller may reasonably try the same request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Api { status, .. } => is_http_retryable(*status),
            Self::InvalidResponse(_) | Self::EmptyTranslation => false,
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e)
        }
    }
}

/// Upstream translation service. Implementations hand back the provider's
/// JSON body as-is; interpreting it is left to [`crate::normalize`].
pub trait TranslationProvider: Send + Sync {
    fn fetch(&self, request: TranslateRequest) -> BoxFuture<'_, Result<Value, TranslateError>>;
}

/// Fetches a translation and recovers its text and alignments.
///
/// A response that carries no usable text is reported as
/// [`TranslateError::EmptyTranslation`].
pub async fn translate<P>(
    provider: &P,
    request: TranslateRequest,
) -> Result<TranslationResult, TranslateError>
where
    P: TranslationProvider + ?Sized,
{
    let response = provider.fetch(request).await?;
    let result = read_translation(&response);
    if result.is_empty() {
        tracing::warn!(target: LOG_TARGET, "provider response had no usable translation");
        return Err(TranslateError::EmptyTranslation);
    }
    tracing::debug!(
        target: LOG_TARGET,
        chars = result.text.chars().count(),
        alignments = result.alignments.len(),
        "translation normalized"
    );
    Ok(result)
}
