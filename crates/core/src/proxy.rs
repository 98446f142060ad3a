//! Server-side translation endpoint, independent of any HTTP framework.
//!
//! The browser never talks to the provider directly: it posts
//! `{text, sourceLanguage, targetLanguage}` here, and the provider's JSON is
//! relayed back untouched for the client to normalize.

use crate::config::{SourceLang, TargetLang};
use crate::translate::{TranslateError, TranslateRequest, TranslationProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const LOG_TARGET: &str = "proxy";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest {
    text: Option<String>,
    source_language: Option<String>,
    target_language: Option<String>,
}

/// Handles one call to the translation endpoint.
///
/// `provider` is `None` when no api key is configured. Failures never
/// escape as errors; they are folded into the returned status and an
/// `{"error": ...}` body.
pub async fn handle(
    method: &str,
    body: Option<&str>,
    provider: Option<&dyn TranslationProvider>,
) -> ProxyResponse {
    if !method.eq_ignore_ascii_case("POST") {
        return ProxyResponse::error(405, "Method Not Allowed");
    }

    let request: ProxyRequest = match body.filter(|b| !b.trim().is_empty()) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(target: LOG_TARGET, error = %e, "unreadable request body");
                return ProxyResponse::error(500, e.to_string());
            }
        },
        None => ProxyRequest::default(),
    };

    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return ProxyResponse::error(400, "Missing text"),
    };

    let Some(provider) = provider else {
        return ProxyResponse::error(500, "TRANSLATION_API_KEY is not configured");
    };

    let target = match request.target_language.as_deref().map(str::trim) {
        Some(lang) if !lang.is_empty() => match TargetLang::new(lang) {
            Ok(target) => target,
            Err(e) => return ProxyResponse::error(400, e.to_string()),
        },
        _ => TargetLang::default(),
    };
    let source = SourceLang::parse(request.source_language.as_deref().unwrap_or_default());

    tracing::info!(
        target: LOG_TARGET,
        source = source.as_str(),
        target_lang = target.as_str(),
        chars = text.chars().count(),
        "forwarding translation request"
    );

    match provider
        .fetch(TranslateRequest {
            text,
            source,
            target,
        })
        .await
    {
        Ok(body) => ProxyResponse { status: 200, body },
        Err(TranslateError::Api { status, body }) => {
            let message = if body.is_empty() {
                "Failed to fetch translation".to_owned()
            } else {
                body
            };
            ProxyResponse::error(status, message)
        }
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, error = %e, "translation request failed");
            ProxyResponse::error(500, e.to_string())
        }
    }
}
