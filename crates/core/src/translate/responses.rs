use crate::config::ProviderConfig;
use crate::translate::{TranslateError, TranslateRequest, TranslationProvider, LOG_TARGET};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Client for a "responses"-style endpoint whose translation model takes
/// per-item `translation_options`.
#[derive(Clone)]
pub struct ResponsesApiProvider {
    client: Client,
    config: ProviderConfig,
}

impl ResponsesApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TranslateError::Network)?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
pub struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Debug, Serialize)]
struct InputContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    translation_options: TranslationOptions<'a>,
}

#[derive(Debug, Serialize)]
struct TranslationOptions<'a> {
    target_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_language: Option<&'a str>,
}

/// Request body for one translation. The source hint is left out when the
/// provider should detect the language itself.
pub fn build_payload<'a>(request: &'a TranslateRequest, model: &'a str) -> ResponsesRequest<'a> {
    ResponsesRequest {
        model,
        input: vec![InputMessage {
            role: "user",
            content: vec![InputContent {
                kind: "input_text",
                text: &request.text,
                translation_options: TranslationOptions {
                    target_language: request.target.as_str(),
                    source_language: request.source.hint(),
                },
            }],
        }],
    }
}

impl TranslationProvider for ResponsesApiProvider {
    fn fetch(&self, request: TranslateRequest) -> BoxFuture<'_, Result<Value, TranslateError>> {
        async move {
            let payload = build_payload(&request, &self.config.model);

            tracing::debug!(
                target: LOG_TARGET,
                endpoint = %self.config.endpoint,
                model = %self.config.model,
                source = request.source.as_str(),
                target_lang = request.target.as_str(),
                "sending translation request"
            );

            let response = self
                .client
                .post(self.config.endpoint.clone())
                .bearer_auth(self.config.api_key.expose())
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(target: LOG_TARGET, status = status.as_u16(), "provider rejected request");
                return Err(TranslateError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes)
                .map_err(|e| TranslateError::InvalidResponse(format!("failed to parse JSON: {e}")))
        }
        .boxed()
    }
}
