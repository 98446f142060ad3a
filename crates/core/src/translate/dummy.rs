use crate::translate::{TranslateError, TranslateRequest, TranslationProvider};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

/// Offline provider that answers every request with its own text in the
/// output-block envelope.
#[derive(Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationProvider for DummyProvider {
    fn fetch(&self, request: TranslateRequest) -> BoxFuture<'_, Result<Value, TranslateError>> {
        async move {
            Ok(json!({
                "object": "response",
                "status": "completed",
                "output": [{
                    "type": "message",
                    "role": "assistant",
                    "content": [{"type": "output_text", "text": request.text}],
                }],
            }))
        }
        .boxed()
    }
}
