//! Recovery of a translation from loosely structured provider output.
//!
//! Providers answer with an envelope whose text may itself be JSON, JSON
//! buried in prose, or plain text. Nothing here fails: every mismatch just
//! moves on to the next fallback, and the worst case is an empty result.

mod coerce;
mod extract;
mod fields;
mod parse;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use extract::extract_raw_text;
pub use fields::normalize;
pub use parse::{embedded_json_span, parse_json, parse_translation, ParseError};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TranslationResult {
    pub text: String,
    /// Provider-defined correspondence entries, passed through untouched.
    #[serde(default)]
    pub alignments: Vec<Value>,
}

impl TranslationResult {
    /// An empty result means no usable translation was found.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extracts and parses the translation carried by a provider response.
pub fn read_translation(response: &Value) -> TranslationResult {
    let raw = extract_raw_text(response);
    if raw.is_empty() {
        tracing::debug!("provider response carried no raw text");
        return TranslationResult::default();
    }
    parse_translation(raw)
}
