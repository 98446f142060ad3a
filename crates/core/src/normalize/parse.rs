use super::fields::normalize;
use super::TranslationResult;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("no JSON content")]
    Empty,
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn parse_json(candidate: &str) -> Result<Value, ParseError> {
    if candidate.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(serde_json::from_str(candidate)?)
}

/// Slice from the first `{` to the last `}`, both inclusive.
pub fn embedded_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Turns raw provider text into a [`TranslationResult`].
///
/// The whole text is tried as JSON first, then the embedded `{...}` span.
/// A stage only wins when normalizing its value produces non-empty text;
/// when none does, the trimmed text itself is the translation.
pub fn parse_translation(raw_text: &str) -> TranslationResult {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return TranslationResult::default();
    }

    let stages: [(&str, Option<&str>); 2] = [
        ("document", Some(trimmed)),
        ("embedded", embedded_json_span(trimmed)),
    ];

    for (stage, candidate) in stages {
        let Some(candidate) = candidate else {
            continue;
        };
        match parse_json(candidate) {
            Ok(value) => {
                let normalized = normalize(&value);
                if !normalized.is_empty() {
                    tracing::debug!(stage, "structured translation recovered");
                    return normalized;
                }
                tracing::trace!(stage, "parsed JSON carried no translation text");
            }
            Err(e) => tracing::trace!(stage, error = %e, "candidate is not JSON"),
        }
    }

    tracing::debug!(stage = "verbatim", "using raw text as translation");
    TranslationResult {
        text: trimmed.to_owned(),
        alignments: Vec::new(),
    }
}
