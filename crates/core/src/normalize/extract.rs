use serde_json::Value;

const OUTPUT_TEXT_TYPE: &str = "output_text";

/// Locates the provider's raw translation text inside a response envelope.
///
/// Two envelope shapes are understood. The block form is
/// `{"output": [{"content": [{"type": "output_text", "text": "..."}]}]}`,
/// where the first matching content item across all blocks wins. The flat
/// form is `{"output_text": "..."}`. Anything else, `null` included,
/// yields `""`.
pub fn extract_raw_text(response: &Value) -> &str {
    if let Some(text) = first_output_block_text(response) {
        return text;
    }

    match response.get("output_text") {
        Some(Value::String(text)) => text.as_str(),
        _ => "",
    }
}

fn first_output_block_text(response: &Value) -> Option<&str> {
    let blocks = response.get("output")?.as_array()?;
    blocks
        .iter()
        .filter_map(|block| block.get("content")?.as_array())
        .flatten()
        .find_map(|item| {
            if item.get("type")?.as_str()? != OUTPUT_TEXT_TYPE {
                return None;
            }
            item.get("text")?.as_str()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_response_yields_empty() {
        assert_eq!(extract_raw_text(&Value::Null), "");
    }

    #[test]
    fn first_output_text_item_wins() {
        let response = json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"content": "not an array"},
                {"content": [
                    {"type": "refusal", "text": "no"},
                    {"type": "output_text", "text": 7},
                    {"type": "output_text", "text": "first"},
                ]},
                {"content": [{"type": "output_text", "text": "second"}]},
            ],
            "output_text": "flat",
        });
        assert_eq!(extract_raw_text(&response), "first");
    }

    #[test]
    fn flat_output_text_used_when_blocks_have_no_match() {
        let response = json!({
            "output": [{"content": [{"type": "input_text", "text": "src"}]}],
            "output_text": "  verbatim  ",
        });
        assert_eq!(extract_raw_text(&response), "  verbatim  ");
    }

    #[test]
    fn malformed_output_falls_through_to_flat_text() {
        let response = json!({"output": {"content": []}, "output_text": "flat"});
        assert_eq!(extract_raw_text(&response), "flat");
    }

    #[test]
    fn unknown_shapes_yield_empty() {
        assert_eq!(extract_raw_text(&json!({"output_text": 12})), "");
        assert_eq!(extract_raw_text(&json!(["output_text"])), "");
        assert_eq!(extract_raw_text(&json!("output_text")), "");
    }
}
