use super::coerce::{first_non_blank, join_values, non_blank_str};
use super::TranslationResult;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// A text rule inspects a parsed object and claims it by returning `Some`.
/// The first rule to claim the object decides the text, even when empty.
type TextRule = fn(&Object) -> Option<String>;

const TEXT_KEYS: [&str; 5] = [
    "translation",
    "translated_text",
    "translatedText",
    "result",
    "text",
];
const NESTED_TEXT_KEYS: [&str; 3] = ["text", "value", "translation"];
const TRANSLATION_OBJECT_KEYS: [&str; 3] = ["text", "value", "content"];
const ALIGNMENT_KEYS: [&str; 5] = [
    "alignments",
    "alignment",
    "mapping",
    "word_alignment",
    "wordAlignment",
];

const TEXT_RULES: [(&str, TextRule); 4] = [
    ("named_field", named_field),
    ("joined_sentences", joined_sentences),
    ("joined_translation", joined_translation),
    ("translation_object", translation_object),
];

/// Recovers a [`TranslationResult`] from a parsed value of unknown shape.
///
/// Anything other than a JSON object yields the empty result. Text and
/// alignments are resolved independently of each other.
pub fn normalize(parsed: &Value) -> TranslationResult {
    let Value::Object(obj) = parsed else {
        return TranslationResult::default();
    };

    let text = TEXT_RULES
        .iter()
        .find_map(|(name, rule)| {
            rule(obj).map(|text| {
                tracing::trace!(rule = *name, "text rule matched");
                text
            })
        })
        .unwrap_or_default();

    TranslationResult {
        text,
        alignments: alignments(obj),
    }
}

fn named_field(obj: &Object) -> Option<String> {
    first_string(obj, &TEXT_KEYS)
}

fn joined_sentences(obj: &Object) -> Option<String> {
    match obj.get("sentences") {
        Some(Value::Array(items)) => Some(join_values(items)),
        _ => None,
    }
}

fn joined_translation(obj: &Object) -> Option<String> {
    match obj.get("translation") {
        Some(Value::Array(items)) => Some(join_values(items)),
        _ => None,
    }
}

fn translation_object(obj: &Object) -> Option<String> {
    match obj.get("translation") {
        Some(Value::Object(inner)) => Some(
            first_string(inner, &TRANSLATION_OBJECT_KEYS)
                .or_else(|| first_string(inner, &["sentence"]))
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

/// Looks up `keys` in order and returns the first non-blank string, trimmed.
///
/// An object under a key is searched one level further on
/// [`NESTED_TEXT_KEYS`], an array under a key yields its first non-blank
/// string element. At that second level a string or an array of strings is
/// accepted; objects there are never searched.
fn first_string(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = obj.get(*key)?;
        let found = match value {
            Value::String(_) => non_blank_str(value),
            Value::Object(inner) => NESTED_TEXT_KEYS
                .iter()
                .find_map(|nested| match inner.get(*nested)? {
                    Value::Array(items) => first_non_blank(items),
                    other => non_blank_str(other),
                }),
            Value::Array(items) => first_non_blank(items),
            _ => None,
        };
        found.map(str::to_owned)
    })
}

fn alignments(obj: &Object) -> Vec<Value> {
    let candidate = ALIGNMENT_KEYS
        .iter()
        .find_map(|key| obj.get(*key).filter(|value| !value.is_null()));

    match candidate {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(wrapper)) => match (wrapper.get("pairs"), wrapper.get("items")) {
            (Some(Value::Array(pairs)), _) => pairs.clone(),
            (_, Some(Value::Array(items))) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_values_normalize_to_empty() {
        for value in [json!(null), json!("text"), json!(3), json!(["a", "b"])] {
            assert_eq!(normalize(&value), TranslationResult::default());
        }
    }

    #[test]
    fn candidate_keys_follow_priority_order() {
        let parsed = json!({
            "text": "last",
            "result": "fourth",
            "translated_text": "second",
        });
        assert_eq!(normalize(&parsed).text, "second");
    }

    #[test]
    fn blank_candidate_falls_through_to_next_key() {
        let parsed = json!({"translation": "   ", "translatedText": " Hallo "});
        assert_eq!(normalize(&parsed).text, "Hallo");
    }

    #[test]
    fn nested_object_candidate_is_searched_one_level() {
        let parsed = json!({"result": {"value": "Salut"}});
        assert_eq!(normalize(&parsed).text, "Salut");

        let parsed = json!({"translation": {"translation": "Olá"}});
        assert_eq!(normalize(&parsed).text, "Olá");
    }

    #[test]
    fn nested_lookup_stops_at_second_level() {
        let parsed = json!({"result": {"text": {"text": "too deep"}}});
        assert_eq!(normalize(&parsed).text, "");
    }

    #[test]
    fn nested_array_yields_first_non_blank_string() {
        let parsed = json!({"result": {"text": [null, "  ", " Hi "]}});
        assert_eq!(normalize(&parsed).text, "Hi");

        let parsed = json!({"result": {"text": [{"text": "too deep"}]}});
        assert_eq!(normalize(&parsed).text, "");
    }

    #[test]
    fn array_candidate_yields_first_non_blank_string() {
        let parsed = json!({"translation": [1, " ", "Hej", "ignored"]});
        assert_eq!(normalize(&parsed).text, "Hej");
    }

    #[test]
    fn sentences_are_joined_without_separator() {
        let parsed = json!({"sentences": ["A. ", "B."]});
        assert_eq!(
            normalize(&parsed),
            TranslationResult {
                text: "A. B.".into(),
                alignments: vec![],
            }
        );
    }

    #[test]
    fn sentences_take_precedence_over_translation_array() {
        let parsed = json!({"sentences": [], "translation": [1, 2]});
        assert_eq!(normalize(&parsed).text, "");
    }

    #[test]
    fn translation_array_without_strings_is_joined() {
        let parsed = json!({"translation": [1, 2]});
        assert_eq!(normalize(&parsed).text, "12");
    }

    #[test]
    fn translation_object_falls_back_to_content_and_sentence() {
        let parsed = json!({"translation": {"content": " Ahoj "}});
        assert_eq!(normalize(&parsed).text, "Ahoj");

        let parsed = json!({"translation": {"sentence": "Moi"}});
        assert_eq!(normalize(&parsed).text, "Moi");

        let parsed = json!({"translation": {"other": "nope"}});
        assert_eq!(normalize(&parsed).text, "");
    }

    #[test]
    fn mapping_pairs_resolve_independently_of_text() {
        let parsed = json!({"mapping": {"pairs": [[0, 0]]}});
        assert_eq!(
            normalize(&parsed),
            TranslationResult {
                text: String::new(),
                alignments: vec![json!([0, 0])],
            }
        );
    }

    #[test]
    fn alignment_wrapper_prefers_pairs_then_items() {
        let parsed = json!({"alignment": {"pairs": "bad", "items": [{"s": 1}]}});
        assert_eq!(normalize(&parsed).alignments, vec![json!({"s": 1})]);

        let parsed = json!({"word_alignment": {"other": []}});
        assert!(normalize(&parsed).alignments.is_empty());
    }

    #[test]
    fn first_defined_alignment_key_wins_even_if_unusable() {
        let parsed = json!({"alignments": null, "alignment": "x", "mapping": [[1, 1]]});
        assert!(normalize(&parsed).alignments.is_empty());

        let parsed = json!({"alignments": null, "wordAlignment": [[2, 3]]});
        assert_eq!(normalize(&parsed).alignments, vec![json!([2, 3])]);
    }

    #[test]
    fn canonical_result_normalizes_to_itself() {
        let canonical = TranslationResult {
            text: "Bonjour".into(),
            alignments: vec![json!({"s": 0, "t": 0})],
        };
        let value = serde_json::to_value(&canonical).expect("serializable");
        assert_eq!(normalize(&value), canonical);
    }
}
