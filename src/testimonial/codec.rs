//! Storage encoding for multilingual fields.
//!
//! The store keeps each multilingual field as a JSON object serialized to
//! text, keyed by language code. Records written before multilingual
//! support hold plain text, which is read as the default language.

use super::MultilingualField;
use crate::i18n::Language;
use serde_json::{Map, Value};
use tracing::debug;

/// Decode a stored field.
///
/// Anything that is not a JSON object becomes the default language's value,
/// with every other language left empty.
pub fn decode(raw: &str) -> MultilingualField {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            let mut field = MultilingualField::new();
            for lang in Language::all() {
                if let Some(Value::String(text)) = map.get(lang.code()) {
                    field.set(lang, text.as_str());
                }
            }
            field
        }
        _ => {
            if !raw.is_empty() {
                debug!(
                    "Stored field is not a language map, reading it as '{}'",
                    Language::default_language()
                );
            }
            MultilingualField::with_value(Language::default_language(), raw)
        }
    }
}

/// Encode a field for storage.
pub fn encode(field: &MultilingualField) -> String {
    let map: Map<String, Value> = field
        .iter()
        .map(|(lang, text)| (lang.code().to_string(), Value::String(text.to_string())))
        .collect();

    Value::Object(map).to_string()
}

/// Pick the text to show for `requested`.
///
/// Falls back through the languages in priority order (fr, en, pt) when
/// the requested one is empty.
pub fn display(field: &MultilingualField, requested: Language) -> &str {
    let preferred = field.get(requested);
    if !preferred.is_empty() {
        return preferred;
    }

    field
        .iter()
        .map(|(_, text)| text)
        .find(|text| !text.is_empty())
        .unwrap_or("")
}
