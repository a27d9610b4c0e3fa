use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A text value per supported language.
///
/// Every supported language always has an entry; unset values are empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "BTreeMap<String, String>")]
pub struct MultilingualField {
    values: HashMap<Language, String>,
}

impl MultilingualField {
    /// A field with every language set to `""`.
    pub fn new() -> Self {
        Self {
            values: Language::all()
                .into_iter()
                .map(|lang| (lang, String::new()))
                .collect(),
        }
    }

    /// A field whose `lang` value is `text` and every other value is empty.
    pub fn with_value(lang: Language, text: impl Into<String>) -> Self {
        let mut field = Self::new();
        field.set(lang, text);
        field
    }

    pub fn get(&self, lang: Language) -> &str {
        self.values.get(&lang).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, lang: Language, text: impl Into<String>) {
        self.values.insert(lang, text.into());
    }

    /// Languages and values in fallback priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> + '_ {
        Language::all()
            .into_iter()
            .map(move |lang| (lang, self.get(lang)))
    }

    /// True when no language has a non-blank value.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }
}

impl Default for MultilingualField {
    fn default() -> Self {
        Self::new()
    }
}

/// Unknown language codes are dropped and missing ones filled with `""`.
impl From<HashMap<String, String>> for MultilingualField {
    fn from(raw: HashMap<String, String>) -> Self {
        let mut field = Self::new();
        for (code, text) in raw {
            if let Ok(lang) = Language::from_code(&code) {
                field.set(lang, text);
            }
        }
        field
    }
}

impl From<MultilingualField> for BTreeMap<String, String> {
    fn from(field: MultilingualField) -> Self {
        field
            .values
            .into_iter()
            .map(|(lang, text)| (lang.code().to_string(), text))
            .collect()
    }
}
