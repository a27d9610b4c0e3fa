use super::{codec, MultilingualField};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};

/// The multilingual fields of a testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestimonialField {
    Text,
    AuthorName,
    City,
    State,
}

impl TestimonialField {
    pub const ALL: [TestimonialField; 4] = [
        TestimonialField::Text,
        TestimonialField::AuthorName,
        TestimonialField::City,
        TestimonialField::State,
    ];

    /// Geographic names are copied across languages instead of translated.
    pub fn is_translatable(self) -> bool {
        matches!(self, TestimonialField::Text | TestimonialField::AuthorName)
    }

    pub fn name(self) -> &'static str {
        match self {
            TestimonialField::Text => "text",
            TestimonialField::AuthorName => "author_name",
            TestimonialField::City => "city",
            TestimonialField::State => "state",
        }
    }
}

fn default_active() -> bool {
    true
}

/// A testimonial as edited in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialRecord {
    #[serde(default)]
    pub text: MultilingualField,
    #[serde(default)]
    pub author_name: MultilingualField,
    #[serde(default)]
    pub city: MultilingualField,
    #[serde(default)]
    pub state: MultilingualField,
    pub source_language: Language,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A testimonial in the flattened shape handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTestimonial {
    pub text: String,
    pub author_name: String,
    pub city: String,
    pub state: String,
    pub source_language: Language,
    pub active: bool,
}

impl TestimonialRecord {
    /// An active record with every field empty.
    pub fn new(source_language: Language) -> Self {
        Self {
            text: MultilingualField::new(),
            author_name: MultilingualField::new(),
            city: MultilingualField::new(),
            state: MultilingualField::new(),
            source_language,
            active: true,
        }
    }

    pub fn field(&self, field: TestimonialField) -> &MultilingualField {
        match field {
            TestimonialField::Text => &self.text,
            TestimonialField::AuthorName => &self.author_name,
            TestimonialField::City => &self.city,
            TestimonialField::State => &self.state,
        }
    }

    pub fn field_mut(&mut self, field: TestimonialField) -> &mut MultilingualField {
        match field {
            TestimonialField::Text => &mut self.text,
            TestimonialField::AuthorName => &mut self.author_name,
            TestimonialField::City => &mut self.city,
            TestimonialField::State => &mut self.state,
        }
    }

    pub fn to_stored(&self) -> StoredTestimonial {
        StoredTestimonial {
            text: codec::encode(&self.text),
            author_name: codec::encode(&self.author_name),
            city: codec::encode(&self.city),
            state: codec::encode(&self.state),
            source_language: self.source_language,
            active: self.active,
        }
    }

    pub fn from_stored(stored: &StoredTestimonial) -> Self {
        Self {
            text: codec::decode(&stored.text),
            author_name: codec::decode(&stored.author_name),
            city: codec::decode(&stored.city),
            state: codec::decode(&stored.state),
            source_language: stored.source_language,
            active: stored.active,
        }
    }
}
