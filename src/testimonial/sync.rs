//! Locale synchronization for testimonial records.
//!
//! The source language is authoritative. Every other supported language is
//! rebuilt from it: translatable fields go through the translator, the
//! geographic ones are copied verbatim.

use super::{TestimonialField, TestimonialRecord};
use crate::i18n::Language;
use crate::translation::{translate_with_fallback, Translator};
use futures::future::join_all;
use tracing::{info, warn};

/// Fill every language of `record` from its `source` language.
///
/// All translations run concurrently and are awaited before the record is
/// returned. Provider failures leave the untranslated source text in place.
/// Existing target values are overwritten.
pub async fn synchronize<T: Translator + ?Sized>(
    translator: &T,
    mut record: TestimonialRecord,
    source: Language,
) -> TestimonialRecord {
    record.source_language = source;

    let targets: Vec<Language> = Language::all()
        .into_iter()
        .filter(|lang| *lang != source)
        .collect();

    let mut jobs = Vec::new();
    for field in TestimonialField::ALL {
        let source_text = record.field(field).get(source).to_string();

        if !field.is_translatable() {
            for &target in &targets {
                record.field_mut(field).set(target, source_text.as_str());
            }
            continue;
        }

        for &target in &targets {
            let text = source_text.clone();
            jobs.push(async move {
                let outcome = translate_with_fallback(translator, &text, source, target).await;
                (field, target, outcome)
            });
        }
    }

    let outcomes = join_all(jobs).await;

    let mut translated = 0;
    let mut degraded = 0;
    for (field, target, outcome) in outcomes {
        if outcome.translated {
            translated += 1;
        } else if !outcome.value.trim().is_empty() {
            degraded += 1;
            warn!(
                "Kept {} source text for {} ({})",
                source,
                field.name(),
                target
            );
        }
        record.field_mut(field).set(target, outcome.value);
    }

    info!(
        "Synchronized testimonial from {}: {} translated, {} kept in source language",
        source, translated, degraded
    );

    record
}
