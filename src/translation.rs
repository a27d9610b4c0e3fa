use crate::config::Config;
use crate::i18n::{Language, TranslationMetrics};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// A machine translation backend.
///
/// Implementations report failures as errors; callers that must never block
/// on the provider go through [`translate_with_fallback`] instead.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn request_translation(&self, text: &str, from: Language, to: Language)
        -> Result<String>;
}

/// Response body of the translation provider
#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Translator backed by a `GET ?q=<text>&langpair=<from>|<to>` HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.translation_api_url.clone())
    }
}

/// Build the language-pair token expected by the provider
fn language_pair(from: Language, to: Language) -> String {
    format!("{}|{}", from.code(), to.code())
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn request_translation(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String> {
        let langpair = language_pair(from, to);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .context("Failed to send request to translation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Translation API error ({}): {}", status, body);
        }

        let body: TranslationResponse = response
            .json()
            .await
            .context("Failed to parse translation API response")?;

        body.response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.trim().is_empty())
            .context("Translation response has no responseData.translatedText")
    }
}

/// Result of a best-effort translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    /// `true` when `value` came from the provider
    pub translated: bool,
    pub value: String,
}

impl TranslationOutcome {
    fn untranslated(text: &str) -> Self {
        Self {
            translated: false,
            value: text.to_string(),
        }
    }
}

/// Translate `text`, degrading to the untranslated text on any failure.
///
/// Blank input is returned as-is without calling the provider.
pub async fn translate_with_fallback<T: Translator + ?Sized>(
    translator: &T,
    text: &str,
    from: Language,
    to: Language,
) -> TranslationOutcome {
    let metrics = TranslationMetrics::global();

    if text.trim().is_empty() {
        metrics.record_skipped();
        return TranslationOutcome::untranslated(text);
    }

    metrics.record_api_call();
    let result = translator
        .request_translation(text, from, to)
        .await
        .and_then(|translated| {
            if translated.trim().is_empty() {
                anyhow::bail!("provider returned an empty translation");
            }
            Ok(translated)
        });

    match result {
        Ok(translated) => {
            debug!("Translated {} chars {} -> {}", text.len(), from, to);
            TranslationOutcome {
                translated: true,
                value: translated,
            }
        }
        Err(e) => {
            metrics.record_fallback();
            warn!(
                "Translation {} -> {} unavailable, keeping source text: {:#}",
                from, to, e
            );
            TranslationOutcome::untranslated(text)
        }
    }
}

/// Translate `text`, returning the original text when no translation is
/// available.
pub async fn translate_text<T: Translator + ?Sized>(
    translator: &T,
    text: &str,
    from: Language,
    to: Language,
) -> String {
    translate_with_fallback(translator, text, from, to)
        .await
        .value
}
