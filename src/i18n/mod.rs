//! Internationalization (i18n) module.
//!
//! - `registry`: single source of truth for the supported languages
//! - `language`: type-safe, validated `Language`
//! - `metrics`: translation call and fallback counters
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::Language;
//!
//! let portuguese = Language::from_code("pt")?;
//! for lang in Language::all() {
//!     println!("{} ({})", lang.name(), lang.code());
//! }
//! ```

mod language;
mod metrics;
mod registry;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
