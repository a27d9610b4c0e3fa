//! Multilingual testimonial records.
//!
//! - `field`: the per-language value map
//! - `codec`: text encoding used at the storage boundary, plus display fallback
//! - `record`: the testimonial record and its stored shape
//! - `sync`: fills every language from the source language

pub mod codec;
mod field;
mod record;
pub mod sync;

pub use field::MultilingualField;
pub use record::{StoredTestimonial, TestimonialField, TestimonialRecord};
pub use sync::synchronize;
