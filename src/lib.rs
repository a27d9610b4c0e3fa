//! Multilingual testimonial synchronization and role-gated user provisioning.
//!
//! - [`testimonial`]: multilingual records, their storage codec and the
//!   locale sync engine
//! - [`translation`]: best-effort machine translation client
//! - [`provisioning`]: authenticated, role-checked account creation
//! - [`server`]: the HTTP surface for both

pub mod config;
pub mod i18n;
pub mod provisioning;
pub mod server;
pub mod testimonial;
pub mod translation;
