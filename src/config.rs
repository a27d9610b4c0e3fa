use anyhow::{Context, Result};

pub const DEFAULT_TRANSLATION_API_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_PRIVILEGED_ROLE: &str = "teacher";

#[derive(Debug, Clone)]
pub struct Config {
    // Auth backend (identity, roles, admin user API)
    pub auth_api_url: String,
    pub auth_service_key: String,

    // Translation provider
    pub translation_api_url: String,

    // Provisioning
    pub privileged_role: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            auth_api_url: std::env::var("AUTH_API_URL")
                .context("AUTH_API_URL not set")?
                .trim_end_matches('/')
                .to_string(),
            auth_service_key: std::env::var("AUTH_SERVICE_KEY")
                .context("AUTH_SERVICE_KEY not set")?,

            translation_api_url: std::env::var("TRANSLATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATION_API_URL.to_string()),

            privileged_role: std::env::var("PRIVILEGED_ROLE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRIVILEGED_ROLE.to_string()),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
