//! HTTP client for the hosted auth backend.
//!
//! One service covers identity (`/auth/v1/user`), profile roles
//! (`/rest/v1/profiles`) and the admin user API (`/auth/v1/admin/*`).
//! Admin and profile calls authenticate with the service key.

use super::collaborators::{
    AccountCreator, AccountDescriptor, Identity, IdentityVerifier, LinkGenerator, LinkType,
    NewAccount, RoleStore, UserMetadata,
};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AuthApiClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: &'a UserMetadata,
}

#[derive(Debug, Serialize)]
struct GenerateLinkRequest<'a> {
    #[serde(rename = "type")]
    link_type: &'static str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateLinkResponse {
    action_link: Option<String>,
    properties: Option<LinkProperties>,
}

#[derive(Debug, Deserialize)]
struct LinkProperties {
    action_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

/// Pull a readable message out of an error response.
///
/// Looks at the fields the backend uses for error text, then falls back to
/// the raw body and finally the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fail with the backend's own message on a non-2xx response.
async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("{}", error_message(status, &body))
}

impl AuthApiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.auth_api_url.clone(),
            config.auth_service_key.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authenticated with the service key.
    fn service_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }
}

#[async_trait]
impl IdentityVerifier for AuthApiClient {
    async fn verify(&self, bearer_token: &str) -> Result<Option<Identity>> {
        let response = self
            .client
            .get(self.url("/auth/v1/user"))
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .send()
            .await
            .context("Failed to send identity request")?;

        if !response.status().is_success() {
            debug!("Identity check rejected with {}", response.status());
            return Ok(None);
        }

        let identity: Identity = response
            .json()
            .await
            .context("Failed to parse identity response")?;

        Ok(Some(identity))
    }
}

#[async_trait]
impl RoleStore for AuthApiClient {
    async fn role_for(&self, identity: &Identity) -> Result<Option<String>> {
        let id_filter = format!("eq.{}", identity.id);
        let response = self
            .service_request(self.client.get(self.url("/rest/v1/profiles")))
            .query(&[("id", id_filter.as_str()), ("select", "role")])
            .send()
            .await
            .context("Failed to send profile request")?;

        let rows: Vec<ProfileRow> = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse profile response")?;

        let row = rows
            .into_iter()
            .next()
            .with_context(|| format!("No profile found for user {}", identity.id))?;

        Ok(row.role)
    }
}

#[async_trait]
impl AccountCreator for AuthApiClient {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountDescriptor> {
        let request = CreateUserRequest {
            email: &account.email,
            password: &account.password,
            email_confirm: account.email_confirmed,
            user_metadata: &account.metadata,
        };

        let response = self
            .service_request(self.client.post(self.url("/auth/v1/admin/users")))
            .json(&request)
            .send()
            .await
            .context("Failed to send create user request")?;

        ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse created user")
    }
}

#[async_trait]
impl LinkGenerator for AuthApiClient {
    async fn generate_link(&self, link_type: LinkType, email: &str) -> Result<String> {
        let request = GenerateLinkRequest {
            link_type: link_type.as_str(),
            email,
        };

        let response = self
            .service_request(self.client.post(self.url("/auth/v1/admin/generate_link")))
            .json(&request)
            .send()
            .await
            .context("Failed to send generate link request")?;

        let body: GenerateLinkResponse = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse generated link")?;

        body.action_link
            .or_else(|| body.properties.and_then(|p| p.action_link))
            .filter(|link| !link.is_empty())
            .context("Generated link response has no action_link")
    }
}
