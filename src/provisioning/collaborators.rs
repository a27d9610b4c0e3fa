//! External services the provisioning workflow depends on.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile data attached to a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: String,
    pub role: String,
    pub preferred_language: String,
}

/// Everything needed to create an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    /// Create the account with its email already confirmed
    pub email_confirmed: bool,
    pub metadata: UserMetadata,
}

/// The account as returned by the account service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDescriptor {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Recovery,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Recovery => "recovery",
        }
    }
}

/// Resolves a bearer credential to an identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// `Ok(None)` when the credential does not identify anyone.
    async fn verify(&self, bearer_token: &str) -> Result<Option<Identity>>;
}

/// Looks up the role of an identity.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// `Ok(None)` when the profile exists but has no role.
    async fn role_for(&self, identity: &Identity) -> Result<Option<String>>;
}

#[async_trait]
pub trait AccountCreator: Send + Sync {
    /// Errors carry a message that is safe to show to the caller.
    async fn create_account(&self, account: &NewAccount) -> Result<AccountDescriptor>;
}

#[async_trait]
pub trait LinkGenerator: Send + Sync {
    /// Returns the action URL of the generated link.
    async fn generate_link(&self, link_type: LinkType, email: &str) -> Result<String>;
}
