use super::collaborators::{
    AccountCreator, AccountDescriptor, Identity, IdentityVerifier, LinkGenerator, LinkType,
    NewAccount, RoleStore, UserMetadata,
};
use super::ProvisionError;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Length of each random half of a one-time password
const PASSWORD_SEGMENT_LEN: usize = 12;

/// A request to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub preferred_language: String,
}

/// A created user and the link they use to set their own password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResult {
    pub user: AccountDescriptor,
    pub reset_link: String,
    pub message: String,
}

fn random_segment(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a one-time password from two independently drawn segments.
///
/// The password is never shown to anyone; the new user replaces it through
/// the recovery link.
pub fn generate_one_time_password() -> String {
    let first = random_segment(PASSWORD_SEGMENT_LEN);
    let second = random_segment(PASSWORD_SEGMENT_LEN);
    format!("{}{}", first, second)
}

/// Creates users on behalf of an authenticated, privileged caller.
///
/// Steps run strictly in order and the first failure ends the request.
pub struct Provisioner {
    identity: Arc<dyn IdentityVerifier>,
    roles: Arc<dyn RoleStore>,
    accounts: Arc<dyn AccountCreator>,
    links: Arc<dyn LinkGenerator>,
    privileged_role: String,
}

impl Provisioner {
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        roles: Arc<dyn RoleStore>,
        accounts: Arc<dyn AccountCreator>,
        links: Arc<dyn LinkGenerator>,
        privileged_role: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            roles,
            accounts,
            links,
            privileged_role: privileged_role.into(),
        }
    }

    /// Use one backend for all four collaborators.
    pub fn with_backend<B>(backend: Arc<B>, privileged_role: impl Into<String>) -> Self
    where
        B: IdentityVerifier + RoleStore + AccountCreator + LinkGenerator + 'static,
    {
        Self::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            privileged_role,
        )
    }

    pub async fn provision(
        &self,
        bearer_token: Option<&str>,
        request: &ProvisionRequest,
    ) -> Result<ProvisionResult, ProvisionError> {
        let caller = self.authorize(bearer_token).await?;
        self.create_user(&caller, request).await
    }

    /// Resolve the caller and check that they hold the privileged role.
    pub async fn authorize(&self, bearer_token: Option<&str>) -> Result<Identity, ProvisionError> {
        // Authenticate
        let token = bearer_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProvisionError::Unauthenticated)?;

        let identity = match self.identity.verify(token).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                warn!("Provisioning refused: credential did not resolve to a user");
                return Err(ProvisionError::Unauthenticated);
            }
            Err(e) => {
                warn!("Provisioning refused: identity check failed: {:#}", e);
                return Err(ProvisionError::Unauthenticated);
            }
        };

        // Authorize
        let role = self.roles.role_for(&identity).await.map_err(|e| {
            error!("Role lookup failed for user {}: {:#}", identity.id, e);
            ProvisionError::AuthzLookupFailed
        })?;

        if role.as_deref() != Some(self.privileged_role.as_str()) {
            warn!(
                "Provisioning refused: user {} has role {:?}",
                identity.id, role
            );
            return Err(ProvisionError::Forbidden {
                role: self.privileged_role.clone(),
            });
        }

        Ok(identity)
    }

    /// Create the account and its recovery link for an authorized caller.
    pub async fn create_user(
        &self,
        caller: &Identity,
        request: &ProvisionRequest,
    ) -> Result<ProvisionResult, ProvisionError> {
        // Create the account
        let account = NewAccount {
            email: request.email.clone(),
            password: generate_one_time_password(),
            email_confirmed: true,
            metadata: UserMetadata {
                full_name: request.full_name.clone(),
                role: request.role.clone(),
                preferred_language: request.preferred_language.clone(),
            },
        };

        let user = self
            .accounts
            .create_account(&account)
            .await
            .map_err(|e| {
                warn!("Account creation requested by {} failed: {:#}", caller.id, e);
                ProvisionError::AccountCreationFailed(e.to_string())
            })?;

        // Issue the recovery link
        let reset_link = self
            .links
            .generate_link(LinkType::Recovery, &request.email)
            .await
            .map_err(|e| {
                warn!("Recovery link generation failed for user {}: {:#}", user.id, e);
                ProvisionError::LinkGenerationFailed(e.to_string())
            })?;

        info!(
            "User {} created by {} with role {}",
            user.id, caller.id, request.role
        );

        Ok(ProvisionResult {
            user,
            reset_link,
            message: "User created successfully".to_string(),
        })
    }
}
