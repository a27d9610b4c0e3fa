//! Role-gated user provisioning.
//!
//! A caller is authenticated from their bearer token, authorized by role,
//! and only then is an account created and a recovery link issued so the
//! new user can choose their own password.

mod auth_api;
pub mod collaborators;
mod error;
mod workflow;

pub use auth_api::AuthApiClient;
pub use collaborators::{
    AccountCreator, AccountDescriptor, Identity, IdentityVerifier, LinkGenerator, LinkType,
    NewAccount, RoleStore, UserMetadata,
};
pub use error::{ErrorBody, ProvisionError};
pub use workflow::{generate_one_time_password, ProvisionRequest, ProvisionResult, Provisioner};
