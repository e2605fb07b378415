use async_trait::async_trait;

use super::errors::AuthenticatorError;
use super::types::{
    AssertionCredential, AttestationCredential, CredentialCreationOptions,
    CredentialRequestOptions,
};

/// Boundary to the platform authenticator (secure hardware or OS keystore).
///
/// Mirrors the platform credential API: `create` mints a new credential for a
/// registration ceremony, `get` produces a signed assertion over an existing
/// one. Both suspend while the platform prompts the user. "No credential" is a
/// legitimate terminal outcome reported as `Ok(None)`; platform rejections
/// (dismissed prompt, unsupported hardware) surface as errors. The orchestrator
/// folds both into a single declined outcome, so implementations do not need to
/// distinguish them unless they want richer logging.
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    /// Ask the platform to create a new credential bound to this account.
    async fn create(
        &self,
        options: &CredentialCreationOptions,
    ) -> Result<Option<AttestationCredential>, AuthenticatorError>;

    /// Ask the platform to sign an assertion with a previously registered
    /// credential.
    async fn get(
        &self,
        options: &CredentialRequestOptions,
    ) -> Result<Option<AssertionCredential>, AuthenticatorError>;
}
