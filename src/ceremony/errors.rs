use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur while driving a passkey ceremony.
///
/// Every collaborator failure is caught at the ceremony boundary and mapped
/// into one of these variants; nothing propagates past the orchestrator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CeremonyError {
    /// Another ceremony is already in progress for this account
    #[error("A ceremony is already in progress")]
    Busy,

    /// The relying party was unreachable or answered with a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// Server-issued options were missing required fields or carried invalid encodings
    #[error("Malformed options: {0}")]
    MalformedOptions(String),

    /// The platform authenticator produced no credential (user declined,
    /// dismissed the prompt, or the platform is unsupported). A terminal
    /// outcome, not a crash.
    #[error("Authenticator declined the request")]
    AuthenticatorDeclined,

    /// The relying party rejected the completed ceremony response,
    /// e.g. a signature or challenge mismatch
    #[error("Finalization rejected: {0}")]
    FinalizationRejected(String),
}

impl From<CodecError> for CeremonyError {
    fn from(err: CodecError) -> Self {
        CeremonyError::MalformedOptions(err.to_string())
    }
}

/// Errors surfaced by a relying-party transport.
#[derive(Debug, Error)]
pub enum RelyingPartyError {
    /// The service could not be reached or the request did not complete
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("Rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The response body could not be parsed
    #[error("Invalid response body: {0}")]
    Serde(String),

    /// The transport was misconfigured (bad base URL or client settings)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors surfaced by a platform authenticator.
///
/// The orchestrator folds all of these into
/// [`CeremonyError::AuthenticatorDeclined`]; the variants exist so
/// implementations can log what actually happened at the platform boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user dismissed the platform prompt
    #[error("User cancelled the authenticator prompt")]
    Cancelled,

    /// No platform authenticator is available
    #[error("Platform authenticator unsupported")]
    Unsupported,

    /// Any other platform-level failure
    #[error("{0}")]
    Other(String),
}
