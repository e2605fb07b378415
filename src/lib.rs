//! passkey_ceremony - client-side orchestration of WebAuthn passkey ceremonies
//!
//! This crate drives the two passkey ceremonies an application needs against a
//! remote relying party: registering a new authenticator-bound credential
//! (attestation) and proving possession of it to remove it again (assertion),
//! plus tracking whether the active account currently has a registered
//! credential.
//!
//! The relying party and the platform authenticator are external collaborators
//! reached through the [`RelyingParty`] and [`PlatformAuthenticator`] traits.
//! [`CeremonyManager`] is the state machine tying them together; the UI layer
//! observes `{status, registered}` through [`CeremonyManager::subscribe`] and
//! triggers ceremonies with [`CeremonyManager::register`] and
//! [`CeremonyManager::remove`].

mod ceremony;
mod codec;

pub use ceremony::{
    AssertionCredential, AttestationCredential, AuthenticatorCredential, AuthenticatorError,
    CapabilityResponse, CeremonyError, CeremonyManager, CeremonySnapshot, CeremonyStatus,
    CredentialCreationOptions, CredentialRequestOptions, EncodedAssertion,
    EncodedAssertionResponse, EncodedAttestation, EncodedAttestationResponse,
    EncodedCeremonyResponse, HttpRelyingParty, PlatformAuthenticator, RelyingParty,
    RelyingPartyError, RemovalRequest, StatusReporter, TracingReporter, UserEntity,
    decode_assertion_options, decode_registration_options, encode_assertion, encode_attestation,
    encode_credential,
};

pub use codec::{CodecError, base64url_decode, base64url_encode};
