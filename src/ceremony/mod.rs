mod authenticator;
mod config;
mod errors;
mod manager;
mod relying_party;
mod reporter;
mod transform;
mod types;

pub use authenticator::PlatformAuthenticator;
pub use errors::{AuthenticatorError, CeremonyError, RelyingPartyError};
pub use manager::CeremonyManager;
pub use relying_party::{HttpRelyingParty, RelyingParty};
pub use reporter::{StatusReporter, TracingReporter};
pub use transform::{
    decode_assertion_options, decode_registration_options, encode_assertion, encode_attestation,
    encode_credential,
};
pub use types::{
    AssertionCredential, AttestationCredential, AuthenticatorCredential, CapabilityResponse,
    CeremonySnapshot, CeremonyStatus, CredentialCreationOptions, CredentialRequestOptions,
    EncodedAssertion, EncodedAssertionResponse, EncodedAttestation, EncodedAttestationResponse,
    EncodedCeremonyResponse, RemovalRequest, UserEntity,
};
