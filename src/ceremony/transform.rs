//! Transforms between the relying party's JSON payloads and the binary-bearing
//! structures the platform authenticator works with.
//!
//! Options flow inward: base64url fields are decoded, everything else passes
//! through untouched. Credentials flow outward: each binary payload is encoded
//! per ceremony kind. The orchestrator never assembles wire shapes itself.

use serde_json::Value;

use super::errors::CeremonyError;
use super::types::{
    AssertionCredential, AttestationCredential, AuthenticatorCredential,
    CredentialCreationOptions, CredentialRequestOptions, EncodedAssertion,
    EncodedAssertionResponse, EncodedAttestation, EncodedAttestationResponse,
    EncodedCeremonyResponse, UserEntity, WireAssertionOptions, WireRegistrationOptions,
};
use crate::codec::{base64url_decode, base64url_encode};

const PUBLIC_KEY_TYPE: &str = "public-key";

/// Decode the binary-bearing fields of server-issued registration options.
///
/// `challenge` and `user.id` are replaced by their decoded bytes; every other
/// field is carried through unchanged. A missing field or an invalid encoding
/// fails with [`CeremonyError::MalformedOptions`].
pub fn decode_registration_options(
    raw: Value,
) -> Result<CredentialCreationOptions, CeremonyError> {
    let wire: WireRegistrationOptions = serde_json::from_value(raw)
        .map_err(|e| CeremonyError::MalformedOptions(format!("registration options: {e}")))?;

    let challenge = base64url_decode(&wire.challenge)
        .map_err(|e| CeremonyError::MalformedOptions(format!("challenge: {e}")))?;
    let user_id = base64url_decode(&wire.user.id)
        .map_err(|e| CeremonyError::MalformedOptions(format!("user.id: {e}")))?;

    Ok(CredentialCreationOptions {
        challenge,
        user: UserEntity {
            id: user_id,
            name: wire.user.name,
            display_name: wire.user.display_name,
            extra: wire.user.extra,
        },
        extra: wire.extra,
    })
}

/// Decode the binary-bearing fields of server-issued assertion options.
/// Assertion options carry no user entity, only the challenge is decoded.
pub fn decode_assertion_options(raw: Value) -> Result<CredentialRequestOptions, CeremonyError> {
    let wire: WireAssertionOptions = serde_json::from_value(raw)
        .map_err(|e| CeremonyError::MalformedOptions(format!("assertion options: {e}")))?;

    let challenge = base64url_decode(&wire.challenge)
        .map_err(|e| CeremonyError::MalformedOptions(format!("challenge: {e}")))?;

    Ok(CredentialRequestOptions {
        challenge,
        extra: wire.extra,
    })
}

/// Encode an attestation credential for transport to the relying party.
pub fn encode_attestation(credential: &AttestationCredential) -> EncodedAttestation {
    EncodedAttestation {
        id: credential.id.clone(),
        type_: PUBLIC_KEY_TYPE.to_string(),
        response: EncodedAttestationResponse {
            client_data_json: base64url_encode(&credential.client_data_json),
            attestation_object: base64url_encode(&credential.attestation_object),
        },
    }
}

/// Encode an assertion credential for transport to the relying party.
pub fn encode_assertion(credential: &AssertionCredential) -> EncodedAssertion {
    EncodedAssertion {
        id: credential.id.clone(),
        type_: PUBLIC_KEY_TYPE.to_string(),
        response: EncodedAssertionResponse {
            client_data_json: base64url_encode(&credential.client_data_json),
            authenticator_data: base64url_encode(&credential.authenticator_data),
            signature: base64url_encode(&credential.signature),
            user_handle: credential
                .user_handle
                .as_deref()
                .map(base64url_encode),
        },
    }
}

/// Encode a credential for transport, selecting the payload fields by ceremony
/// kind. The two kinds produce disjoint shapes and are never mixed.
pub fn encode_credential(credential: &AuthenticatorCredential) -> EncodedCeremonyResponse {
    match credential {
        AuthenticatorCredential::Attestation(c) => {
            EncodedCeremonyResponse::Attestation(encode_attestation(c))
        }
        AuthenticatorCredential::Assertion(c) => {
            EncodedCeremonyResponse::Assertion(encode_assertion(c))
        }
    }
}
