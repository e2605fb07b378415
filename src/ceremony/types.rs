use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-issued registration options as received on the wire.
///
/// `challenge` and `user.id` arrive as base64url strings; every other field
/// the server sends (relying party entity, credential parameters, timeouts,
/// extensions) is carried through untouched in `extra` so the transform never
/// has to know the full option surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireRegistrationOptions {
    pub(super) challenge: String,
    pub(super) user: WireUserEntity,
    #[serde(flatten)]
    pub(super) extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireUserEntity {
    pub(super) id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) display_name: String,
    #[serde(flatten)]
    pub(super) extra: Map<String, Value>,
}

/// Server-issued assertion options as received on the wire.
/// Assertion options have no user entity, only the challenge is binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireAssertionOptions {
    pub(super) challenge: String,
    #[serde(flatten)]
    pub(super) extra: Map<String, Value>,
}

/// Capability answer from the relying party.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResponse {
    pub is_enabled: bool,
}

/// Options handed to the platform authenticator's `create` call.
/// The binary-bearing fields are decoded; everything else rides in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialCreationOptions {
    pub challenge: Vec<u8>,
    pub user: UserEntity,
    pub extra: Map<String, Value>,
}

/// Account entity for a registration ceremony, with the user handle decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
    pub extra: Map<String, Value>,
}

/// Options handed to the platform authenticator's `get` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRequestOptions {
    pub challenge: Vec<u8>,
    pub extra: Map<String, Value>,
}

/// Raw credential returned by a successful `create` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationCredential {
    pub id: String,
    pub client_data_json: Vec<u8>,
    pub attestation_object: Vec<u8>,
}

/// Raw credential returned by a successful `get` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    pub id: String,
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// Tagged union over the two ceremony kinds.
///
/// Attestation and assertion payloads are disjoint shapes; consumers match on
/// the kind instead of probing for field presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorCredential {
    Attestation(AttestationCredential),
    Assertion(AssertionCredential),
}

impl AuthenticatorCredential {
    /// Credential identifier, already string-safe in both kinds.
    pub fn id(&self) -> &str {
        match self {
            AuthenticatorCredential::Attestation(c) => &c.id,
            AuthenticatorCredential::Assertion(c) => &c.id,
        }
    }
}

/// JSON-safe form of an attestation credential, ready for transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedAttestation {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: EncodedAttestationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedAttestationResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
}

/// JSON-safe form of an assertion credential, ready for transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedAssertion {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: EncodedAssertionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedAssertionResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String,
    #[serde(rename = "userHandle", skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

/// Encoded ceremony response, shaped per ceremony kind.
///
/// Produced exclusively by the transform module; the orchestrator never
/// assembles these structures by hand.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EncodedCeremonyResponse {
    Attestation(EncodedAttestation),
    Assertion(EncodedAssertion),
}

/// Body of the removal finalize call: the assertion response merged with the
/// original challenge, which the removal endpoint re-validates.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemovalRequest {
    pub challenge: String,
    #[serde(flatten)]
    pub credential: EncodedAssertion,
}

/// Transient, UI-facing ceremony state. Never persisted; reset on each
/// invocation. A completed ceremony settles back on `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CeremonyStatus {
    #[default]
    Idle,
    InProgress,
    Failed,
}

/// Snapshot observed by the UI layer: current ceremony status plus whether the
/// active account has a registered resident credential.
///
/// `registered` starts out false and stays false until the first successful
/// capability refresh; readers must tolerate that transient value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CeremonySnapshot {
    pub status: CeremonyStatus,
    pub registered: bool,
}
