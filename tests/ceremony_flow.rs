//! End-to-end ceremony flows over the public API, with in-memory collaborators
//! standing in for the relying party and the platform authenticator.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use passkey_ceremony::{
    AssertionCredential, AttestationCredential, AuthenticatorError, CeremonyError,
    CeremonyManager, CeremonyStatus, CredentialCreationOptions, CredentialRequestOptions,
    EncodedAttestation, PlatformAuthenticator, RelyingParty, RelyingPartyError, RemovalRequest,
    StatusReporter, base64url_decode, base64url_encode,
};

/// In-memory relying party that verifies the finalize payloads the way a real
/// server would: the attestation must echo a credential, and the removal
/// request must carry the challenge issued by `begin_assertion`.
#[derive(Default)]
struct InMemoryRelyingParty {
    registered: AtomicBool,
    issued_removal_challenge: StdMutex<Option<String>>,
}

#[async_trait]
impl RelyingParty for InMemoryRelyingParty {
    async fn capability(&self) -> Result<bool, RelyingPartyError> {
        Ok(self.registered.load(Ordering::SeqCst))
    }

    async fn begin_registration(&self) -> Result<Value, RelyingPartyError> {
        Ok(json!({
            "challenge": base64url_encode(b"attest-me"),
            "user": {
                "id": base64url_encode(b"account-42"),
                "name": "ferris",
                "displayName": "Ferris the Crab"
            },
            "rp": { "id": "example.com", "name": "Example" },
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }]
        }))
    }

    async fn finish_registration(
        &self,
        response: &EncodedAttestation,
    ) -> Result<(), RelyingPartyError> {
        if response.id.is_empty() || response.response.attestation_object.is_empty() {
            return Err(RelyingPartyError::Rejected {
                status: 400,
                body: "incomplete attestation".into(),
            });
        }
        // The payload must decode with the agreed codec
        base64url_decode(&response.response.attestation_object)
            .map_err(|e| RelyingPartyError::Rejected {
                status: 400,
                body: e.to_string(),
            })?;
        self.registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn begin_assertion(&self) -> Result<Value, RelyingPartyError> {
        let challenge = base64url_encode(b"prove-it");
        *self.issued_removal_challenge.lock().unwrap() = Some(challenge.clone());
        Ok(json!({
            "challenge": challenge,
            "rpId": "example.com",
            "allowCredentials": [{ "type": "public-key", "id": "cred-1" }]
        }))
    }

    async fn finish_assertion(&self, request: &RemovalRequest) -> Result<(), RelyingPartyError> {
        let issued = self.issued_removal_challenge.lock().unwrap().clone();
        if issued.as_deref() != Some(request.challenge.as_str()) {
            return Err(RelyingPartyError::Rejected {
                status: 409,
                body: "stale challenge".into(),
            });
        }
        self.registered.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Authenticator double that signs whatever challenge it is handed.
/// With a gate installed, `create` parks until notified so tests can observe
/// the ceremony mid-flight.
#[derive(Default)]
struct ScriptedAuthenticator {
    decline_all: AtomicBool,
    gate: Option<Arc<tokio::sync::Notify>>,
}

#[async_trait]
impl PlatformAuthenticator for ScriptedAuthenticator {
    async fn create(
        &self,
        options: &CredentialCreationOptions,
    ) -> Result<Option<AttestationCredential>, AuthenticatorError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.decline_all.load(Ordering::SeqCst) {
            return Ok(None);
        }
        assert_eq!(options.challenge, b"attest-me");
        assert_eq!(options.user.id, b"account-42");
        Ok(Some(AttestationCredential {
            id: "cred-1".to_string(),
            client_data_json: b"{\"type\":\"webauthn.create\"}".to_vec(),
            attestation_object: vec![0xa3, 0x63, 0x66, 0x6d, 0x74],
        }))
    }

    async fn get(
        &self,
        options: &CredentialRequestOptions,
    ) -> Result<Option<AssertionCredential>, AuthenticatorError> {
        if self.decline_all.load(Ordering::SeqCst) {
            return Ok(None);
        }
        assert_eq!(options.challenge, b"prove-it");
        Ok(Some(AssertionCredential {
            id: "cred-1".to_string(),
            client_data_json: b"{\"type\":\"webauthn.get\"}".to_vec(),
            authenticator_data: vec![0u8; 37],
            signature: vec![0x30, 0x45, 0x02, 0x20],
            user_handle: Some(b"account-42".to_vec()),
        }))
    }
}

#[derive(Default)]
struct CollectingReporter {
    failures: StdMutex<Vec<CeremonyError>>,
    count: AtomicUsize,
}

impl StatusReporter for CollectingReporter {
    fn report_failure(&self, error: &CeremonyError) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.failures.lock().unwrap().push(error.clone());
    }
}

fn build_manager() -> (
    Arc<InMemoryRelyingParty>,
    Arc<ScriptedAuthenticator>,
    Arc<CollectingReporter>,
    CeremonyManager,
) {
    let relying_party = Arc::new(InMemoryRelyingParty::default());
    let authenticator = Arc::new(ScriptedAuthenticator::default());
    let reporter = Arc::new(CollectingReporter::default());
    let manager = CeremonyManager::new(
        relying_party.clone(),
        authenticator.clone(),
        reporter.clone(),
    );
    (relying_party, authenticator, reporter, manager)
}

/// Full lifecycle: mount refresh, register, remove, observed via subscription
#[tokio::test]
async fn test_register_then_remove_lifecycle() {
    let (_rp, _auth, reporter, manager) = build_manager();
    let mut updates = manager.subscribe();

    // Mount-time refresh on an account with no credential
    manager.refresh().await;
    assert!(!manager.is_registered());

    manager.register().await.expect("registration failed");
    assert!(manager.is_registered());
    assert_eq!(manager.status(), CeremonyStatus::Idle);

    manager.remove().await.expect("removal failed");
    assert!(!manager.is_registered());
    assert_eq!(manager.status(), CeremonyStatus::Idle);
    assert_eq!(reporter.count.load(Ordering::SeqCst), 0);

    // The subscription saw the terminal state too
    updates.mark_changed();
    updates.changed().await.expect("sender dropped");
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.status, CeremonyStatus::Idle);
    assert!(!snapshot.registered);
}

/// A subscriber watching during a registration observes the InProgress state
#[tokio::test]
async fn test_subscription_observes_in_progress() {
    let relying_party = Arc::new(InMemoryRelyingParty::default());
    let gate = Arc::new(tokio::sync::Notify::new());
    let authenticator = Arc::new(ScriptedAuthenticator {
        gate: Some(gate.clone()),
        ..ScriptedAuthenticator::default()
    });
    let reporter = Arc::new(CollectingReporter::default());
    let manager = Arc::new(CeremonyManager::new(
        relying_party,
        authenticator,
        reporter,
    ));

    let mut updates = manager.subscribe();
    let runner = manager.clone();
    let ceremony = tokio::spawn(async move { runner.register().await });

    // The ceremony is parked inside the authenticator; the last update the
    // subscriber can see is the InProgress transition.
    updates.changed().await.expect("sender dropped");
    assert_eq!(
        updates.borrow_and_update().status,
        CeremonyStatus::InProgress
    );

    gate.notify_one();
    let result = ceremony.await.expect("ceremony panicked");
    assert!(result.is_ok(), "Expected Ok, got {result:?}");
    assert_eq!(updates.borrow_and_update().status, CeremonyStatus::Idle);
}

/// Declined authenticator: one notification, account state untouched
#[tokio::test]
async fn test_declined_registration_reports_once() {
    let (rp, auth, reporter, manager) = build_manager();
    auth.decline_all.store(true, Ordering::SeqCst);

    let result = manager.register().await;
    assert_eq!(result, Err(CeremonyError::AuthenticatorDeclined));
    assert_eq!(manager.status(), CeremonyStatus::Failed);
    assert_eq!(reporter.count.load(Ordering::SeqCst), 1);
    assert!(!rp.registered.load(Ordering::SeqCst));

    let failures = reporter.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0], CeremonyError::AuthenticatorDeclined);
}

/// The removal finalize call carries the exact challenge the server issued
#[tokio::test]
async fn test_removal_replays_issued_challenge() {
    let (rp, _auth, _reporter, manager) = build_manager();
    manager.register().await.expect("registration failed");

    manager.remove().await.expect("removal failed");
    // finish_assertion would have rejected with 409 on any other challenge
    assert!(!rp.registered.load(Ordering::SeqCst));
}
