//! The ceremony state machine.
//!
//! One [`CeremonyManager`] per authenticated account drives both ceremonies
//! end to end: fetch options, decode, invoke the platform authenticator,
//! encode, finalize, refresh the capability cell. The UI observes
//! `{status, registered}` through a watch channel and triggers ceremonies;
//! overlapping triggers are rejected rather than queued.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use super::authenticator::PlatformAuthenticator;
use super::errors::{CeremonyError, RelyingPartyError};
use super::relying_party::RelyingParty;
use super::reporter::StatusReporter;
use super::transform::{
    decode_assertion_options, decode_registration_options, encode_assertion, encode_attestation,
};
use super::types::{CeremonySnapshot, CeremonyStatus, RemovalRequest};
use crate::codec::base64url_encode;

/// Orchestrates passkey registration and removal against the relying party and
/// the platform authenticator, and owns the credential capability cell.
///
/// All collaborator failures are caught here; `register` and `remove` return a
/// [`CeremonyError`] describing the terminal outcome and never panic or leak
/// transport errors. The status cell moves `Idle -> InProgress -> {Idle, Failed}`
/// per invocation; a failed ceremony stays `Failed` until the next trigger
/// resets it to `InProgress`.
pub struct CeremonyManager {
    relying_party: Arc<dyn RelyingParty>,
    authenticator: Arc<dyn PlatformAuthenticator>,
    reporter: Arc<dyn StatusReporter>,
    state: watch::Sender<CeremonySnapshot>,
    refresh_gate: Mutex<()>,
}

impl CeremonyManager {
    pub fn new(
        relying_party: Arc<dyn RelyingParty>,
        authenticator: Arc<dyn PlatformAuthenticator>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            relying_party,
            authenticator,
            reporter,
            state: watch::Sender::new(CeremonySnapshot::default()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Subscribe to `{status, registered}` updates.
    ///
    /// The receiver observes every state transition; UI layers can await
    /// `changed()` or poll `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<CeremonySnapshot> {
        self.state.subscribe()
    }

    /// Current snapshot of ceremony status and capability.
    pub fn snapshot(&self) -> CeremonySnapshot {
        self.state.borrow().clone()
    }

    /// Whether the active account currently has a registered resident
    /// credential, as of the last successful refresh.
    pub fn is_registered(&self) -> bool {
        self.state.borrow().registered
    }

    pub fn status(&self) -> CeremonyStatus {
        self.state.borrow().status
    }

    /// Run the registration (attestation) ceremony end to end.
    ///
    /// On success the capability cell is re-fetched from the relying party and
    /// the status settles back on `Idle`. A refresh failure after a successful
    /// finalize is reported but does not fail the ceremony; the next refresh
    /// reconciles the cell.
    pub async fn register(&self) -> Result<(), CeremonyError> {
        self.enter_in_progress()?;
        match self.run_registration().await {
            Ok(()) => {
                self.refresh().await;
                self.set_status(CeremonyStatus::Idle);
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_registration(&self) -> Result<(), CeremonyError> {
        let raw = self
            .relying_party
            .begin_registration()
            .await
            .map_err(options_error)?;
        let options = decode_registration_options(raw)?;

        let credential = match self.authenticator.create(&options).await {
            Ok(Some(credential)) => credential,
            // No credential and a platform rejection are the same outcome: the
            // user or platform declined. No finalize call is made.
            Ok(None) => return Err(CeremonyError::AuthenticatorDeclined),
            Err(err) => {
                tracing::debug!("Authenticator create failed: {}", err);
                return Err(CeremonyError::AuthenticatorDeclined);
            }
        };

        let encoded = encode_attestation(&credential);
        self.relying_party
            .finish_registration(&encoded)
            .await
            .map_err(finalize_error)?;
        tracing::debug!("Registration finalized for credential {}", credential.id);
        Ok(())
    }

    /// Run the removal (assertion-for-removal) ceremony end to end.
    ///
    /// Mirrors `register`: the authenticator signs an assertion over the
    /// server-issued challenge, and the finalize call carries that original
    /// challenge so the relying party can re-validate it. Success leaves the
    /// capability cell false after the refresh.
    pub async fn remove(&self) -> Result<(), CeremonyError> {
        self.enter_in_progress()?;
        match self.run_removal().await {
            Ok(()) => {
                self.refresh().await;
                self.set_status(CeremonyStatus::Idle);
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_removal(&self) -> Result<(), CeremonyError> {
        let raw = self
            .relying_party
            .begin_assertion()
            .await
            .map_err(options_error)?;
        let options = decode_assertion_options(raw)?;

        let credential = match self.authenticator.get(&options).await {
            Ok(Some(credential)) => credential,
            Ok(None) => return Err(CeremonyError::AuthenticatorDeclined),
            Err(err) => {
                tracing::debug!("Authenticator get failed: {}", err);
                return Err(CeremonyError::AuthenticatorDeclined);
            }
        };

        let request = RemovalRequest {
            challenge: base64url_encode(&options.challenge),
            credential: encode_assertion(&credential),
        };
        self.relying_party
            .finish_assertion(&request)
            .await
            .map_err(finalize_error)?;
        tracing::debug!("Removal finalized for credential {}", credential.id);
        Ok(())
    }

    /// Refresh the capability cell from the relying party.
    ///
    /// Idempotent; overlapping calls are serialized so the cell settles on one
    /// consistent value instead of flickering. A failure sets the cell to
    /// false, logs, and reports once; it never propagates to the caller.
    pub async fn refresh(&self) {
        let _gate = self.refresh_gate.lock().await;
        match self.relying_party.capability().await {
            Ok(registered) => {
                self.state.send_modify(|s| s.registered = registered);
            }
            Err(err) => {
                tracing::warn!("Capability refresh failed: {}", err);
                self.state.send_modify(|s| s.registered = false);
                self.reporter
                    .report_failure(&CeremonyError::Network(err.to_string()));
            }
        }
    }

    // Atomic check-and-set on the status cell: entering a ceremony while
    // another is in progress returns Busy instead of queueing.
    fn enter_in_progress(&self) -> Result<(), CeremonyError> {
        let mut entered = false;
        self.state.send_if_modified(|s| {
            if s.status == CeremonyStatus::InProgress {
                false
            } else {
                s.status = CeremonyStatus::InProgress;
                entered = true;
                true
            }
        });
        if entered {
            Ok(())
        } else {
            Err(CeremonyError::Busy)
        }
    }

    fn set_status(&self, status: CeremonyStatus) {
        self.state.send_modify(|s| s.status = status);
    }

    // The reporter fires on entry into Failed, so a failure notifies exactly
    // once however often the snapshot is observed afterwards.
    fn fail(&self, err: &CeremonyError) {
        tracing::warn!("Ceremony failed: {}", err);
        self.set_status(CeremonyStatus::Failed);
        self.reporter.report_failure(err);
    }
}

fn options_error(err: RelyingPartyError) -> CeremonyError {
    match err {
        RelyingPartyError::Serde(msg) => CeremonyError::MalformedOptions(msg),
        other => CeremonyError::Network(other.to_string()),
    }
}

fn finalize_error(err: RelyingPartyError) -> CeremonyError {
    match err {
        RelyingPartyError::Rejected { status, body } => {
            CeremonyError::FinalizationRejected(format!("status {status}: {body}"))
        }
        other => CeremonyError::Network(other.to_string()),
    }
}
