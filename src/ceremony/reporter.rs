use super::errors::CeremonyError;

/// Sink for terminal ceremony failures, implemented by the UI layer.
///
/// The orchestrator calls this exactly once per failed transition, on entry
/// into the failed state, so implementations can show a notification directly
/// without deduplicating against re-renders or polling.
pub trait StatusReporter: Send + Sync {
    fn report_failure(&self, error: &CeremonyError);
}

/// Reporter that logs failures through `tracing`.
///
/// Useful as a default when no UI notification channel is wired up yet.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn report_failure(&self, error: &CeremonyError) {
        tracing::error!("Passkey ceremony failed: {}", error);
    }
}
