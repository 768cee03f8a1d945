use async_trait::async_trait;

use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult};

/// Contract every insurer portal adapter satisfies.
///
/// Callers cannot observe whether the adapter drives the browser
/// synchronously on a dedicated thread or suspends cooperatively; both
/// styles hide behind the same async operation.
#[async_trait]
pub trait EligibilityProvider: Send + Sync {
    /// Adapter name used in logs.
    fn name(&self) -> &str;

    /// Whether this adapter serves the given insurer code.
    fn handles(&self, insurer_code: &str) -> bool {
        self.name().eq_ignore_ascii_case(insurer_code)
    }

    /// Whether the adapter is usable (portal endpoint configured).
    fn is_active(&self) -> bool;

    fn inactive_reason(&self) -> Option<String> {
        None
    }

    /// One complete eligibility attempt: open a browser, authenticate,
    /// navigate, extract, close. The browser is released on every exit
    /// path, including failures raised mid-sequence.
    async fn check(
        &self,
        credential: &Credential,
        query: &EligibilityQuery,
    ) -> Result<EligibilityResult, EligibilityError>;
}

/// Phases of one eligibility run, in chronological order. `Init` and
/// `Closed` are the only phases during which no browser resource is held.
///
/// Artifacts are captured as soon as the result page is reached, before
/// field extraction, so evidence exists even when extraction then fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Init,
    BrowserOpen,
    LoggedIn,
    FormFilled,
    Submitted,
    ArtifactsSaved,
    ResultExtracted,
    Closed,
}

impl RunPhase {
    /// Moves the run forward. Phases only ever advance; `Closed` is
    /// reachable from any phase when a run aborts.
    pub fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            next > *self,
            "run phase must move forward: {:?} -> {:?}",
            self,
            next
        );
        tracing::debug!("run phase: {:?} -> {:?}", self, next);
        *self = next;
    }
}
