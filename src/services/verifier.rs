//! Entry point the clinic backend calls into: resolves the insurer
//! adapter, bounds concurrent browser runs, applies the retry policy and
//! hands back the canonical record.

use std::sync::Arc;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult};
use crate::providers::{EligibilityProvider, ProviderRegistry};
use crate::services::runner::{run_with_retry, RetryPolicy};
use crate::utils::mask_sensitive;

pub struct EligibilityService {
    registry: Arc<ProviderRegistry>,
    policy: RetryPolicy,
    run_permits: Arc<Semaphore>,
}

impl EligibilityService {
    pub fn new(config: Arc<Config>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            policy: RetryPolicy::from_config(&config),
            run_permits: Arc::new(Semaphore::new(config.max_concurrent_runs)),
            registry,
        }
    }

    /// Verifies one patient against one insurer portal.
    ///
    /// Unknown insurer codes come back as a "skipped" record without any
    /// navigation; every other outcome is either a fully populated result
    /// or a typed error.
    pub async fn verify(
        &self,
        credential: &Credential,
        query: &EligibilityQuery,
    ) -> Result<EligibilityResult, EligibilityError> {
        let run_id = Uuid::new_v4();
        tracing::info!(
            "🚀 Verification run {} started: insurer={} eid={}",
            run_id,
            query.insurer(),
            mask_sensitive(query.emirates_id())
        );

        let Some(provider) = self.registry.resolve(query.insurer()) else {
            tracing::warn!(
                "⏸️ Insurer {:?} has no portal adapter, skipping",
                query.insurer()
            );
            return Ok(EligibilityResult::skipped(
                query.emirates_id(),
                format!("No portal adapter for insurer '{}'", query.insurer()),
            ));
        };

        if !provider.is_active() {
            return Err(EligibilityError::ProviderInactive(
                provider
                    .inactive_reason()
                    .unwrap_or_else(|| provider.name().to_string()),
            ));
        }

        // One seat in the bounded run pool per verification.
        let _permit = self
            .run_permits
            .acquire()
            .await
            .map_err(|e| EligibilityError::BrowserSetup(format!("run pool closed: {}", e)))?;

        tracing::info!("⏳ {} - running eligibility check...", provider.name());
        let outcome = run_with_retry(&self.policy, |_| provider.check(credential, query)).await;

        match &outcome {
            Ok(result) => {
                tracing::info!("✅ Run {} finished: {}", run_id, result.is_eligible);
            }
            Err(e) => {
                tracing::error!("❌ Run {} failed: {}", run_id, e);
            }
        }

        outcome
    }
}
