mod eligibility;
mod extract;
mod selectors;
mod session;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult};
use crate::providers::base::EligibilityProvider;

/// Jet portal adapter, serving the NAS and Neuron service networks.
///
/// Drives Chrome through the synchronous `headless_chrome` API; each check
/// occupies one dedicated blocking thread for its whole duration.
pub struct JetProvider {
    config: Arc<Config>,
}

impl JetProvider {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EligibilityProvider for JetProvider {
    fn name(&self) -> &str {
        "Jet"
    }

    fn handles(&self, insurer_code: &str) -> bool {
        matches!(
            insurer_code.to_ascii_lowercase().as_str(),
            "nas" | "neuron"
        )
    }

    fn is_active(&self) -> bool {
        !self.config.jet_base_url.is_empty()
    }

    fn inactive_reason(&self) -> Option<String> {
        (!self.is_active()).then(|| "Jet portal URL not configured".to_string())
    }

    async fn check(
        &self,
        credential: &Credential,
        query: &EligibilityQuery,
    ) -> Result<EligibilityResult, EligibilityError> {
        let config = self.config.clone();
        let credential = credential.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || session::run_once(&config, &credential, &query))
            .await
            .map_err(|e| EligibilityError::BrowserSetup(format!("verification thread: {}", e)))?
    }
}
