mod check;
mod selectors;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult};
use crate::providers::base::EligibilityProvider;

/// NextCare "Pulse" portal adapter.
///
/// Drives Chrome over CDP and suspends cooperatively at every network/DOM
/// wait point, so many runs can interleave on the runtime without
/// dedicated threads.
pub struct NextCareProvider {
    config: Arc<Config>,
}

impl NextCareProvider {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EligibilityProvider for NextCareProvider {
    fn name(&self) -> &str {
        "NextCare"
    }

    fn is_active(&self) -> bool {
        !self.config.nextcare_login_url.is_empty()
    }

    fn inactive_reason(&self) -> Option<String> {
        (!self.is_active()).then(|| "NextCare portal URL not configured".to_string())
    }

    async fn check(
        &self,
        credential: &Credential,
        query: &EligibilityQuery,
    ) -> Result<EligibilityResult, EligibilityError> {
        check::run_once(&self.config, credential, query).await
    }
}
