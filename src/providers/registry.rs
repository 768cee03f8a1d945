use std::sync::Arc;

use crate::config::Config;
use crate::providers::base::EligibilityProvider;
use crate::providers::jet::JetProvider;
use crate::providers::nextcare::NextCareProvider;

/// Maps insurer codes to their portal adapters. Adding an insurer means
/// adding an adapter here; the verification flow never changes.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn EligibilityProvider>>,
}

impl ProviderRegistry {
    pub fn new(config: Arc<Config>) -> Self {
        let providers: Vec<Arc<dyn EligibilityProvider>> = vec![
            Arc::new(JetProvider::new(config.clone())),
            Arc::new(NextCareProvider::new(config)),
        ];

        Self { providers }
    }

    /// Builds a registry from an explicit adapter list. Used by tests to
    /// inject stub adapters.
    pub fn with_providers(providers: Vec<Arc<dyn EligibilityProvider>>) -> Self {
        Self { providers }
    }

    /// Resolves an insurer code to its portal adapter, if any.
    pub fn resolve(&self, insurer_code: &str) -> Option<Arc<dyn EligibilityProvider>> {
        self.providers
            .iter()
            .find(|p| p.handles(insurer_code))
            .cloned()
    }

    pub fn all(&self) -> &[Arc<dyn EligibilityProvider>] {
        &self.providers
    }
}
