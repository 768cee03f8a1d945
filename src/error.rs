use thiserror::Error;

/// Everything that can go wrong during one eligibility run.
#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("browser setup failed: {0}")]
    BrowserSetup(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("provider inactive: {0}")]
    ProviderInactive(String),

    #[error("all {attempts} attempts failed, last error: {last}")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        last: Box<EligibilityError>,
    },
}

impl EligibilityError {
    /// Errors that must not consume further attempts: the browser cannot be
    /// acquired at all, the input is malformed, or the portal adapter is not
    /// usable. Everything else is treated as transient portal flakiness.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EligibilityError::BrowserSetup(_)
                | EligibilityError::Validation(_)
                | EligibilityError::ProviderInactive(_)
        )
    }
}
