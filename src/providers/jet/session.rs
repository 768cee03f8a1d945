use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, Tab};

use crate::browser::launch_chrome;
use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult};
use crate::providers::base::RunPhase;
use crate::providers::jet::eligibility;
use crate::providers::jet::extract;
use crate::providers::jet::selectors::JetLocators;
use crate::utils::mask_sensitive;

/// Runs one complete Jet eligibility attempt on the current thread.
pub(super) fn run_once(
    config: &Config,
    credential: &Credential,
    query: &EligibilityQuery,
) -> Result<EligibilityResult, EligibilityError> {
    let mut phase = RunPhase::Init;

    let session = JetSession::open(config)?;
    phase.advance(RunPhase::BrowserOpen);

    let outcome = session.execute(config, credential, query, &mut phase);

    session.close();
    phase.advance(RunPhase::Closed);

    outcome
}

/// One Jet browser session: owns the browser for exactly one run and
/// releases it on every exit path.
struct JetSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl JetSession {
    fn open(config: &Config) -> Result<Self, EligibilityError> {
        let browser = launch_chrome(config)?;
        let tab = browser
            .new_tab()
            .map_err(|e| EligibilityError::BrowserSetup(format!("new tab: {}", e)))?;
        tab.set_default_timeout(Duration::from_millis(config.element_timeout_ms));

        Ok(Self { browser, tab })
    }

    fn execute(
        &self,
        config: &Config,
        credential: &Credential,
        query: &EligibilityQuery,
        phase: &mut RunPhase,
    ) -> Result<EligibilityResult, EligibilityError> {
        self.login(config, credential)?;
        phase.advance(RunPhase::LoggedIn);

        eligibility::fill_form(&self.tab, config, query)?;
        phase.advance(RunPhase::FormFilled);

        eligibility::submit(&self.tab)?;
        phase.advance(RunPhase::Submitted);

        extract::gather(&self.tab, config, query, phase)
    }

    fn login(&self, config: &Config, credential: &Credential) -> Result<(), EligibilityError> {
        tracing::info!("🔍 Opening Jet portal: {}", config.jet_base_url);
        tracing::info!("👤 User: {}", mask_sensitive(&credential.username));

        self.tab
            .navigate_to(&config.jet_base_url)
            .map_err(|e| EligibilityError::Navigation(format!("login page: {}", e)))?;
        ensure_page_loaded(&self.tab, config);

        let username_field = self
            .tab
            .wait_for_element(JetLocators::USERNAME_INPUT)
            .map_err(|e| EligibilityError::LoginFailed(format!("username field: {}", e)))?;
        username_field
            .type_into(&credential.username)
            .map_err(|e| EligibilityError::LoginFailed(format!("username field: {}", e)))?;

        let password_field = self
            .tab
            .wait_for_element(JetLocators::PASSWORD_INPUT)
            .map_err(|e| EligibilityError::LoginFailed(format!("password field: {}", e)))?;
        password_field
            .type_into(&credential.password)
            .map_err(|e| EligibilityError::LoginFailed(format!("password field: {}", e)))?;

        let login_button = self
            .tab
            .wait_for_xpath(JetLocators::LOGIN_BUTTON_XPATH)
            .map_err(|e| EligibilityError::LoginFailed(format!("login button: {}", e)))?;
        login_button
            .click()
            .map_err(|e| EligibilityError::LoginFailed(format!("login button: {}", e)))?;

        ensure_page_loaded(&self.tab, config);

        let current_url = self.tab.get_url();
        if current_url.to_lowercase().contains("login") {
            return Err(EligibilityError::LoginFailed(
                "still on login page, check credentials".into(),
            ));
        }

        tracing::info!("✅ Logged in to Jet");
        Ok(())
    }

    fn close(self) {
        // Dropping the handles terminates the Chrome process for this run.
        drop(self.tab);
        drop(self.browser);
        tracing::debug!("browser released");
    }
}

/// Polls `document.readyState` until the page reports complete, bounded by
/// the element timeout.
fn ensure_page_loaded(tab: &Tab, config: &Config) {
    let deadline = Instant::now() + Duration::from_millis(config.element_timeout_ms);

    while Instant::now() < deadline {
        match tab.evaluate("document.readyState", false) {
            Ok(state) => {
                let ready = state
                    .value
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                if ready == "complete" {
                    return;
                }
            }
            Err(e) => tracing::debug!("readyState probe: {:?}", e),
        }
        std::thread::sleep(Duration::from_millis(1_000));
    }

    tracing::warn!("⚠️ page did not reach readyState=complete in time");
}
