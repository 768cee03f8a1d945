//! Result-page extraction for the Jet portal.

use std::time::Duration;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::Tab;

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{EligibilityQuery, EligibilityResult, EligibilityStatus, RawExtraction};
use crate::providers::base::RunPhase;
use crate::providers::jet::selectors::JetLocators;
use crate::services::artifacts::ArtifactStore;
use crate::utils::normalize::normalize;

/// Waits for the result page, captures evidence, extracts the raw fields
/// and normalizes them into the canonical record.
pub(super) fn gather(
    tab: &Tab,
    config: &Config,
    query: &EligibilityQuery,
    phase: &mut RunPhase,
) -> Result<EligibilityResult, EligibilityError> {
    // The result container renders once the portal has answered.
    let status_element = tab
        .wait_for_element(JetLocators::RESULT_STATUS)
        .map_err(|e| EligibilityError::Extraction(format!("result container: {}", e)))?;

    let current_url = tab.get_url();
    if !current_url.contains(JetLocators::RESULT_URL_MARKER) {
        return Err(EligibilityError::Navigation(format!(
            "unexpected page after submit: {}",
            current_url
        )));
    }

    // Evidence first: capture the page before reading any field, so a
    // partially broken extraction still leaves proof of the result.
    save_artifacts(tab, config, query.emirates_id());
    phase.advance(RunPhase::ArtifactsSaved);

    let status_text = status_element
        .get_inner_text()
        .map_err(|e| EligibilityError::Extraction(format!("status text: {}", e)))?;
    let status = EligibilityStatus::from_portal_text(&status_text);
    tracing::info!("📋 Portal status: {}", status_text.trim());

    let mut raw = RawExtraction {
        status_text,
        reference_no: read_xpath(tab, JetLocators::REFERENCE_NO_XPATH)?,
        request_date: read_xpath(tab, JetLocators::REQUEST_DATE_XPATH)?,
        effective_from: read_xpath(tab, JetLocators::EFFECTIVE_FROM_XPATH)?,
        effective_to: read_xpath(tab, JetLocators::EFFECTIVE_TO_XPATH)?,
        effective_at: read_xpath(tab, JetLocators::EFFECTIVE_AT_XPATH)?,
        ..RawExtraction::default()
    };

    match status {
        EligibilityStatus::Eligible => {
            raw.coverage_text = read_css(tab, JetLocators::COVERAGE_MESSAGES)?;
            raw.member_policy_block = read_member_policy_block(tab, config);
        }
        EligibilityStatus::NotEligible => {
            raw.ineligible_reason = read_css(tab, JetLocators::INELIGIBILITY_MESSAGE)?;
        }
        EligibilityStatus::Unknown => {
            tracing::warn!("⚠️ Unrecognized status text: {:?}", raw.status_text.trim());
        }
    }

    let result = normalize(&raw, query.emirates_id());
    phase.advance(RunPhase::ResultExtracted);

    // Leave the portal on its landing page so the session ends cleanly.
    if let Err(e) = tab.navigate_to(&config.jet_landing_url) {
        tracing::debug!("landing page redirect: {:?}", e);
    }

    Ok(result)
}

fn read_xpath(tab: &Tab, xpath: &str) -> Result<String, EligibilityError> {
    tab.wait_for_xpath(xpath)
        .and_then(|element| element.get_inner_text())
        .map_err(|e| EligibilityError::Extraction(format!("{}: {}", xpath, e)))
}

fn read_css(tab: &Tab, selector: &str) -> Result<String, EligibilityError> {
    tab.wait_for_element(selector)
        .and_then(|element| element.get_inner_text())
        .map_err(|e| EligibilityError::Extraction(format!("{}: {}", selector, e)))
}

/// Opens the member-details popup and reads its text block. The popup is
/// optional: any failure leaves the block empty instead of failing the run.
fn read_member_policy_block(tab: &Tab, config: &Config) -> String {
    let block = tab
        .wait_for_element(JetLocators::MEMBER_DETAILS_BUTTON)
        .and_then(|button| {
            // The anchor is overlapped by its icon; a script click lands
            // where a mouse click does not.
            button.call_js_fn("function() { this.click(); }", vec![], false)?;
            tab.wait_for_element(JetLocators::MEMBER_DETAILS_PANEL)
        })
        .and_then(|panel| {
            std::thread::sleep(Duration::from_millis(config.settle_delay_ms));
            panel.get_inner_text()
        });

    match block {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("⚠️ Member-details popup unavailable: {:?}", e);
            String::new()
        }
    }
}

fn save_artifacts(tab: &Tab, config: &Config, emirates_id: &str) {
    let store = ArtifactStore::new(&config.artifact_dir);

    // Nudge the page so the result card is fully in view for the capture.
    let _ = tab.evaluate("window.scrollBy(0, 83)", false);

    match tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true) {
        Ok(png) => store.save_screenshot(emirates_id, &png),
        Err(e) => tracing::warn!("⚠️ Screenshot capture failed: {:?}", e),
    }

    let _ = tab.evaluate("window.scrollTo(0, 0)", false);

    let pdf_options = PrintToPdfOptions {
        landscape: Some(false),
        print_background: Some(true),
        ..Default::default()
    };
    match tab.print_to_pdf(Some(pdf_options)) {
        Ok(pdf) => store.save_pdf(emirates_id, &pdf),
        Err(e) => tracing::warn!("⚠️ PDF export failed: {:?}", e),
    }
}
