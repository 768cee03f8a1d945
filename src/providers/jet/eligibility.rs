//! Jet eligibility form: network selection, patient identifiers, CAPTCHA,
//! submission.

use std::time::Duration;

use headless_chrome::{Element, Tab};

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::EligibilityQuery;
use crate::providers::jet::selectors::JetLocators;
use crate::utils::mask_sensitive;

pub(super) fn fill_form(
    tab: &Tab,
    config: &Config,
    query: &EligibilityQuery,
) -> Result<(), EligibilityError> {
    tracing::info!(
        "📝 Filling eligibility form for {}",
        mask_sensitive(query.emirates_id())
    );

    dismiss_announcement_modal(tab, config);
    open_eligibility_section(tab)?;
    select_network(tab, query.insurer())?;
    fill_identifiers(tab, config, query)?;
    solve_captcha(tab)?;

    Ok(())
}

pub(super) fn submit(tab: &Tab) -> Result<(), EligibilityError> {
    let submit_button = tab
        .wait_for_element(JetLocators::SUBMIT_BUTTON)
        .map_err(|e| EligibilityError::Navigation(format!("submit button: {}", e)))?;
    submit_button
        .click()
        .map_err(|e| EligibilityError::Navigation(format!("submit button: {}", e)))?;

    tracing::info!("✅ Eligibility form submitted");
    Ok(())
}

/// The portal sometimes shows an announcement modal after login. Closing it
/// is best-effort; a missing modal is not a failure.
fn dismiss_announcement_modal(tab: &Tab, config: &Config) {
    std::thread::sleep(Duration::from_millis(config.settle_delay_ms));

    match tab.find_element_by_xpath(JetLocators::ANNOUNCEMENT_MODAL_CLOSE_XPATH) {
        Ok(close_button) => match close_button.click() {
            Ok(_) => tracing::info!("✅ Announcement modal dismissed"),
            Err(e) => tracing::debug!("announcement modal close: {:?}", e),
        },
        Err(_) => tracing::debug!("no announcement modal shown"),
    }
}

fn open_eligibility_section(tab: &Tab) -> Result<(), EligibilityError> {
    let section = tab
        .wait_for_element(JetLocators::ELIGIBILITY_SECTION)
        .map_err(|e| EligibilityError::Navigation(format!("eligibility section: {}", e)))?;
    section
        .click()
        .map_err(|e| EligibilityError::Navigation(format!("eligibility section: {}", e)))?;

    Ok(())
}

/// Selects the service-network radio (NAS or Neuron) for the insurer code.
fn select_network(tab: &Tab, insurer_code: &str) -> Result<(), EligibilityError> {
    tab.wait_for_element(JetLocators::NETWORK_LOGO)
        .map_err(|e| EligibilityError::Navigation(format!("network selector: {}", e)))?;

    let locator = if insurer_code.eq_ignore_ascii_case("nas") {
        JetLocators::RADIO_NAS
    } else {
        JetLocators::RADIO_NEURON
    };

    tab.find_element(locator)
        .and_then(|radio| radio.click().map(|_| ()))
        .map_err(|e| EligibilityError::Navigation(format!("network radio {}: {}", locator, e)))?;

    tracing::info!("✅ Selected {} network", insurer_code.to_uppercase());
    Ok(())
}

fn fill_identifiers(
    tab: &Tab,
    config: &Config,
    query: &EligibilityQuery,
) -> Result<(), EligibilityError> {
    tab.wait_for_element(JetLocators::RADIO_NATIONAL_ID)
        .and_then(|radio| radio.click().map(|_| ()))
        .map_err(|e| EligibilityError::Navigation(format!("national-id radio: {}", e)))?;

    let eid_field = tab
        .wait_for_element(JetLocators::NATIONAL_ID_INPUT)
        .map_err(|e| EligibilityError::Navigation(format!("emirates-id field: {}", e)))?;
    clear_and_type(&eid_field, query.emirates_id(), "emirates-id field")?;

    // Treatment basis is a chosen.js widget: open it, then click the option.
    tab.wait_for_xpath(JetLocators::TREATMENT_BASIS_DROPDOWN_XPATH)
        .and_then(|dropdown| dropdown.click().map(|_| ()))
        .map_err(|e| EligibilityError::Navigation(format!("treatment-basis dropdown: {}", e)))?;
    std::thread::sleep(Duration::from_millis(config.settle_delay_ms));
    tab.wait_for_xpath(JetLocators::TREATMENT_BASIS_OPTION_XPATH)
        .and_then(|option| option.click().map(|_| ()))
        .map_err(|e| EligibilityError::Navigation(format!("treatment-basis option: {}", e)))?;

    let mobile_field = tab
        .wait_for_element(JetLocators::MOBILE_INPUT)
        .map_err(|e| EligibilityError::Navigation(format!("mobile field: {}", e)))?;
    clear_and_type(&mobile_field, query.mobile_number(), "mobile field")?;

    Ok(())
}

/// Reads the CAPTCHA answer from the page-level `code` variable and types
/// it into the CAPTCHA field. A missing variable fails the run; the form is
/// never submitted blind.
fn solve_captcha(tab: &Tab) -> Result<(), EligibilityError> {
    let probe = tab
        .evaluate(JetLocators::CAPTCHA_SCRIPT_VARIABLE, false)
        .map_err(|e| EligibilityError::Navigation(format!("captcha probe: {}", e)))?;

    let code = match probe.value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => {
            return Err(EligibilityError::Navigation(
                "captcha code variable not exposed by portal".into(),
            ))
        }
    };
    tracing::debug!("captcha value read from page");

    let captcha_field = tab
        .wait_for_element(JetLocators::CAPTCHA_INPUT)
        .map_err(|e| EligibilityError::Navigation(format!("captcha field: {}", e)))?;
    captcha_field
        .type_into(&code)
        .map_err(|e| EligibilityError::Navigation(format!("captcha field: {}", e)))?;

    Ok(())
}

fn clear_and_type(element: &Element<'_>, value: &str, what: &str) -> Result<(), EligibilityError> {
    element
        .call_js_fn("function() { this.value = ''; }", vec![], false)
        .map_err(|e| EligibilityError::Navigation(format!("{}: {}", what, e)))?;
    element
        .type_into(value)
        .map_err(|e| EligibilityError::Navigation(format!("{}: {}", what, e)))?;

    Ok(())
}
