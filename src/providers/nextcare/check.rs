//! One NextCare eligibility run over CDP.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Element, Page};

use crate::browser::{create_cdp_browser, wait_for_network_idle};
use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::{Credential, EligibilityQuery, EligibilityResult, RawExtraction};
use crate::providers::base::RunPhase;
use crate::providers::nextcare::selectors::NextCareLocators;
use crate::services::artifacts::ArtifactStore;
use crate::utils::mask_sensitive;
use crate::utils::normalize::normalize;

pub(super) async fn run_once(
    config: &Config,
    credential: &Credential,
    query: &EligibilityQuery,
) -> Result<EligibilityResult, EligibilityError> {
    let mut phase = RunPhase::Init;

    let mut browser = create_cdp_browser(config).await?;
    let page = match browser.new_page("about:blank").await {
        Ok(page) => page,
        Err(e) => {
            let _ = browser.close().await;
            return Err(EligibilityError::BrowserSetup(format!("new page: {}", e)));
        }
    };
    phase.advance(RunPhase::BrowserOpen);

    let outcome = execute(&page, config, credential, query, &mut phase).await;

    // Release the browser on every exit path.
    let _ = browser.close().await;
    phase.advance(RunPhase::Closed);

    outcome
}

async fn execute(
    page: &Page,
    config: &Config,
    credential: &Credential,
    query: &EligibilityQuery,
    phase: &mut RunPhase,
) -> Result<EligibilityResult, EligibilityError> {
    login(page, config, credential).await?;
    phase.advance(RunPhase::LoggedIn);

    fill_form(page, config, query).await?;
    phase.advance(RunPhase::FormFilled);

    submit(page, config).await?;
    phase.advance(RunPhase::Submitted);

    save_artifacts(page, config, query.emirates_id()).await;
    phase.advance(RunPhase::ArtifactsSaved);

    let result = read_result(page, config, query).await?;
    phase.advance(RunPhase::ResultExtracted);

    Ok(result)
}

async fn login(
    page: &Page,
    config: &Config,
    credential: &Credential,
) -> Result<(), EligibilityError> {
    tracing::info!("🔍 Opening NextCare portal: {}", config.nextcare_login_url);
    tracing::info!("👤 User: {}", mask_sensitive(&credential.username));

    page.goto(&config.nextcare_login_url)
        .await
        .map_err(|e| EligibilityError::Navigation(format!("login page: {}", e)))?;

    fill(page, config, NextCareLocators::USERNAME_INPUT, &credential.username)
        .await
        .map_err(|e| EligibilityError::LoginFailed(format!("username field: {}", e)))?;
    fill(page, config, NextCareLocators::PASSWORD_INPUT, &credential.password)
        .await
        .map_err(|e| EligibilityError::LoginFailed(format!("password field: {}", e)))?;
    click(page, config, NextCareLocators::LOGIN_BUTTON)
        .await
        .map_err(|e| EligibilityError::LoginFailed(format!("login button: {}", e)))?;

    wait_for_network_idle(page, network_idle_timeout(config)).await;

    if let Ok(Some(url)) = page.url().await {
        if url.to_lowercase().contains("login") {
            return Err(EligibilityError::LoginFailed(
                "still on login page, check credentials".into(),
            ));
        }
    }

    tracing::info!("✅ Logged in to NextCare");
    Ok(())
}

async fn fill_form(
    page: &Page,
    config: &Config,
    query: &EligibilityQuery,
) -> Result<(), EligibilityError> {
    tracing::info!(
        "📝 Opening Eligibility Checking for {}",
        mask_sensitive(query.emirates_id())
    );

    click(page, config, NextCareLocators::ELIGIBILITY_MENU_LINK).await?;
    wait_for_network_idle(page, network_idle_timeout(config)).await;

    click(page, config, NextCareLocators::OTHER_ID_TAB).await?;
    fill(page, config, NextCareLocators::ID_VALUE_INPUT, query.emirates_id()).await?;

    // The visit-type selector is a chosen.js widget: open it, then click
    // the "Out Patient" option.
    click(page, config, NextCareLocators::TYPE_DROPDOWN).await?;
    tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;
    click(page, config, NextCareLocators::TYPE_OPTION_OUT_PATIENT).await?;

    Ok(())
}

async fn submit(page: &Page, config: &Config) -> Result<(), EligibilityError> {
    click(page, config, NextCareLocators::CHECK_BUTTON).await?;
    tracing::info!("✅ Check Eligibility submitted");

    wait_for_network_idle(page, network_idle_timeout(config)).await;
    Ok(())
}

async fn read_result(
    page: &Page,
    config: &Config,
    query: &EligibilityQuery,
) -> Result<EligibilityResult, EligibilityError> {
    let element = wait_for_element(page, NextCareLocators::RESULT_MESSAGE, element_timeout(config))
        .await?;
    let status_text = element
        .inner_text()
        .await
        .map_err(|e| EligibilityError::Extraction(format!("result text: {}", e)))?
        .unwrap_or_default();

    if status_text.trim().is_empty() {
        return Err(EligibilityError::Extraction("empty result message".into()));
    }
    tracing::info!("📋 Member status: {}", status_text.trim());

    let raw = RawExtraction {
        status_text,
        ..RawExtraction::default()
    };

    Ok(normalize(&raw, query.emirates_id()))
}

async fn save_artifacts(page: &Page, config: &Config, emirates_id: &str) {
    let store = ArtifactStore::new(&config.artifact_dir);

    let screenshot_params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();
    match page.screenshot(screenshot_params).await {
        Ok(png) => store.save_screenshot(emirates_id, &png),
        Err(e) => tracing::warn!("⚠️ Screenshot capture failed: {:?}", e),
    }

    let pdf_params = PrintToPdfParams {
        print_background: Some(true),
        ..Default::default()
    };
    match page.pdf(pdf_params).await {
        Ok(pdf) => store.save_pdf(emirates_id, &pdf),
        Err(e) => tracing::warn!("⚠️ PDF export failed: {:?}", e),
    }
}

/// CDP element lookups do not wait on their own, so poll with a bound.
async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<Element, EligibilityError> {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match page.find_element(selector).await {
            Ok(element) => return Ok(element),
            Err(_) if tokio::time::Instant::now() < deadline => {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            Err(e) => {
                return Err(EligibilityError::Timeout(format!("{} ({})", selector, e)));
            }
        }
    }
}

async fn fill(
    page: &Page,
    config: &Config,
    selector: &str,
    value: &str,
) -> Result<(), EligibilityError> {
    let element = wait_for_element(page, selector, element_timeout(config)).await?;
    element
        .click()
        .await
        .map_err(|e| EligibilityError::Navigation(format!("{}: {}", selector, e)))?;
    element
        .type_str(value)
        .await
        .map_err(|e| EligibilityError::Navigation(format!("{}: {}", selector, e)))?;

    Ok(())
}

async fn click(page: &Page, config: &Config, selector: &str) -> Result<(), EligibilityError> {
    wait_for_element(page, selector, element_timeout(config))
        .await?
        .click()
        .await
        .map_err(|e| EligibilityError::Navigation(format!("{}: {}", selector, e)))?;

    Ok(())
}

fn element_timeout(config: &Config) -> Duration {
    Duration::from_millis(config.element_timeout_ms)
}

fn network_idle_timeout(config: &Config) -> Duration {
    Duration::from_millis(config.network_idle_timeout_ms)
}
