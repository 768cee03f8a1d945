use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;

use crate::config::Config;
use crate::error::EligibilityError;

/// Launches a CDP-driven Chrome for an asynchronous portal run and spawns
/// the event-handler loop the connection needs to make progress.
pub async fn create_cdp_browser(config: &Config) -> Result<Browser, EligibilityError> {
    let mut builder = BrowserConfig::builder()
        .window_size(1920, 1080)
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu");

    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(path.clone());
    }
    if !config.headless {
        builder = builder.with_head();
    }
    if let Some(proxy_url) = &config.proxy_url {
        builder = builder.arg(format!("--proxy-server={}", proxy_url));
    }

    let browser_config = builder
        .build()
        .map_err(|e| EligibilityError::BrowserSetup(format!("cdp config: {}", e)))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| EligibilityError::BrowserSetup(format!("cdp launch: {}", e)))?;

    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!("CDP event error: {:?}", e);
            }
        }
        tracing::debug!("CDP handler finished");
    });

    tracing::info!("✅ CDP browser launched (headless: {})", config.headless);

    Ok(browser)
}

/// Waits until the page reports `readyState == "complete"` with no
/// in-flight resource requests, bounded by `timeout`.
///
/// A quiet timeout is logged and tolerated: the portals occasionally keep a
/// long-polling request open, and the element waits that follow catch pages
/// that truly failed to load.
pub async fn wait_for_network_idle(page: &Page, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    let probe = r#"({
        ready: document.readyState,
        active: performance.getEntriesByType('resource').filter(r => !r.responseEnd).length
    })"#;

    tracing::debug!("⏳ waiting for network idle");

    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        if let Ok(result) = page.evaluate(probe).await {
            if let Ok(value) = result.into_value::<serde_json::Value>() {
                let ready = value.get("ready").and_then(|v| v.as_str()).unwrap_or("");
                let active = value.get("active").and_then(|v| v.as_u64()).unwrap_or(u64::MAX);

                if ready == "complete" && active == 0 {
                    tracing::debug!("✅ network idle");
                    return;
                }
            }
        }

        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("⚠️ network idle timeout after {:?}", timeout);
            return;
        }
    }
}
