use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};

use crate::config::Config;
use crate::error::EligibilityError;

/// Launches a headless Chrome instance for a synchronous portal run.
/// One browser per verification run; the caller owns the handle and drops
/// it to terminate the process.
pub fn launch_chrome(config: &Config) -> Result<Browser, EligibilityError> {
    let mut args: Vec<&OsStr> = vec![
        OsStr::new("--disable-dev-shm-usage"),
        OsStr::new("--disable-gpu"),
        OsStr::new("--disable-extensions"),
        OsStr::new("--disable-infobars"),
    ];

    let proxy_arg;
    if let Some(proxy_url) = &config.proxy_url {
        proxy_arg = format!("--proxy-server={}", proxy_url);
        args.push(OsStr::new(proxy_arg.as_str()));
    }

    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .sandbox(false)
        .window_size(Some((1920, 1080)))
        .path(config.chrome_path.as_ref().map(PathBuf::from))
        .args(args)
        .idle_browser_timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| EligibilityError::BrowserSetup(format!("launch options: {}", e)))?;

    let browser = Browser::new(options)
        .map_err(|e| EligibilityError::BrowserSetup(format!("chrome launch: {}", e)))?;

    tracing::info!("✅ Chrome launched (headless: {})", config.headless);

    Ok(browser)
}
