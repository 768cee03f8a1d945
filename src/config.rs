use std::env;

/// Engine configuration, built once at startup and passed down explicitly.
/// The core never reads process-wide state after this point.
#[derive(Debug, Clone)]
pub struct Config {
    // Jet portal (NAS / Neuron networks)
    pub jet_base_url: String,
    pub jet_landing_url: String,

    // NextCare "Pulse" portal
    pub nextcare_login_url: String,

    // Browser
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub proxy_url: Option<String>,

    // Timeouts
    pub element_timeout_ms: u64,
    pub network_idle_timeout_ms: u64,
    pub settle_delay_ms: u64,

    // Retry
    pub retry_max: u32,
    pub retry_backoff_ms: u64,

    // Artifacts
    pub artifact_dir: String,

    // Concurrency
    pub max_concurrent_runs: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            jet_base_url: env::var("JET_BASE_URL")
                .unwrap_or_else(|_| "https://jet.nnhs.ae/JET".to_string()),
            jet_landing_url: env::var("JET_LANDING_URL")
                .unwrap_or_else(|_| "https://jet.nnhs.ae/JET/Landing.aspx".to_string()),

            nextcare_login_url: env::var("NEXTCARE_LOGIN_URL").unwrap_or_else(|_| {
                "https://pulse-uae.nextcarehealth.com/Login2.aspx?ReturnUrl=%2F".to_string()
            }),

            chrome_path: env::var("CHROME_PATH").ok().filter(|s| !s.is_empty()),
            headless: env::var("HEADLESS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            proxy_url: env::var("PROXY_URL").ok().filter(|s| !s.is_empty()),

            element_timeout_ms: env::var("ELEMENT_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20_000),
            network_idle_timeout_ms: env::var("NETWORK_IDLE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15_000),
            settle_delay_ms: env::var("SETTLE_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500),

            retry_max: env::var("RETRY_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            retry_backoff_ms: env::var("RETRY_BACKOFF_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),

            artifact_dir: env::var("ARTIFACT_DIR").unwrap_or_else(|_| "./artifacts".to_string()),

            max_concurrent_runs: env::var("MAX_CONCURRENT_RUNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        })
    }
}
