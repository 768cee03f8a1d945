use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eligibility_engine::providers::EligibilityProvider;
use eligibility_engine::{Config, Credential, EligibilityQuery, EligibilityService, ProviderRegistry};

/// Runs one insurance-eligibility verification against an insurer portal
/// and prints the resulting record as JSON.
#[derive(Debug, Parser)]
#[command(name = "eligibility-engine", version, about)]
struct Cli {
    /// Insurer code (NAS, NEURON or NEXTCARE)
    #[arg(long)]
    insurer: String,

    /// Patient Emirates ID (15 digits, starts with 784)
    #[arg(long)]
    emirates_id: String,

    /// Patient mobile number (9 digits, starts with 5)
    #[arg(long)]
    mobile: String,

    /// Portal username
    #[arg(long, env = "PORTAL_USERNAME")]
    username: String,

    /// Portal password
    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("✅ .env loaded from: {:?}", path),
        Err(e) => eprintln!("⚠️  .env not found: {}", e),
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eligibility_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Arc::new(Config::from_env()?);
    tracing::info!("🚀 Eligibility engine starting");
    tracing::info!("   Jet portal: {}", config.jet_base_url);
    tracing::info!("   NextCare portal: {}", config.nextcare_login_url);
    tracing::info!("   Headless: {}", config.headless);
    tracing::info!("   Artifact dir: {}", config.artifact_dir);

    let registry = Arc::new(ProviderRegistry::new(config.clone()));
    for provider in registry.all() {
        let status = if provider.is_active() { "✅" } else { "⏸️" };
        let reason = provider
            .inactive_reason()
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();
        tracing::info!("   {} {}{}", status, provider.name(), reason);
    }

    let service = EligibilityService::new(config, registry);

    let credential = Credential::new(cli.username, cli.password);
    let query = EligibilityQuery::new(cli.emirates_id, cli.mobile, cli.insurer)?;

    let result = service.verify(&credential, &query).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
