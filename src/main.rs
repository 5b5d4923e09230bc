use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod events;
mod github;
mod server;
mod store;

use config::{Config, Overrides, Settings};

#[derive(Parser)]
#[command(name = "hook-ledger")]
#[command(about = "Record GitHub push and pull request webhooks and serve their history")]
struct Cli {
    /// Optional TOML config file; flags and environment variables take precedence
    #[arg(short, long, env = "HOOK_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Store connection string (`memory` for an in-process store)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Shared secret configured on the GitHub webhook
    #[arg(long, env = "GITHUB_WEBHOOK_SECRET", hide_env_values = true)]
    webhook_secret: Option<String>,

    /// Ignore redeliveries of an already stored event
    #[arg(
        long,
        env = "DEDUPE_DELIVERIES",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    dedupe_deliveries: Option<bool>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            webhook_secret: self.webhook_secret.clone(),
            dedupe_deliveries: self.dedupe_deliveries,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(config, cli.overrides())?;
    tracing::info!(
        port = settings.port,
        dedupe_deliveries = settings.dedupe_deliveries,
        "Starting hook-ledger"
    );

    let store = store::connect(&settings.database_url)
        .await
        .context("failed to open action store")?;
    let (host, port) = settings.bind_address();
    let listener = server::bind(host, port)
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    let validator = github::SignatureValidator::new(settings.webhook_secret);
    let state = server::AppState::new(store, validator, settings.dedupe_deliveries);

    server::serve(listener, state).await
}
