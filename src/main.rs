use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokenscope::{
    api::{build_router, start_api_server, ApiState},
    auth::CleanupService,
    observability::{init_observability, log_config_info},
    AppConfig, APP_NAME, VERSION,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "tokenscope")]
#[command(about = "Scoped access token authorization server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "TOKENSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists; must happen before config is read
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().context("validating configuration")?;

    init_observability(&config.observability).await.context("initializing observability")?;
    info!(app_name = APP_NAME, version = VERSION, "Starting tokenscope");
    log_config_info(&config);

    let state = ApiState::from_config(&config).context("registering remote methods")?;
    for method in state.methods.iter() {
        info!(%method, "remote method registered");
    }

    let cleanup = CleanupService::new(state.tokens.clone())
        .spawn(Duration::from_secs(config.auth.cleanup_interval_seconds));

    let router = build_router(state).context("building router")?;
    let served = start_api_server(&config.server, router).await.context("running API server");
    cleanup.abort();
    served?;

    Ok(())
}
