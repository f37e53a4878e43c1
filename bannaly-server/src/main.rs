//! # Bannaly Server
//!
//! Backend-for-frontend of the Bannaly digital library. It fronts two
//! ImageKit accounts (books and audio), Firestore (counters and comments) and
//! the YouTube Data API (video collections).

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use bannaly_config::{
    CollectionsSource, Config, ConfigLoad, ConfigLoader, ConfigWarnings,
};
use bannaly_server::{
    AppState, create_app,
    infra::{
        startup::{ProdStartupHooks, StartupHooks},
        wiring::wire_services,
    },
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bannaly-server")]
#[command(about = "Backend for the Bannaly digital library frontend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Path to a bannaly.toml configuration file
    #[arg(short, long, env = "BANNALY_CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate configuration, print warnings and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::CheckConfig) => check_config(&cli.serve),
        None => run_server(cli.serve).await,
    }
}

fn load_config(args: &ServeArgs) -> anyhow::Result<ConfigLoad> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    let mut load = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        load.config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        load.config.server.host = host;
    }
    Ok(load)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_warnings(warnings: &ConfigWarnings) {
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

fn log_summary(config: &Config) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    match &config.collections.source {
        CollectionsSource::Bundled => {
            info!(count = config.collections.entries.len(), "using bundled collection list")
        }
        CollectionsSource::File(path) => info!(
            path = %path.display(),
            count = config.collections.entries.len(),
            "collection list loaded from file"
        ),
    }
    info!(
        dev_mode = config.dev_mode,
        books = config.imagekit.books.is_some(),
        audio = config.imagekit.audio.is_some(),
        youtube = config.youtube.api_key.is_some(),
        timeout_secs = config.http.timeout.as_secs(),
        "configuration in effect"
    );
}

fn check_config(args: &ServeArgs) -> anyhow::Result<()> {
    init_tracing();
    let ConfigLoad { config, warnings } = load_config(args)?;
    log_summary(&config);
    log_warnings(&warnings);
    info!(warnings = warnings.len(), "configuration is valid");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    run_server_with_hooks(args, &ProdStartupHooks).await
}

async fn run_server_with_hooks<H>(args: ServeArgs, hooks: &H) -> anyhow::Result<()>
where
    H: StartupHooks,
{
    init_tracing();
    let ConfigLoad { config, warnings } = load_config(&args)?;
    log_summary(&config);
    log_warnings(&warnings);

    let services = wire_services(&config).context("failed to wire services")?;
    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), services);
    info!(storage = state.storage().as_str(), "services ready");

    let router = create_app(state.clone());
    hooks.run(&state).await?;

    let host = config.server.host.as_str();
    let port = config.server.port;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!(addr = %listener.local_addr()?, "Starting Bannaly server");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
