//! Stratus read server
//!
//! Serves `GET /read/climate-data` over a wide-column store of climate
//! measurements keyed `type/area/date`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stratus_monitoring::init_tracing;
use tracing::{error, info};

mod app;
mod config;

use config::{ConfigOverrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "stratus-server",
    about = "Stratus - climate data read service",
    version,
    long_about = "HTTP read endpoint translating type/area/date queries into wide-column scans"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, env = "STRATUS_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (default: 7000)
    #[arg(short = 'p', long, env = "STRATUS_PORT")]
    port: Option<u16>,

    /// Bind address (default: 0.0.0.0)
    #[arg(short = 'b', long, env = "STRATUS_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Table to read from (default: climate_data)
    #[arg(short = 't', long)]
    table: Option<String>,

    /// JSON fixture used to seed the in-memory store
    #[arg(short = 's', long)]
    seed: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long, env = "STRATUS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, default_value = "false")]
    json_logs: bool,

    /// Enable permissive CORS
    #[arg(long, default_value = "false")]
    enable_cors: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Validate configuration and print the effective settings
    CheckConfig,

    /// Show version information
    Version,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_addr: self.bind_addr.clone(),
            port: self.port,
            table: self.table.clone(),
            seed_path: self.seed.clone(),
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            enable_cors: self.enable_cors,
        }
    }
}

fn load_config(cli: &Cli) -> Result<ServerConfig> {
    resolve_config(cli, |key| std::env::var(key).ok())
}

fn resolve_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<ServerConfig> {
    let mut config = match cli.config {
        Some(ref path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env_from(env);
    config.apply_overrides(&cli.overrides());
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("stratus-server {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Commands::CheckConfig) => {
            let config = load_config(&cli)?;
            println!("{:#?}", config);
            return Ok(());
        }
        Some(Commands::Serve) | None => {}
    }

    let config = load_config(&cli)?;
    init_tracing("stratus-server", &config.tracing_config())?;

    info!(
        "Starting stratus-server v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.bind_addr,
        config.server.port
    );

    let api = app::build_api(&config).await?;

    if let Err(e) = api.start(shutdown_signal()).await {
        error!("Read API error: {}", e);
        return Err(e.into());
    }

    info!("stratus-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal, draining connections"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
