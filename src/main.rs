//! Crux service binary
//!
//! ```sh
//! # Default config (~/.config/crux/config.toml)
//! crux-service
//!
//! crux-service --config /etc/crux/config.toml --port 9000
//!
//! # Validate config without starting
//! crux-service --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crux::config::AppConfig;
use crux::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "crux-service",
    version,
    about = "Bouldering social service with an in-process event bus"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CRUX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Do not install the Prometheus recorder or serve `/metrics`.
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(crux::default_config_path);

    let loaded = AppConfig::load(&config_path);

    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file   : {}", config_path.display());
                println!("   API address   : {}", config.server.address());
                println!("   Dispatch mode : {:?}", config.events.dispatch_mode);
                println!("   Log level     : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) if e.is_missing_file() => {
                let config = AppConfig::default();
                println!("No configuration file, defaults apply");
                println!("   Config file   : {} (not found)", config_path.display());
                println!("   API address   : {}", config.server.address());
                println!("   Dispatch mode : {:?}", config.events.dispatch_mode);
                println!("   Log level     : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Invalid configuration: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);
    match load_error {
        None => info!(path = %config_path.display(), "Configuration loaded"),
        Some(e) if e.is_missing_file() => {
            info!(path = %config_path.display(), "No configuration file, using defaults")
        }
        Some(e) => {
            error!(path = %config_path.display(), error = %e, "Failed to load config, using defaults")
        }
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        enable_metrics: !cli.no_metrics,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to start");
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    handle.wait().await;
    ExitCode::SUCCESS
}
