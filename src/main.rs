//! api-mocker
//!
//! Serves mock API responses from a directory of JSON files.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ dispatcher ──▶ RouteIndex (ArcSwap snapshot)
//!                                        │
//!                                        ▼
//!                                   mock loader ──▶ template engine ──▶ delay
//!                                                                        │
//!     Client Response ◀──────────────────────────────────────────────────┘
//!
//!     mock dir watcher ──▶ rebuild RouteIndex ──▶ swap
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use api_mocker::config::{load_config, validate_config, MockServerConfig};
use api_mocker::lifecycle::{signals::shutdown_on_signal, Shutdown};
use api_mocker::observability::{logging::init_logging, metrics::init_metrics};
use api_mocker::MockServer;

#[derive(Parser)]
#[command(name = "api-mocker")]
#[command(about = "Serve mock API responses from a directory of JSON files", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Mock directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// URL prefix for every route, e.g. /api
    #[arg(long)]
    prefix: Option<String>,

    /// Reload routes when mock files change
    #[arg(short, long)]
    watch: bool,

    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind
    #[arg(long)]
    host: Option<String>,

    /// Keep loaded mocks in memory until the next reload
    #[arg(long)]
    cache: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: MockServerConfig) -> MockServerConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.dir {
            config.mock_dir = dir;
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config.watch |= self.watch;
        config.cache |= self.cache;
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => MockServerConfig::default(),
    };
    let config = cli.apply(config);

    if let Err(errors) = validate_config(&config) {
        for e in errors {
            eprintln!("Invalid configuration: {}", e);
        }
        return ExitCode::FAILURE;
    }

    init_logging(&config.observability.log_level);
    tracing::info!("api-mocker v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    tracing::info!(
        mock_dir = %config.mock_dir.display(),
        prefix = %config.normalized_prefix(),
        watch = config.watch,
        cache = config.cache,
        "Configuration loaded"
    );

    let server = match MockServer::bind(config).await {
        Ok(server) => server,
        Err(e) if e.is_addr_in_use() => {
            tracing::error!(error = %e, "Port already in use");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start mock server");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(addr) = server.local_addr() {
        tracing::info!("Mock server running at http://{}{}", addr, server.dispatcher().prefix());
    }

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    if let Err(e) = server.run(shutdown).await {
        tracing::error!(error = %e, "Mock server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
