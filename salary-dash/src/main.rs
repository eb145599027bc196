//! salary-dash: salary transparency dashboard server
//!
//! Serves the dashboard page, the record/summary API and the submission
//! endpoint over a CSV or SQLite record store.

use anyhow::{Context, Result};
use clap::Parser;
use salary_common::config::{
    config_file_path, load_toml_config, resolve_root_folder, StorageConfig,
};
use salary_common::fx::FxClient;
use salary_common::store::open_store;
use salary_common::{ReferenceLists, StoreBackend};
use salary_dash::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for salary-dash
#[derive(Parser, Debug)]
#[command(name = "salary-dash")]
#[command(about = "Salary transparency dashboard")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "SALARY_DASH_PORT")]
    port: Option<u16>,

    /// Folder holding the data files (overrides SALARY_ROOT_FOLDER and config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, env = "SALARY_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend: csv or sqlite (overrides config file)
    #[arg(short, long)]
    backend: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &toml_config.logging.level;
                format!("salary_dash={0},salary_common={0},tower_http=info", level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting salary-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match config_file_path(args.config.as_deref()) {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!(
            "No config file at {}; using built-in defaults",
            path.display()
        ),
        None => warn!("No config file location; using built-in defaults"),
    }

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    std::fs::create_dir_all(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let mut storage = StorageConfig::resolve(&toml_config.storage, &root_folder);
    if let Some(backend) = args.backend {
        storage.backend = backend;
    }

    let store = open_store(&storage)
        .await
        .context("Failed to open record store")?;

    let fx = if toml_config.fx.enabled {
        match FxClient::new(&toml_config.fx) {
            Ok(client) => {
                let client = Arc::new(client);
                // Warm the cache so the first submissions carry a rate
                let warm = client.clone();
                tokio::spawn(async move {
                    warm.refresh().await;
                });
                Some(client)
            }
            Err(e) => {
                warn!("Exchange rate lookups disabled: {}", e);
                None
            }
        }
    } else {
        info!("Exchange rate lookups disabled by config");
        None
    };

    let choices = ReferenceLists::load(&storage.reference_dir);

    let app = build_router(AppState::new(store, fx).with_choices(choices));

    let port = args.port.unwrap_or(toml_config.port);
    let addr = format!("{}:{}", toml_config.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("salary-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
