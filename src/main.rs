//! ledger-server - Tamper-evident append-only ledger with transparency log anchoring

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_server::anchoring::RekorClient;
use ledger_server::api::{create_router, AppState};
use ledger_server::background::{AnchorWorker, AnchorWorkerConfig, BackgroundConfig, BackgroundJobRunner};
use ledger_server::config::{Config, SigningConfig, TransparencyLogConfig};
use ledger_server::signing::{SigningClient, TransitClient};
use ledger_server::storage::{SqliteConfig, SqliteStore};
use ledger_server::traits::EntryStore;
use ledger_server::LedgerService;

#[derive(Parser, Debug)]
#[command(name = "ledger-server")]
#[command(about = "Tamper-evident append-only ledger with transparency log anchoring")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "LEDGER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, env = "LEDGER_PORT", default_value = "8088")]
    port: u16,

    /// Path to SQLite database
    #[arg(long, env = "LEDGER_DATABASE_PATH", default_value = "./ledger.db")]
    database: String,

    /// Log level
    #[arg(long, env = "LEDGER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Deadline for each store operation in seconds
    #[arg(long, env = "LEDGER_STORE_TIMEOUT_SECS", default_value = "15")]
    store_timeout_secs: u64,

    /// Deadline for each health probe in seconds
    #[arg(long, env = "LEDGER_HEALTH_TIMEOUT_SECS", default_value = "5")]
    health_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            host: self.host,
            port: self.port,
            database_path: self.database,
            log_level: self.log_level,
            store_timeout_secs: self.store_timeout_secs,
            health_timeout_secs: self.health_timeout_secs,
            signing: SigningConfig::from_env(),
            transparency_log: TransparencyLogConfig::from_env(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ledger-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        database = %config.database_path,
        signing_configured = config.signing.is_configured(),
        anchoring_enabled = config.transparency_log.is_enabled(),
        "Configuration loaded"
    );

    // Storage
    let store = SqliteStore::with_config(SqliteConfig {
        path: config.database_path.clone(),
        operation_timeout_secs: config.store_timeout_secs,
        ..Default::default()
    })
    .context("failed to open database")?;
    store.initialize().context("failed to initialize schema")?;
    let store: Arc<dyn EntryStore> = Arc::new(store);

    // Signing
    if !config.signing.is_configured() {
        tracing::warn!(
            missing = %config.signing.missing().join(", "),
            "Signing authority not configured; appends will fail"
        );
    }
    let signing_timeout = config.signing.timeout_secs;
    let authority = TransitClient::new(config.signing.clone())
        .context("failed to build signing client")?;
    let signer = SigningClient::new(Arc::new(authority), signing_timeout);
    tracing::info!(authority = %signer.authority_id(), "Signing client ready");

    // Anchoring
    let worker = if let Some(url) = config.transparency_log.url.as_deref() {
        let log = RekorClient::new(url, config.transparency_log.timeout_secs)
            .context("failed to build transparency log client")?;
        tracing::info!(url = %url, "Anchoring enabled");
        Some(AnchorWorker::new(
            Arc::clone(&store),
            Arc::new(log),
            AnchorWorkerConfig::from(&config.transparency_log),
        ))
    } else {
        tracing::warn!("REKOR_SERVER_URL not set; anchoring disabled");
        None
    };

    let ledger = Arc::new(LedgerService::new(
        signer,
        Arc::clone(&store),
        worker.clone(),
        config.health_timeout_secs,
    ));

    // Background jobs
    let runner = BackgroundJobRunner::new(Arc::clone(&store), worker, BackgroundConfig::from_env());
    let handles = runner.start();

    // HTTP server
    let app = create_router(Arc::new(AppState::new(ledger)));
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    runner.shutdown();
    for handle in handles {
        let _ = handle.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
