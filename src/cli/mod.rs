use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, DocumentStore, MemoryStore, PgDocumentStore};
use crate::services::{DisabledMailer, MailError, Mailer, RelayMailer};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "studio-site")]
#[command(about = "Studio website and admin backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides STUDIO_PORT / PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create collections and indexes if they are missing")]
    Migrate,

    #[command(about = "Check that the document store is reachable")]
    Health,
}

/// Document store for the configured environment. Without DATABASE_URL the
/// process falls back to an in-memory store, which is refused in production.
pub fn build_store(config: &AppConfig) -> anyhow::Result<(Arc<dyn DocumentStore>, Option<Arc<PgDocumentStore>>)> {
    match DatabaseManager::new(&config.database) {
        Ok(manager) => {
            let pg = Arc::new(PgDocumentStore::new(manager));
            let store: Arc<dyn DocumentStore> = pg.clone();
            Ok((store, Some(pg)))
        }
        Err(e) if config.is_production() => Err(e).context("a database is required in production"),
        Err(e) => {
            tracing::warn!("{}; using an in-memory store, data will not survive a restart", e);
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
            Ok((store, None))
        }
    }
}

/// Mail relay client, or a mailer that refuses to send when the relay is not configured
pub fn build_mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match RelayMailer::new(&config.mail) {
        Ok(mailer) => Ok(Arc::new(mailer)),
        Err(MailError::NotConfigured) => {
            tracing::warn!("MAIL_API_KEY not set, outgoing email is disabled");
            Ok(Arc::new(DisabledMailer))
        }
        Err(e) => Err(e).context("failed to build mail client"),
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => {
            let (store, pg) = build_store(&config)?;
            store.ensure_collections().await.context("bootstrap failed")?;
            println!("Collections are up to date");
            if let Some(pg) = pg {
                pg.manager().close().await;
            }
            Ok(())
        }
        Commands::Health => {
            let (store, pg) = build_store(&config)?;
            store.ping().await.context("document store unreachable")?;
            println!("Document store OK");
            if let Some(pg) = pg {
                pg.manager().close().await;
            }
            Ok(())
        }
    }
}

async fn serve(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in {:?}", config.environment);
    }
    if config.security.admin_email.is_none() || config.security.admin_password.is_none() {
        tracing::warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set, admin login is disabled");
    }

    let (store, pg) = build_store(&config)?;
    if let Err(e) = store.ensure_collections().await {
        // Keep serving; /health reports the store as degraded until it recovers
        tracing::error!("Collection bootstrap failed: {}", e);
    }
    let mailer = build_mailer(&config)?;

    tracing::info!("Starting {} in {:?} mode", config.server.site_name, config.environment);
    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::new(config, store, mailer);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, crate::app::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg {
        pg.manager().close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
