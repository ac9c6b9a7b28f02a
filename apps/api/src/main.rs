use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_api::auth::SessionKeys;
use resume_api::config::{Config, StoreBackend};
use resume_api::db::create_pool;
use resume_api::resumes::store::{MemoryResumeStore, PgResumeStore};
use resume_api::templates::store::{MemoryTemplateStore, PgTemplateStore};
use resume_api::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let sessions = SessionKeys::new(config.session_secret.as_bytes());

    let state = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let db = create_pool(database_url, *max_connections).await?;
            AppState {
                resumes: Arc::new(PgResumeStore::new(db.clone())),
                templates: Arc::new(PgTemplateStore::new(db)),
                sessions,
            }
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            AppState {
                resumes: Arc::new(MemoryResumeStore::new()),
                templates: Arc::new(MemoryTemplateStore::new()),
                sessions,
            }
        }
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
