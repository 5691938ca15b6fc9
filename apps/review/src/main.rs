mod auth;
mod config;
mod disclosure;
mod errors;
mod feedback;
mod models;
mod routes;
mod state;
mod storage;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{AuthProvider, RemoteAuth, StaticTokenAuth};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{RedisKeyValueStore, S3FileStore};
use crate::views::blobs::BlobRegistry;
use crate::views::session::ViewRegistry;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting review service v{}", env!("CARGO_PKG_VERSION"));

    // Key-value store (Redis)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // File store (S3 / MinIO)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let auth: Arc<dyn AuthProvider> = match &config.auth_url {
        Some(url) => {
            info!("Using remote auth provider at {url}");
            Arc::new(RemoteAuth::new(url.clone()))
        }
        None => {
            if config.auth_tokens.is_empty() {
                warn!("No AUTH_URL or AUTH_TOKENS configured; every request will be redirected to sign in");
            }
            Arc::new(StaticTokenAuth::new(config.auth_tokens.clone()))
        }
    };

    let state = AppState {
        kv: Arc::new(RedisKeyValueStore::new(redis)),
        files: Arc::new(S3FileStore::new(s3, config.s3_bucket.clone())),
        auth,
        blobs: BlobRegistry::new(),
        views: ViewRegistry::with_capacity(config.max_views),
    };

    spawn_idle_sweeper(state.views.clone(), config.view_idle_ttl);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically tears down abandoned views so their blobs are released.
fn spawn_idle_sweeper(views: ViewRegistry, ttl: chrono::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            views.sweep_idle(ttl, chrono::Utc::now());
        }
    });
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "review-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
