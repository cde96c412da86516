use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;

use crate::config::{Config, StoreBackend};
use crate::db::{MemoryStore, PgStore, ProductStore};

/// Shared application state. The store handle is injected here so handlers
/// never reach for a global connection.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,catalog_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let store = connect_store(&config).await?;

    let seeded = seed::seed_if_empty(store.as_ref())
        .await
        .context("failed to seed sample products")?;
    if seeded > 0 {
        info!(seeded, "Seeded empty catalog");
    }

    let app = build_router(AppState { store });

    let addr = config.bind_addr();
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn ProductStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory product store; data is lost on exit.");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(config.db_acquire_timeout)
                .connect(&config.database_url)
                .await
                .context("failed to connect to the product store")?;
            info!("Database connection pool established.");

            info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Migrations complete.");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))

        // ── Products ────────────────────────────────────────────────────────
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::products::get_product).delete(handlers::products::delete_product),
        )

        // ── Categories ──────────────────────────────────────────────────────
        .route("/api/categories", get(handlers::categories::list_categories))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
