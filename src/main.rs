//! Neogen Compare - product comparison service

use anyhow::Result;
use neogen_compare::{router, AppState, CatalogAccessor, CompareConfig, InMemoryCatalog, PgCatalog};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = CompareConfig::from_env()?;
    let catalog: Arc<dyn CatalogAccessor> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let db = PgPoolOptions::new().max_connections(10).connect(&url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            Arc::new(PgCatalog::new(db))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, serving an empty in-memory catalog");
            Arc::new(InMemoryCatalog::new())
        }
    };
    tracing::info!(max_products = config.max_products, retention_days = config.retention.num_days(), "compare config loaded");

    let app = router(AppState::new(catalog, config)).layer(CorsLayer::permissive());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("Neogen Compare listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
