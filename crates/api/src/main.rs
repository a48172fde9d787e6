use std::sync::Arc;

use anyhow::Context;

use crm_api::app::{self, services::AppServices};
use crm_auth::StaticTokenValidator;
use crm_infra::{AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads `.env` too, so RUST_LOG from it applies to the subscriber below.
    let config = AppConfig::load().context("failed to load configuration")?;
    crm_observability::init();

    let pool = db::connect(&config).await.context("failed to open database pool")?;
    db::ensure_schema(&pool).await.context("failed to prepare schema")?;

    let validator = Arc::new(StaticTokenValidator::new(config.auth_token.clone()));
    let app = app::build_app(AppServices::postgres(pool), validator);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
