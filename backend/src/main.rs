//! Backend entry-point: loads settings, prepares the database, and serves the
//! REST API with its OpenAPI docs.

mod server;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mentecare::demo_data::seed_demo_data_on_startup;
use mentecare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use mentecare::settings::{AppSettings, BuildMode};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = prepare(&settings).await?;
    create_server(config)?.await
}

/// Resolve settings, migrate the schema, and optionally seed demo data.
async fn prepare(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let signing_secret = settings
        .signing_secret(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let database_url = settings
        .database_url(&DefaultEnv::new())
        .map_err(std::io::Error::other)?;

    run_pending_migrations(&database_url)
        .await
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    if let Some(outcome) = seed_demo_data_on_startup(settings, &pool)
        .await
        .map_err(std::io::Error::other)?
    {
        info!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            "demo data seeded"
        );
    }

    Ok(ServerConfig::new(bind_addr, pool, signing_secret).with_token_ttl(settings.token_ttl()))
}
