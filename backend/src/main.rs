//! Accounts server entry-point: loads configuration, prepares the
//! credential store and serves the REST API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use mockable::{DefaultEnv, Env};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::inbound::http::token_config::{BuildMode, token_settings_from_env};
use accounts::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

fn to_io(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

/// Build Prometheus metrics, logging and continuing without them on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics initialisation failed; continuing without /metrics");
            None
        }
    }
}

async fn connect_store<E: Env>(
    settings: &ServerSettings,
    env: &E,
    config: ServerConfig,
) -> std::io::Result<ServerConfig> {
    let Some(database_url) = settings.database_url(env) else {
        warn!("no database configured; accounts are kept in memory and lost on restart");
        return Ok(config);
    };

    if settings.run_migrations() {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(to_io)?
            .map_err(to_io)?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(to_io)?;
    Ok(config.with_db_pool(pool))
}

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

    let env = DefaultEnv::new();
    let settings = ServerSettings::load_from_iter(std::env::args_os()).map_err(to_io)?;
    let bind_addr = settings.bind_addr().map_err(to_io)?;

    let tokens = token_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(to_io)?;
    info!(
        fingerprint = %tokens.fingerprint(),
        ephemeral = tokens.ephemeral,
        ttl_seconds = tokens.ttl.num_seconds(),
        "token signing key loaded"
    );

    let config = connect_store(&settings, &env, ServerConfig::new(tokens, bind_addr)).await?;

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("accounts")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
