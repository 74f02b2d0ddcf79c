mod advisor;
mod bootstrap;
mod health;
mod prospect;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use troquey_core::config::{AppConfig, LoadOptions};
use troquey_db::repositories::{
    SqlCategoryRepository, SqlComparisonStatsRepository, SqlLeadRepository, SqlProductRepository,
};

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use troquey_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let advisor_state = advisor::AdvisorState {
        advisor: app.advisor.clone(),
        categories: Arc::new(SqlCategoryRepository::new(app.db_pool.clone())),
        products: Arc::new(SqlProductRepository::new(app.db_pool.clone())),
        stats: Arc::new(SqlComparisonStatsRepository::new(app.db_pool.clone())),
    };
    let prospect_state = prospect::ProspectState {
        companies: app.company_source.clone(),
        leads: Arc::new(SqlLeadRepository::new(app.db_pool.clone())),
    };

    let router = Router::new()
        .merge(health::router(app.db_pool.clone()))
        .merge(advisor::router(advisor_state))
        .merge(prospect::router(prospect_state));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "troquey-server started"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "troquey-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
