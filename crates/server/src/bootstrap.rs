use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use troquey_agent::{CompanySource, HttpLlmClient, LlmCompanySource, LlmError, MockCompanySource};
use troquey_core::advisor::{ScoringPolicy, UpgradeAdvisor};
use troquey_core::config::{AppConfig, ConfigError, LoadOptions, ProspectSource};
use troquey_db::{connect_with_settings, migrations, DbPool};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub advisor: Arc<UpgradeAdvisor>,
    pub company_source: Arc<dyn CompanySource>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client initialization failed: {0}")]
    LlmClient(#[source] LlmError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let company_source = build_company_source(&config)?;
    info!(
        event_name = "system.bootstrap.company_source_selected",
        correlation_id = "bootstrap",
        source = match config.prospect.source {
            ProspectSource::Llm => "llm",
            ProspectSource::Mock => "mock",
        },
        "company source initialized"
    );

    Ok(Application {
        config,
        db_pool,
        advisor: Arc::new(UpgradeAdvisor::with_policy(ScoringPolicy::default())),
        company_source,
    })
}

fn build_company_source(config: &AppConfig) -> Result<Arc<dyn CompanySource>, BootstrapError> {
    match config.prospect.source {
        ProspectSource::Llm => {
            let llm = HttpLlmClient::new(config.llm.clone()).map_err(BootstrapError::LlmClient)?;
            Ok(Arc::new(LlmCompanySource::new(
                Arc::new(llm),
                config.prospect.companies_per_search,
                config.prospect.default_location.clone(),
            )))
        }
        ProspectSource::Mock => {
            Ok(Arc::new(MockCompanySource::new(config.prospect.companies_per_search)))
        }
    }
}
