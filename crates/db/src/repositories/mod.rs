use async_trait::async_trait;
use thiserror::Error;

use troquey_core::domain::comparison::ComparisonRecord;
use troquey_core::domain::lead::{LeadId, LeadStatus, SavedLead};
use troquey_core::domain::product::{Category, CategoryId, Product, ProductId};

pub mod catalog;
pub mod lead;
pub mod memory;
pub mod stats;

pub use catalog::{SqlCategoryRepository, SqlProductRepository};
pub use lead::SqlLeadRepository;
pub use memory::{
    InMemoryComparisonStatsRepository, InMemoryLeadRepository, InMemoryProductRepository,
};
pub use stats::SqlComparisonStatsRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Substring search on product name within one category, capped at ten
    /// results like the original catalog endpoint.
    async fn search(
        &self,
        category_id: &CategoryId,
        query: &str,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}

/// Downstream analytics sink for comparison verdicts. Callers treat `record`
/// as fire-and-forget: a failure here must never surface to the user flow.
#[async_trait]
pub trait ComparisonStatsRepository: Send + Sync {
    async fn record(&self, record: ComparisonRecord) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn save(&self, lead: SavedLead) -> Result<(), RepositoryError>;
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SavedLead>, RepositoryError>;
    async fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<(), RepositoryError>;
    async fn update_notes(&self, id: &LeadId, notes: &str) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &LeadId) -> Result<(), RepositoryError>;
}
