//! In-memory repository implementations for handler and engine tests.

use std::collections::HashMap;

use tokio::sync::RwLock;

use troquey_core::domain::comparison::ComparisonRecord;
use troquey_core::domain::lead::{LeadId, LeadStatus, SavedLead};
use troquey_core::domain::product::{CategoryId, Product, ProductId};

use super::{ComparisonStatsRepository, LeadRepository, ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn search(
        &self,
        category_id: &CategoryId,
        query: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let needle = query.to_lowercase();
        let mut matches: Vec<Product> = products
            .values()
            .filter(|product| {
                &product.category_id == category_id
                    && product.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(10);
        Ok(matches)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0.clone(), product);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryComparisonStatsRepository {
    records: RwLock<Vec<ComparisonRecord>>,
    fail_next: RwLock<bool>,
}

impl InMemoryComparisonStatsRepository {
    pub async fn recorded(&self) -> Vec<ComparisonRecord> {
        self.records.read().await.clone()
    }

    /// Arm a one-shot failure so tests can prove the caller treats stats
    /// recording as fire-and-forget.
    pub async fn fail_next_record(&self) {
        *self.fail_next.write().await = true;
    }
}

#[async_trait::async_trait]
impl ComparisonStatsRepository for InMemoryComparisonStatsRepository {
    async fn record(&self, record: ComparisonRecord) -> Result<(), RepositoryError> {
        let mut fail_next = self.fail_next.write().await;
        if *fail_next {
            *fail_next = false;
            return Err(RepositoryError::Decode("injected stats failure".to_string()));
        }
        drop(fail_next);

        self.records.write().await.push(record);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<HashMap<String, SavedLead>>,
}

#[async_trait::async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn save(&self, lead: SavedLead) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        leads.insert(lead.id.0.clone(), lead);
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SavedLead>, RepositoryError> {
        let leads = self.leads.read().await;
        let mut matches: Vec<SavedLead> =
            leads.values().filter(|lead| lead.owner_id == owner_id).cloned().collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(matches)
    }

    async fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(&id.0)
            .ok_or_else(|| RepositoryError::NotFound(format!("lead `{}`", id.0)))?;
        lead.status = status;
        lead.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn update_notes(&self, id: &LeadId, notes: &str) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(&id.0)
            .ok_or_else(|| RepositoryError::NotFound(format!("lead `{}`", id.0)))?;
        lead.notes = Some(notes.to_string());
        lead.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        leads
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("lead `{}`", id.0)))
    }
}
