use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use troquey_core::domain::lead::{LeadId, LeadStatus, SavedLead};

use super::{LeadRepository, RepositoryError};
use crate::DbPool;

pub struct SqlLeadRepository {
    pool: DbPool,
}

impl SqlLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn lead_from_row(row: &SqliteRow) -> Result<SavedLead, RepositoryError> {
        let status_raw: String = row.try_get("status")?;
        let status = LeadStatus::parse(&status_raw)
            .ok_or_else(|| RepositoryError::Decode(format!("unknown lead status `{status_raw}`")))?;

        Ok(SavedLead {
            id: LeadId(row.try_get("id")?),
            owner_id: row.try_get("owner_id")?,
            company_name: row.try_get("company_name")?,
            cnpj: row.try_get("cnpj")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            website: row.try_get("website")?,
            sector: row.try_get("sector")?,
            status,
            notes: row.try_get("notes")?,
            created_at: Self::parse_timestamp(row, "created_at")?,
            updated_at: Self::parse_timestamp(row, "updated_at")?,
        })
    }

    fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, RepositoryError> {
        let raw: String = row.try_get(column)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|error| {
                RepositoryError::Decode(format!("invalid timestamp in `{column}`: {error}"))
            })
    }

    /// Shared guard for the update/delete paths: surface a missing lead as
    /// `NotFound` instead of silently affecting zero rows.
    fn require_row(id: &LeadId, rows_affected: u64) -> Result<(), RepositoryError> {
        if rows_affected == 0 {
            return Err(RepositoryError::NotFound(format!("lead `{}`", id.0)));
        }
        Ok(())
    }
}

#[async_trait]
impl LeadRepository for SqlLeadRepository {
    async fn save(&self, lead: SavedLead) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO saved_lead (\
                 id, owner_id, company_name, cnpj, address, city, state, \
                 phone, email, website, sector, status, notes, created_at, updated_at\
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&lead.id.0)
        .bind(&lead.owner_id)
        .bind(&lead.company_name)
        .bind(&lead.cnpj)
        .bind(&lead.address)
        .bind(&lead.city)
        .bind(&lead.state)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(&lead.website)
        .bind(&lead.sector)
        .bind(lead.status.as_str())
        .bind(&lead.notes)
        .bind(lead.created_at.to_rfc3339())
        .bind(lead.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SavedLead>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, owner_id, company_name, cnpj, address, city, state, \
                    phone, email, website, sector, status, notes, created_at, updated_at \
             FROM saved_lead WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::lead_from_row).collect()
    }

    async fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<(), RepositoryError> {
        let outcome = sqlx::query("UPDATE saved_lead SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Self::require_row(id, outcome.rows_affected())
    }

    async fn update_notes(&self, id: &LeadId, notes: &str) -> Result<(), RepositoryError> {
        let outcome = sqlx::query("UPDATE saved_lead SET notes = ?, updated_at = ? WHERE id = ?")
            .bind(notes)
            .bind(Utc::now().to_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Self::require_row(id, outcome.rows_affected())
    }

    async fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let outcome =
            sqlx::query("DELETE FROM saved_lead WHERE id = ?").bind(&id.0).execute(&self.pool).await?;

        Self::require_row(id, outcome.rows_affected())
    }
}
