use async_trait::async_trait;
use chrono::Utc;

use troquey_core::domain::comparison::ComparisonRecord;

use super::{ComparisonStatsRepository, RepositoryError};
use crate::DbPool;

/// Append-only sink for comparison verdicts, one row per advisor call.
pub struct SqlComparisonStatsRepository {
    pool: DbPool,
}

impl SqlComparisonStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComparisonStatsRepository for SqlComparisonStatsRepository {
    async fn record(&self, record: ComparisonRecord) -> Result<(), RepositoryError> {
        let stat_id = format!("cstat-{}", sqlx::types::Uuid::new_v4());

        sqlx::query(
            "INSERT INTO comparison_stat (\
                 id, category_id, current_product_id, new_product_id, \
                 usage_level, camera_importance, battery_needs, budget_range, \
                 result_score, recommendation, recorded_at\
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(stat_id)
        .bind(&record.category_id.0)
        .bind(&record.current_product_id.0)
        .bind(&record.new_product_id.0)
        .bind(record.profile.usage_level.as_str())
        .bind(record.profile.camera_importance.as_str())
        .bind(record.profile.battery_needs.as_str())
        .bind(record.profile.budget_range.as_str())
        .bind(i64::from(record.score))
        .bind(record.recommendation.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
