use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Canonical demo catalog: the categories/products the seed SQL inserts and
/// the verify contract checks.
const SEED_CATEGORY_IDS: &[&str] = &["cat-smartphones", "cat-notebooks", "cat-tvs"];

const SEED_PRODUCT_IDS: &[&str] = &[
    "prod-galax-s21",
    "prod-galax-s24",
    "prod-pixelito-6",
    "prod-pixelito-9-pro",
    "prod-essencial-a3",
    "prod-notabook-air-2021",
    "prod-notabook-pro-2024",
    "prod-workmax-15",
    "prod-tela-fina-50",
    "prod-tela-fina-65-oled",
];

pub struct SeedInfo {
    pub table: &'static str,
    pub expected_rows: usize,
}

pub struct SeedResult {
    pub seeded: Vec<SeedInfo>,
}

pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Deterministic demo catalog for the advisor flow.
///
/// Every product carries the four quality scores and a price band, so seeded
/// databases exercise both the scoring path and the price fallbacks.
pub struct CatalogSeedDataset;

impl CatalogSeedDataset {
    /// SQL fixture content for the demo catalog.
    pub const SQL: &str = include_str!("../../../config/fixtures/seed_catalog.sql");

    /// Load the catalog dataset into the database.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            seeded: vec![
                SeedInfo { table: "category", expected_rows: SEED_CATEGORY_IDS.len() },
                SeedInfo { table: "product", expected_rows: SEED_PRODUCT_IDS.len() },
            ],
        })
    }

    /// Verify that the seeded rows exist and match the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for category_id in SEED_CATEGORY_IDS {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1)")
                    .bind(category_id)
                    .fetch_one(pool)
                    .await?;
            checks.push((*category_id, exists == 1));
        }

        for product_id in SEED_PRODUCT_IDS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(\
                     SELECT 1 FROM product \
                     WHERE id = ?1 \
                       AND performance_score BETWEEN 0 AND 100 \
                       AND camera_score BETWEEN 0 AND 100 \
                       AND battery_score BETWEEN 0 AND 100 \
                       AND build_quality_score BETWEEN 0 AND 100\
                 )",
            )
            .bind(product_id)
            .fetch_one(pool)
            .await?;
            checks.push((*product_id, exists == 1));
        }

        let orphan_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM product \
             WHERE category_id NOT IN (SELECT id FROM category)",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("product-category-links", orphan_count == 0));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
