use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use troquey_core::domain::product::{Category, CategoryId, Product, ProductId, QualityScores};

use super::{CategoryRepository, ProductRepository, RepositoryError};
use crate::DbPool;

const SEARCH_LIMIT: i64 = 10;

pub struct SqlCategoryRepository {
    pool: DbPool,
}

impl SqlCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqlCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, icon, slug FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: CategoryId(row.try_get("id")?),
                    name: row.try_get("name")?,
                    icon: row.try_get("icon")?,
                    slug: row.try_get("slug")?,
                })
            })
            .collect()
    }
}

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: ProductId(row.try_get("id")?),
            category_id: CategoryId(row.try_get("category_id")?),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            year: row.try_get::<Option<i64>, _>("year")?.map(|value| value as i32),
            price_min: Self::parse_price(row, "price_min")?,
            price_max: Self::parse_price(row, "price_max")?,
            price_typical: Self::parse_price(row, "price_typical")?,
            scores: QualityScores {
                performance: row.try_get("performance_score")?,
                camera: row.try_get("camera_score")?,
                battery: row.try_get("battery_score")?,
                build_quality: row.try_get("build_quality_score")?,
            },
        })
    }

    /// Prices are stored as TEXT so decimal values survive SQLite untouched.
    fn parse_price(row: &SqliteRow, column: &str) -> Result<Option<Decimal>, RepositoryError> {
        let raw: Option<String> = row.try_get(column)?;
        raw.map(|value| {
            Decimal::from_str(&value).map_err(|error| {
                RepositoryError::Decode(format!("invalid decimal in `{column}`: {error}"))
            })
        })
        .transpose()
    }
}

const PRODUCT_COLUMNS: &str = "id, category_id, name, brand, model, year, \
                               price_min, price_max, price_typical, \
                               performance_score, camera_score, battery_score, build_quality_score";

#[async_trait]
impl ProductRepository for SqlProductRepository {
    async fn search(
        &self,
        category_id: &CategoryId,
        query: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE category_id = ? AND name LIKE ? \
             ORDER BY name LIMIT ?"
        ))
        .bind(&category_id.0)
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::product_from_row).collect()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (\
                 id, category_id, name, brand, model, year, \
                 price_min, price_max, price_typical, \
                 performance_score, camera_score, battery_score, build_quality_score\
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET \
                 category_id = excluded.category_id, \
                 name = excluded.name, \
                 brand = excluded.brand, \
                 model = excluded.model, \
                 year = excluded.year, \
                 price_min = excluded.price_min, \
                 price_max = excluded.price_max, \
                 price_typical = excluded.price_typical, \
                 performance_score = excluded.performance_score, \
                 camera_score = excluded.camera_score, \
                 battery_score = excluded.battery_score, \
                 build_quality_score = excluded.build_quality_score",
        )
        .bind(&product.id.0)
        .bind(&product.category_id.0)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(product.year.map(i64::from))
        .bind(product.price_min.map(|value| value.to_string()))
        .bind(product.price_max.map(|value| value.to_string()))
        .bind(product.price_typical.map(|value| value.to_string()))
        .bind(product.scores.performance)
        .bind(product.scores.camera)
        .bind(product.scores.battery)
        .bind(product.scores.build_quality)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
