//! Upgrade-advisor routes.
//!
//! - `GET  /api/v1/categories`                 — list catalog categories
//! - `GET  /api/v1/products?category_id&query` — search products in a category
//! - `POST /api/v1/compare`                    — score an upgrade for a profile
//!
//! The compare handler answers from the pure advisor and then records the
//! verdict on a detached task: stats logging can fail or lag without ever
//! touching the user-facing response.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use troquey_core::domain::comparison::{ComparisonRecord, ComparisonResult};
use troquey_core::domain::product::{Category, CategoryId, Product, ProductId};
use troquey_core::domain::profile::ProfileDraft;
use troquey_core::errors::DomainError;
use troquey_core::UpgradeAdvisor;
use troquey_db::repositories::{
    CategoryRepository, ComparisonStatsRepository, ProductRepository,
};

#[derive(Clone)]
pub struct AdvisorState {
    pub advisor: Arc<UpgradeAdvisor>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub stats: Arc<dyn ComparisonStatsRepository>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
        (status, Json(ApiError { error: message.into() }))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    pub category_id: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub category_id: String,
    pub current_product_id: String,
    pub new_product_id: String,
    pub profile: ProfileDraft,
}

pub fn router(state: AdvisorState) -> Router {
    Router::new()
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/products", get(search_products))
        .route("/api/v1/compare", post(compare))
        .with_state(state)
}

pub async fn list_categories(
    State(state): State<AdvisorState>,
) -> Result<Json<Vec<Category>>, (StatusCode, Json<ApiError>)> {
    state.categories.list().await.map(Json).map_err(|error| {
        warn!(event_name = "advisor.categories.list_failed", error = %error, "category listing failed");
        ApiError::response(StatusCode::SERVICE_UNAVAILABLE, "catálogo indisponível no momento")
    })
}

pub async fn search_products(
    State(state): State<AdvisorState>,
    Query(params): Query<ProductSearchQuery>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ApiError>)> {
    let category_id = CategoryId(params.category_id);
    state.products.search(&category_id, &params.query).await.map(Json).map_err(|error| {
        warn!(event_name = "advisor.products.search_failed", error = %error, "product search failed");
        ApiError::response(StatusCode::SERVICE_UNAVAILABLE, "catálogo indisponível no momento")
    })
}

pub async fn compare(
    State(state): State<AdvisorState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonResult>, (StatusCode, Json<ApiError>)> {
    let profile = request.profile.complete().map_err(|error| {
        ApiError::response(StatusCode::BAD_REQUEST, error.to_string())
    })?;

    let category_id = CategoryId(request.category_id);
    let current_id = ProductId(request.current_product_id);
    let new_id = ProductId(request.new_product_id);

    let current = load_product(&state, &current_id).await?;
    let new = load_product(&state, &new_id).await?;

    if current.category_id != category_id || new.category_id != category_id {
        let error = DomainError::CategoryMismatch {
            current: current.id.clone(),
            new: new.id.clone(),
        };
        return Err(ApiError::response(StatusCode::BAD_REQUEST, error.to_string()));
    }

    let result = state.advisor.compare(&current, &new, &profile);

    info!(
        event_name = "advisor.compare.scored",
        category_id = %category_id.0,
        current_product_id = %current.id.0,
        new_product_id = %new.id.0,
        score = result.score,
        recommendation = result.recommendation.as_str(),
        "comparison scored"
    );

    spawn_stat_recording(
        state.stats.clone(),
        ComparisonRecord {
            category_id,
            current_product_id: current.id,
            new_product_id: new.id,
            profile,
            score: result.score,
            recommendation: result.recommendation,
        },
    );

    Ok(Json(result))
}

async fn load_product(
    state: &AdvisorState,
    id: &ProductId,
) -> Result<Product, (StatusCode, Json<ApiError>)> {
    match state.products.find_by_id(id).await {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ApiError::response(
            StatusCode::NOT_FOUND,
            DomainError::UnknownProduct(id.clone()).to_string(),
        )),
        Err(error) => {
            warn!(event_name = "advisor.products.lookup_failed", error = %error, "product lookup failed");
            Err(ApiError::response(
                StatusCode::SERVICE_UNAVAILABLE,
                "catálogo indisponível no momento",
            ))
        }
    }
}

/// Hand the verdict to the stats recorder without coupling the response to
/// its outcome. Failures are logged and dropped.
fn spawn_stat_recording(stats: Arc<dyn ComparisonStatsRepository>, record: ComparisonRecord) {
    tokio::spawn(async move {
        if let Err(error) = stats.record(record).await {
            warn!(
                event_name = "advisor.stats.record_failed",
                error = %error,
                "comparison stat recording failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Json, Query, State};
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    use troquey_core::advisor::{ScoringPolicy, UpgradeAdvisor};
    use troquey_core::domain::comparison::Recommendation;
    use troquey_core::domain::product::{Category, CategoryId, Product, ProductId, QualityScores};
    use troquey_core::domain::profile::{
        BatteryNeeds, BudgetRange, CameraImportance, ProfileDraft, UsageLevel,
    };
    use troquey_db::repositories::{
        CategoryRepository, InMemoryComparisonStatsRepository, InMemoryProductRepository,
        ProductRepository, RepositoryError,
    };

    use super::{compare, search_products, AdvisorState, CompareRequest, ProductSearchQuery};

    struct StaticCategories;

    #[async_trait::async_trait]
    impl CategoryRepository for StaticCategories {
        async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
            Ok(vec![Category {
                id: CategoryId("cat-phones".to_string()),
                name: "Celulares".to_string(),
                icon: "smartphone".to_string(),
                slug: "celulares".to_string(),
            }])
        }
    }

    fn product(id: &str, category: &str, performance: f64) -> Product {
        Product {
            id: ProductId(id.to_string()),
            category_id: CategoryId(category.to_string()),
            name: id.to_string(),
            brand: None,
            model: None,
            year: None,
            price_min: None,
            price_max: None,
            price_typical: Some(Decimal::from(2000)),
            scores: QualityScores {
                performance,
                camera: 60.0,
                battery: 60.0,
                build_quality: 60.0,
            },
        }
    }

    fn full_profile() -> ProfileDraft {
        ProfileDraft {
            usage_level: Some(UsageLevel::Intense),
            camera_importance: Some(CameraImportance::Low),
            battery_needs: Some(BatteryNeeds::FewHours),
            budget_range: Some(BudgetRange::Economic),
        }
    }

    async fn state_with_products(products: &[Product]) -> (AdvisorState, Arc<InMemoryComparisonStatsRepository>) {
        let product_repo = Arc::new(InMemoryProductRepository::default());
        for product in products {
            product_repo.save(product.clone()).await.expect("save product");
        }

        let stats = Arc::new(InMemoryComparisonStatsRepository::default());
        let state = AdvisorState {
            advisor: Arc::new(UpgradeAdvisor::with_policy(ScoringPolicy::for_year(2024))),
            categories: Arc::new(StaticCategories),
            products: product_repo,
            stats: stats.clone(),
        };
        (state, stats)
    }

    fn request(profile: ProfileDraft) -> CompareRequest {
        CompareRequest {
            category_id: "cat-phones".to_string(),
            current_product_id: "prod-old".to_string(),
            new_product_id: "prod-new".to_string(),
            profile,
        }
    }

    #[tokio::test]
    async fn compare_scores_and_records_a_stat() {
        let (state, stats) = state_with_products(&[
            product("prod-old", "cat-phones", 50.0),
            product("prod-new", "cat-phones", 80.0),
        ])
        .await;

        let Json(result) = compare(State(state), Json(request(full_profile())))
            .await
            .expect("compare should succeed");

        assert_eq!(result.recommendation, Recommendation::WorthIt);

        // The stat write runs on a detached task; yield until it lands.
        for _ in 0..50 {
            if !stats.recorded().await.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        let recorded = stats.recorded().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].score, result.score);
        assert_eq!(recorded[0].recommendation, result.recommendation);
    }

    #[tokio::test]
    async fn incomplete_profile_is_rejected_before_scoring() {
        let (state, stats) = state_with_products(&[
            product("prod-old", "cat-phones", 50.0),
            product("prod-new", "cat-phones", 80.0),
        ])
        .await;

        let draft = ProfileDraft { budget_range: None, ..full_profile() };
        let (status, Json(error)) = compare(State(state), Json(request(draft)))
            .await
            .expect_err("incomplete profile must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error.error.contains("budget_range"));
        assert!(stats.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (state, _stats) =
            state_with_products(&[product("prod-old", "cat-phones", 50.0)]).await;

        let (status, Json(error)) = compare(State(state), Json(request(full_profile())))
            .await
            .expect_err("missing product must be rejected");

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(error.error.contains("prod-new"));
    }

    #[tokio::test]
    async fn category_mismatch_is_a_bad_request() {
        let (state, _stats) = state_with_products(&[
            product("prod-old", "cat-phones", 50.0),
            product("prod-new", "cat-laptops", 80.0),
        ])
        .await;

        let (status, Json(error)) = compare(State(state), Json(request(full_profile())))
            .await
            .expect_err("cross-category comparison must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error.error.contains("different categories"));
    }

    #[tokio::test]
    async fn stats_failure_never_fails_the_comparison() {
        let (state, stats) = state_with_products(&[
            product("prod-old", "cat-phones", 50.0),
            product("prod-new", "cat-phones", 80.0),
        ])
        .await;
        stats.fail_next_record().await;

        let Json(result) = compare(State(state), Json(request(full_profile())))
            .await
            .expect("compare must succeed despite stats failure");
        assert_eq!(result.recommendation, Recommendation::WorthIt);
    }

    #[tokio::test]
    async fn product_search_filters_by_category_and_name() {
        let (state, _stats) = state_with_products(&[
            product("Galax One", "cat-phones", 50.0),
            product("Galax Book", "cat-laptops", 50.0),
        ])
        .await;

        let Json(results) = search_products(
            State(state),
            Query(ProductSearchQuery {
                category_id: "cat-phones".to_string(),
                query: "galax".to_string(),
            }),
        )
        .await
        .expect("search should succeed");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id.0, "Galax One");
    }
}
