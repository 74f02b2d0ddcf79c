use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{CategoryId, ProductId};
use crate::domain::profile::UserProfile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    NotWorth,
    Depends,
    WorthIt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceGain {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseTiming {
    Urgent,
    NoRush,
    Wait,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBenefit {
    Poor,
    Good,
    Excellent,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotWorth => "not_worth",
            Self::Depends => "depends",
            Self::WorthIt => "worth_it",
        }
    }
}

impl PerformanceGain {
    /// Tiers the raw (un-weighted) performance delta between the two products.
    pub fn from_raw_gain(gain: f64) -> Self {
        if gain < 5.0 {
            Self::Low
        } else if gain < 15.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl CostBenefit {
    /// Thresholds are <40 / <70, one off from the recommendation tiers on
    /// purpose: a final score of exactly 40 classifies as `not_worth` yet
    /// `good` cost-benefit. Historical behavior, kept until product decides
    /// to unify the two scales.
    pub fn from_score(score: u8) -> Self {
        if score < 40 {
            Self::Poor
        } else if score < 70 {
            Self::Good
        } else {
            Self::Excellent
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
    pub typical: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBreakdown {
    pub performance_gain: PerformanceGain,
    pub purchase_timing: PurchaseTiming,
    pub cost_benefit: CostBenefit,
}

/// The advisor's verdict for a single comparison request.
///
/// Constructed fresh per call and never mutated afterwards. Wire names are
/// camelCase to match the public JSON contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub score: u8,
    pub recommendation: Recommendation,
    pub price_range: PriceRange,
    pub analysis: AnalysisBreakdown,
    pub conclusion: String,
}

/// What the stats recorder persists about a comparison, alongside the verdict.
///
/// Recording is fire-and-forget: producing this value must never block or
/// fail the user-facing result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub category_id: CategoryId,
    pub current_product_id: ProductId,
    pub new_product_id: ProductId,
    pub profile: UserProfile,
    pub score: u8,
    pub recommendation: Recommendation,
}
