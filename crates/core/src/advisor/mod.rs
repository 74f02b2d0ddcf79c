//! The upgrade advisor: scores whether replacing one product with another is
//! worthwhile for a given preference profile.
//!
//! Pure and synchronous. The advisor reads two borrowed [`Product`] records
//! and a [`UserProfile`], allocates a fresh [`ComparisonResult`], and touches
//! nothing else; two calls with the same inputs and policy produce identical
//! results, so it is safe to share one advisor across concurrent requests.

pub mod policy;

mod conclusion;
mod weights;

use rust_decimal::Decimal;

use crate::domain::comparison::{
    AnalysisBreakdown, ComparisonResult, CostBenefit, PerformanceGain, PriceRange, PurchaseTiming,
};
use crate::domain::product::Product;
use crate::domain::profile::{BudgetRange, UserProfile};

pub use policy::ScoringPolicy;

use conclusion::conclusion_for;
use weights::PreferenceWeights;

const NEUTRAL_SCORE: f64 = 50.0;
const URGENT_PERFORMANCE_FLOOR: f64 = 60.0;

#[derive(Clone, Debug, Default)]
pub struct UpgradeAdvisor {
    policy: ScoringPolicy,
}

impl UpgradeAdvisor {
    pub fn new() -> Self {
        Self { policy: ScoringPolicy::default() }
    }

    pub fn with_policy(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score the upgrade from `current` to `new` under `profile`.
    ///
    /// Total over well-formed inputs: missing prices fall back to specified
    /// defaults and out-of-range quality scores flow through the arithmetic
    /// untouched, with only the final score clamped to 0-100.
    pub fn compare(
        &self,
        current: &Product,
        new: &Product,
        profile: &UserProfile,
    ) -> ComparisonResult {
        let weights = PreferenceWeights::for_profile(profile).normalized();

        let performance_gain_raw = new.scores.performance - current.scores.performance;
        let camera_gain_raw = new.scores.camera - current.scores.camera;
        let battery_gain_raw = new.scores.battery - current.scores.battery;
        let build_gain_raw = new.scores.build_quality - current.scores.build_quality;

        let amplification = self.policy.gain_amplification;
        let weighted_score = (NEUTRAL_SCORE
            + performance_gain_raw * weights.performance * amplification
            + camera_gain_raw * weights.camera * amplification
            + battery_gain_raw * weights.battery * amplification
            + build_gain_raw * weights.build_quality * amplification)
            .clamp(0.0, 100.0);

        let typical_price = new
            .price_typical
            .or(new.price_max)
            .unwrap_or(self.policy.default_typical_price);
        let budget_modifier = self.budget_modifier(profile.budget_range, typical_price);

        let score = (weighted_score + budget_modifier).clamp(0.0, 100.0).round() as u8;
        let recommendation = self.policy.classify(score);

        let purchase_timing = if current.scores.performance < URGENT_PERFORMANCE_FLOOR {
            PurchaseTiming::Urgent
        } else if new.year == Some(self.policy.reference_year) {
            PurchaseTiming::NoRush
        } else {
            PurchaseTiming::Wait
        };

        ComparisonResult {
            score,
            recommendation,
            price_range: PriceRange {
                min: new.price_min.unwrap_or(typical_price * Decimal::new(8, 1)),
                max: new.price_max.unwrap_or(typical_price * Decimal::new(12, 1)),
                typical: typical_price,
            },
            analysis: AnalysisBreakdown {
                performance_gain: PerformanceGain::from_raw_gain(performance_gain_raw),
                purchase_timing,
                cost_benefit: CostBenefit::from_score(score),
            },
            conclusion: conclusion_for(recommendation, profile.usage_level).to_string(),
        }
    }

    /// Bonus/penalty for how the new product's typical price sits against the
    /// user's stated budget band. Combinations outside the table are neutral.
    fn budget_modifier(&self, budget_range: BudgetRange, typical_price: Decimal) -> f64 {
        match budget_range {
            BudgetRange::Economic if typical_price <= self.policy.economy_price_ceiling => {
                self.policy.budget_match_bonus
            }
            BudgetRange::Economic if typical_price > self.policy.premium_price_floor => {
                self.policy.budget_blowout_penalty
            }
            BudgetRange::Intermediate
                if typical_price >= self.policy.economy_price_ceiling
                    && typical_price <= self.policy.premium_price_floor =>
            {
                self.policy.budget_match_bonus
            }
            BudgetRange::Premium if typical_price >= self.policy.premium_price_floor => {
                self.policy.budget_match_bonus
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{ScoringPolicy, UpgradeAdvisor};
    use crate::domain::comparison::{CostBenefit, PerformanceGain, PurchaseTiming, Recommendation};
    use crate::domain::product::{CategoryId, Product, ProductId, QualityScores};
    use crate::domain::profile::{
        BatteryNeeds, BudgetRange, CameraImportance, UsageLevel, UserProfile,
    };

    const REFERENCE_YEAR: i32 = 2024;

    fn advisor() -> UpgradeAdvisor {
        UpgradeAdvisor::with_policy(ScoringPolicy::for_year(REFERENCE_YEAR))
    }

    fn product(id: &str, scores: QualityScores) -> Product {
        Product {
            id: ProductId(id.to_string()),
            category_id: CategoryId("smartphones".to_string()),
            name: id.to_string(),
            brand: None,
            model: None,
            year: None,
            price_min: None,
            price_max: None,
            price_typical: None,
            scores,
        }
    }

    fn flat_scores(value: f64) -> QualityScores {
        QualityScores { performance: value, camera: value, battery: value, build_quality: value }
    }

    fn profile(budget_range: BudgetRange) -> UserProfile {
        UserProfile {
            usage_level: UsageLevel::Intense,
            camera_importance: CameraImportance::Low,
            battery_needs: BatteryNeeds::FewHours,
            budget_range,
        }
    }

    #[test]
    fn performance_upgrade_for_intense_user_scores_ninety_two() {
        // Raw weights (0.4, 0.1, 0.15, 0.1) sum to 0.75; the +30 performance
        // gain contributes 30 * (0.4 / 0.75) * 2 = 32, and 3000 sits inside
        // the intermediate band for another +10.
        let current = product("current", flat_scores(50.0));
        let mut new = product("new", flat_scores(50.0));
        new.scores.performance = 80.0;
        new.price_typical = Some(Decimal::from(3000));

        let result = advisor().compare(&current, &new, &profile(BudgetRange::Intermediate));

        assert_eq!(result.score, 92);
        assert_eq!(result.recommendation, Recommendation::WorthIt);
        assert_eq!(result.analysis.performance_gain, PerformanceGain::High);
        assert_eq!(result.analysis.cost_benefit, CostBenefit::Excellent);
        assert!(result.conclusion.contains("uso intenso"));
    }

    #[test]
    fn identical_products_in_neutral_band_score_fifty() {
        let current = product("current", flat_scores(70.0));
        let mut new = product("new", flat_scores(70.0));
        // 2000 is outside every economic-band rule, so no modifier applies.
        new.price_typical = Some(Decimal::from(2000));

        let result = advisor().compare(&current, &new, &profile(BudgetRange::Economic));

        assert_eq!(result.score, 50);
        assert_eq!(result.recommendation, Recommendation::Depends);
    }

    #[test]
    fn uniform_twenty_point_regression_scores_ten() {
        let current = product("current", flat_scores(70.0));
        let mut new = product("new", flat_scores(50.0));
        new.price_typical = Some(Decimal::from(2000));

        let result = advisor().compare(&current, &new, &profile(BudgetRange::Economic));

        // Normalized weights sum to 1, so the regression moves the score by
        // -20 * 2 regardless of the profile: 50 - 40 = 10.
        assert_eq!(result.score, 10);
        assert_eq!(result.recommendation, Recommendation::NotWorth);
        assert_eq!(result.analysis.performance_gain, PerformanceGain::Low);
    }

    #[test]
    fn deep_regression_with_budget_penalty_clamps_to_zero() {
        let current = product("current", flat_scores(90.0));
        let mut new = product("new", flat_scores(60.0));
        new.price_typical = Some(Decimal::from(5000));

        let result = advisor().compare(&current, &new, &profile(BudgetRange::Economic));

        // Weighted score is 50 - 60, clamped to 0; the -15 economic blowout
        // penalty cannot push it below the floor.
        assert_eq!(result.score, 0);
        assert_eq!(result.recommendation, Recommendation::NotWorth);
        assert_eq!(result.analysis.cost_benefit, CostBenefit::Poor);
    }

    #[test]
    fn repeated_calls_return_identical_results() {
        let current = product("current", QualityScores {
            performance: 55.0,
            camera: 62.0,
            battery: 48.0,
            build_quality: 70.0,
        });
        let mut new = product("new", QualityScores {
            performance: 78.0,
            camera: 66.0,
            battery: 71.0,
            build_quality: 69.0,
        });
        new.price_typical = Some(Decimal::from(2799));
        new.year = Some(REFERENCE_YEAR);

        let advisor = advisor();
        let user = profile(BudgetRange::Intermediate);
        let first = advisor.compare(&current, &new, &user);
        let second = advisor.compare(&current, &new, &user);

        assert_eq!(first, second);
    }

    #[test]
    fn score_stays_within_bounds_for_extreme_inputs() {
        let advisor = advisor();
        let user = profile(BudgetRange::Premium);

        let floor = product("floor", flat_scores(-500.0));
        let ceiling = product("ceiling", flat_scores(900.0));

        let up = advisor.compare(&floor, &ceiling, &user);
        let down = advisor.compare(&ceiling, &floor, &user);

        assert_eq!(up.score, 100);
        assert_eq!(down.score, 0);
    }

    #[test]
    fn raising_any_single_dimension_never_lowers_the_score() {
        let advisor = advisor();
        let user = UserProfile {
            usage_level: UsageLevel::Intermediate,
            camera_importance: CameraImportance::Medium,
            battery_needs: BatteryNeeds::AllDay,
            budget_range: BudgetRange::Intermediate,
        };
        let current = product("current", flat_scores(60.0));

        let mut baseline_new = product("new", flat_scores(60.0));
        baseline_new.price_typical = Some(Decimal::from(2500));
        let baseline = advisor.compare(&current, &baseline_new, &user).score;

        for bump in [5.0, 10.0, 25.0] {
            for dimension in 0..4 {
                let mut bumped = baseline_new.clone();
                match dimension {
                    0 => bumped.scores.performance += bump,
                    1 => bumped.scores.camera += bump,
                    2 => bumped.scores.battery += bump,
                    _ => bumped.scores.build_quality += bump,
                }
                let score = advisor.compare(&current, &bumped, &user).score;
                assert!(
                    score >= baseline,
                    "raising dimension {dimension} by {bump} dropped {baseline} to {score}"
                );
            }
        }
    }

    #[test]
    fn typical_price_falls_back_from_typical_to_max_to_default() {
        let advisor = advisor();
        let user = profile(BudgetRange::Intermediate);
        let current = product("current", flat_scores(50.0));

        let mut with_max_only = product("new", flat_scores(50.0));
        with_max_only.price_max = Some(Decimal::from(5000));
        let result = advisor.compare(&current, &with_max_only, &user);
        assert_eq!(result.price_range.typical, Decimal::from(5000));

        let bare = product("new", flat_scores(50.0));
        let result = advisor.compare(&current, &bare, &user);
        assert_eq!(result.price_range.typical, Decimal::from(3000));
    }

    #[test]
    fn price_range_bounds_derive_from_typical_when_absent() {
        let advisor = advisor();
        let user = profile(BudgetRange::Intermediate);
        let current = product("current", flat_scores(50.0));

        let mut new = product("new", flat_scores(50.0));
        new.price_typical = Some(Decimal::from(2000));
        let result = advisor.compare(&current, &new, &user);

        assert_eq!(result.price_range.min, Decimal::from(1600));
        assert_eq!(result.price_range.max, Decimal::from(2400));

        new.price_min = Some(Decimal::from(1800));
        new.price_max = Some(Decimal::from(2300));
        let result = advisor.compare(&current, &new, &user);
        assert_eq!(result.price_range.min, Decimal::from(1800));
        assert_eq!(result.price_range.max, Decimal::from(2300));
    }

    #[test]
    fn budget_modifier_table_matches_every_band() {
        let advisor = advisor();
        let cases = [
            (BudgetRange::Economic, 1500, 10.0),
            (BudgetRange::Economic, 1501, 0.0),
            (BudgetRange::Economic, 4000, 0.0),
            (BudgetRange::Economic, 4001, -15.0),
            (BudgetRange::Intermediate, 1499, 0.0),
            (BudgetRange::Intermediate, 1500, 10.0),
            (BudgetRange::Intermediate, 4000, 10.0),
            (BudgetRange::Intermediate, 4001, 0.0),
            (BudgetRange::Premium, 3999, 0.0),
            (BudgetRange::Premium, 4000, 10.0),
        ];
        for (budget_range, price, expected) in cases {
            let modifier = advisor.budget_modifier(budget_range, Decimal::from(price));
            assert_eq!(modifier, expected, "{budget_range:?} at {price}");
        }
    }

    #[test]
    fn score_forty_is_not_worth_yet_good_cost_benefit() {
        // -5 on every dimension lands the weighted score at exactly 40 in the
        // neutral band, pinning the historical threshold mismatch between the
        // recommendation and cost-benefit scales.
        let current = product("current", flat_scores(60.0));
        let mut new = product("new", flat_scores(55.0));
        new.price_typical = Some(Decimal::from(2000));

        let result = advisor().compare(&current, &new, &profile(BudgetRange::Economic));

        assert_eq!(result.score, 40);
        assert_eq!(result.recommendation, Recommendation::NotWorth);
        assert_eq!(result.analysis.cost_benefit, CostBenefit::Good);
    }

    #[test]
    fn purchase_timing_tracks_current_performance_and_model_year() {
        let advisor = advisor();
        let user = profile(BudgetRange::Intermediate);

        let tired = product("tired", QualityScores {
            performance: 45.0,
            camera: 80.0,
            battery: 80.0,
            build_quality: 80.0,
        });
        let healthy = product("healthy", flat_scores(75.0));

        let mut current_year_model = product("new", flat_scores(80.0));
        current_year_model.year = Some(REFERENCE_YEAR);
        let mut older_model = product("new", flat_scores(80.0));
        older_model.year = Some(REFERENCE_YEAR - 2);
        let unknown_year = product("new", flat_scores(80.0));

        let result = advisor.compare(&tired, &current_year_model, &user);
        assert_eq!(result.analysis.purchase_timing, PurchaseTiming::Urgent);

        let result = advisor.compare(&healthy, &current_year_model, &user);
        assert_eq!(result.analysis.purchase_timing, PurchaseTiming::NoRush);

        let result = advisor.compare(&healthy, &older_model, &user);
        assert_eq!(result.analysis.purchase_timing, PurchaseTiming::Wait);

        let result = advisor.compare(&healthy, &unknown_year, &user);
        assert_eq!(result.analysis.purchase_timing, PurchaseTiming::Wait);
    }

    #[test]
    fn conclusion_follows_recommendation_and_usage_level() {
        let advisor = advisor();
        let current = product("current", flat_scores(50.0));
        let mut new = product("new", flat_scores(80.0));
        new.price_typical = Some(Decimal::from(2000));

        let basic = UserProfile { usage_level: UsageLevel::Basic, ..profile(BudgetRange::Intermediate) };
        let result = advisor.compare(&current, &new, &basic);
        assert_eq!(result.recommendation, Recommendation::WorthIt);
        assert!(result.conclusion.contains("não precisa do modelo"));

        let worse = product("worse", flat_scores(20.0));
        let result = advisor.compare(&current, &worse, &basic);
        assert_eq!(result.recommendation, Recommendation::NotWorth);
        assert!(result.conclusion.contains("não faz sentido trocar agora"));
    }
}
