use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use crate::domain::comparison::Recommendation;

/// Tuning constants for the upgrade advisor.
///
/// The defaults reproduce the historical scoring behavior exactly; they are
/// fields rather than literals so operators can recalibrate without touching
/// the engine. `reference_year` stands in for "the current calendar year" in
/// the purchase-timing check, keeping the engine deterministic for a fixed
/// policy value.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringPolicy {
    /// Multiplier applied to every weighted gain before it moves the score.
    pub gain_amplification: f64,
    /// Bonus when the new product's typical price sits inside the user's
    /// budget band.
    pub budget_match_bonus: f64,
    /// Penalty when an economic-budget user looks at a premium-priced
    /// product.
    pub budget_blowout_penalty: f64,
    /// Upper bound of the economic band and lower bound of the intermediate
    /// band.
    pub economy_price_ceiling: Decimal,
    /// Lower bound of the premium band and upper bound of the intermediate
    /// band.
    pub premium_price_floor: Decimal,
    /// Assumed typical price when the product carries no price data at all.
    pub default_typical_price: Decimal,
    /// Lowest score classified as `worth_it`.
    pub worth_it_floor: u8,
    /// Lowest score classified as `depends`.
    pub depends_floor: u8,
    /// Model year treated as "current" by the purchase-timing check.
    pub reference_year: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            gain_amplification: 2.0,
            budget_match_bonus: 10.0,
            budget_blowout_penalty: -15.0,
            economy_price_ceiling: Decimal::from(1500),
            premium_price_floor: Decimal::from(4000),
            default_typical_price: Decimal::from(3000),
            worth_it_floor: 71,
            depends_floor: 41,
            reference_year: Utc::now().year(),
        }
    }
}

impl ScoringPolicy {
    pub fn for_year(reference_year: i32) -> Self {
        Self { reference_year, ..Self::default() }
    }

    pub fn classify(&self, score: u8) -> Recommendation {
        if score >= self.worth_it_floor {
            Recommendation::WorthIt
        } else if score >= self.depends_floor {
            Recommendation::Depends
        } else {
            Recommendation::NotWorth
        }
    }
}
