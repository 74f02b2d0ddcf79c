pub mod advisor;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;

pub use advisor::{ScoringPolicy, UpgradeAdvisor};
pub use domain::comparison::{
    AnalysisBreakdown, ComparisonRecord, ComparisonResult, CostBenefit, PerformanceGain,
    PriceRange, PurchaseTiming, Recommendation,
};
pub use domain::lead::{Company, LeadId, LeadStatus, SavedLead};
pub use domain::product::{Category, CategoryId, Product, ProductId, QualityScores};
pub use domain::profile::{
    BatteryNeeds, BudgetRange, CameraImportance, ProfileDraft, UsageLevel, UserProfile,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use export::{companies_csv, export_filename};
