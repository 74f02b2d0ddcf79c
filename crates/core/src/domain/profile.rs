use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    Basic,
    Intermediate,
    Intense,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraImportance {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryNeeds {
    FewHours,
    AllDay,
    MoreThanDay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetRange {
    Economic,
    Intermediate,
    Premium,
}

/// A fully answered preference questionnaire.
///
/// Every field is total: the advisor never has to handle a missing answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub usage_level: UsageLevel,
    pub camera_importance: CameraImportance,
    pub battery_needs: BatteryNeeds,
    pub budget_range: BudgetRange,
}

/// The questionnaire while the user is still answering it.
///
/// `complete` is the only way to turn a draft into a [`UserProfile`], so any
/// missing answer is rejected before the advisor can be invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub usage_level: Option<UsageLevel>,
    pub camera_importance: Option<CameraImportance>,
    pub battery_needs: Option<BatteryNeeds>,
    pub budget_range: Option<BudgetRange>,
}

impl ProfileDraft {
    pub fn complete(self) -> Result<UserProfile, DomainError> {
        Ok(UserProfile {
            usage_level: self
                .usage_level
                .ok_or(DomainError::IncompleteProfile { field: "usage_level" })?,
            camera_importance: self
                .camera_importance
                .ok_or(DomainError::IncompleteProfile { field: "camera_importance" })?,
            battery_needs: self
                .battery_needs
                .ok_or(DomainError::IncompleteProfile { field: "battery_needs" })?,
            budget_range: self
                .budget_range
                .ok_or(DomainError::IncompleteProfile { field: "budget_range" })?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.usage_level.is_some()
            && self.camera_importance.is_some()
            && self.battery_needs.is_some()
            && self.budget_range.is_some()
    }
}

impl UsageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Intense => "intense",
        }
    }
}

impl CameraImportance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl BatteryNeeds {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FewHours => "few_hours",
            Self::AllDay => "all_day",
            Self::MoreThanDay => "more_than_day",
        }
    }
}

impl BudgetRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::Intermediate => "intermediate",
            Self::Premium => "premium",
        }
    }
}
