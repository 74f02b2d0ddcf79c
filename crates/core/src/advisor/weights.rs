use crate::domain::profile::{BatteryNeeds, CameraImportance, UsageLevel, UserProfile};

const BUILD_QUALITY_WEIGHT: f64 = 0.1;

/// Per-dimension preference weights, one set per comparison call.
///
/// Built as a local value and normalized by construction; nothing shared,
/// nothing mutated after `normalized` returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PreferenceWeights {
    pub performance: f64,
    pub camera: f64,
    pub battery: f64,
    pub build_quality: f64,
}

impl PreferenceWeights {
    /// Raw weights straight from the questionnaire answers.
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self {
            performance: match profile.usage_level {
                UsageLevel::Intense => 0.4,
                UsageLevel::Intermediate => 0.3,
                UsageLevel::Basic => 0.2,
            },
            camera: match profile.camera_importance {
                CameraImportance::High => 0.35,
                CameraImportance::Medium => 0.25,
                CameraImportance::Low => 0.1,
            },
            battery: match profile.battery_needs {
                BatteryNeeds::MoreThanDay => 0.35,
                BatteryNeeds::AllDay => 0.25,
                BatteryNeeds::FewHours => 0.15,
            },
            build_quality: BUILD_QUALITY_WEIGHT,
        }
    }

    /// Scale the weights so they sum to 1. The raw sum is always positive
    /// (every answer maps to a positive constant), so no zero-division arm.
    pub fn normalized(self) -> Self {
        let total = self.performance + self.camera + self.battery + self.build_quality;
        Self {
            performance: self.performance / total,
            camera: self.camera / total,
            battery: self.battery / total,
            build_quality: self.build_quality / total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PreferenceWeights;
    use crate::domain::profile::{
        BatteryNeeds, BudgetRange, CameraImportance, UsageLevel, UserProfile,
    };

    fn profile(
        usage_level: UsageLevel,
        camera_importance: CameraImportance,
        battery_needs: BatteryNeeds,
    ) -> UserProfile {
        UserProfile {
            usage_level,
            camera_importance,
            battery_needs,
            budget_range: BudgetRange::Intermediate,
        }
    }

    #[test]
    fn normalized_weights_sum_to_one_for_every_profile() {
        for usage in [UsageLevel::Basic, UsageLevel::Intermediate, UsageLevel::Intense] {
            for camera in [CameraImportance::Low, CameraImportance::Medium, CameraImportance::High]
            {
                for battery in
                    [BatteryNeeds::FewHours, BatteryNeeds::AllDay, BatteryNeeds::MoreThanDay]
                {
                    let weights =
                        PreferenceWeights::for_profile(&profile(usage, camera, battery))
                            .normalized();
                    let sum = weights.performance
                        + weights.camera
                        + weights.battery
                        + weights.build_quality;
                    assert!((sum - 1.0).abs() < 1e-9, "sum {sum} for {usage:?}/{camera:?}/{battery:?}");
                }
            }
        }
    }

    #[test]
    fn intense_low_few_hours_profile_weights() {
        let weights = PreferenceWeights::for_profile(&profile(
            UsageLevel::Intense,
            CameraImportance::Low,
            BatteryNeeds::FewHours,
        ));
        assert_eq!(
            weights,
            PreferenceWeights { performance: 0.4, camera: 0.1, battery: 0.15, build_quality: 0.1 }
        );

        let normalized = weights.normalized();
        // Raw sum is 0.75, so performance carries 0.4 / 0.75 of the score.
        assert!((normalized.performance - 0.4 / 0.75).abs() < 1e-12);
    }

    #[test]
    fn build_quality_weight_is_preference_independent() {
        let a = PreferenceWeights::for_profile(&profile(
            UsageLevel::Basic,
            CameraImportance::Low,
            BatteryNeeds::FewHours,
        ));
        let b = PreferenceWeights::for_profile(&profile(
            UsageLevel::Intense,
            CameraImportance::High,
            BatteryNeeds::MoreThanDay,
        ));
        assert_eq!(a.build_quality, b.build_quality);
    }
}
