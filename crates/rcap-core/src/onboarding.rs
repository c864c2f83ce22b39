//! Guided onboarding steps and per-user progress.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStep {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: u32,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProgress {
    #[serde(default)]
    pub completed_steps: Vec<u64>,
    #[serde(default)]
    pub skipped_steps: Vec<u64>,
    pub total_steps: u64,
    #[serde(default)]
    pub progress_percentage: f64,
}

impl OnboardingProgress {
    /// Records a finished or skipped step and recomputes the percentage.
    ///
    /// Only completed steps count towards progress.
    pub fn record(&mut self, step_id: u64, skipped: bool) {
        if skipped {
            self.skipped_steps.push(step_id);
        } else {
            self.completed_steps.push(step_id);
        }
        self.progress_percentage = if self.total_steps == 0 {
            0.0
        } else {
            self.completed_steps.len() as f64 / self.total_steps as f64 * 100.0
        };
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StepCompletion {
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_only_completed() {
        let mut progress = OnboardingProgress {
            total_steps: 4,
            ..Default::default()
        };
        progress.record(1, false);
        progress.record(2, true);

        assert_eq!(progress.completed_steps, vec![1]);
        assert_eq!(progress.skipped_steps, vec![2]);
        assert!((progress.progress_percentage - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_steps_is_required() {
        assert!(serde_json::from_str::<OnboardingProgress>(r#"{"status": "maintenance"}"#).is_err());
        assert!(serde_json::from_str::<OnboardingProgress>(r#"{"total_steps": 3}"#).is_ok());
    }

    #[test]
    fn test_record_with_no_total() {
        let mut progress = OnboardingProgress::default();
        progress.record(1, false);
        assert_eq!(progress.progress_percentage, 0.0);
    }
}
