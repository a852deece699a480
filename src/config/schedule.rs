//! Scheduling configuration

use serde::Deserialize;

use crate::domain::schedule::{DeadlinePolicy, DEFAULT_DEADLINE_LEAD_DAYS};

use super::error::ValidationError;

/// Recruiting deadline settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Days between a lesson's recruiting deadline and its start date
    #[serde(default = "default_lead_days")]
    pub deadline_lead_days: u32,
}

impl ScheduleConfig {
    /// Build the deadline policy these settings describe
    pub fn deadline_policy(&self) -> Result<DeadlinePolicy, ValidationError> {
        DeadlinePolicy::new(self.deadline_lead_days)
            .map_err(|_| ValidationError::InvalidDeadlineLeadDays(self.deadline_lead_days))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.deadline_policy().map(|_| ())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            deadline_lead_days: default_lead_days(),
        }
    }
}

fn default_lead_days() -> u32 {
    DEFAULT_DEADLINE_LEAD_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one_week() {
        let policy = ScheduleConfig::default().deadline_policy().unwrap();
        assert_eq!(policy.lead_days(), 7);
    }

    #[test]
    fn rejects_zero_and_oversized_lead_time() {
        for days in [0, 366] {
            let config = ScheduleConfig {
                deadline_lead_days: days,
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidDeadlineLeadDays(days))
            );
        }
    }
}
