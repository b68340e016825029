use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result, workflow::schedule};

/// Units for delay amounts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DelayUnit {
    Minutes,
    #[default]
    Hours,
    Days,
    Weeks,
}

/// Delay node configuration.
///
/// `businessHoursOnly`, `skipWeekends` and `specificTime` adjust the resume
/// instant; see [`schedule::resume_at`](crate::workflow::schedule::resume_at)
/// for the exact order they apply in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelayConfig {
    pub amount: i64,
    #[serde(default)]
    pub unit: DelayUnit,
    #[serde(default)]
    pub business_hours_only: bool,
    #[serde(default)]
    pub skip_weekends: bool,
    /// Pin the resume to this "HH:MM" time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_time: Option<String>,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            amount: 1,
            unit: DelayUnit::default(),
            business_hours_only: false,
            skip_weekends: false,
            specific_time: None,
        }
    }
}

impl DelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(ReachflowError::Node("delay amount must be greater than zero".to_string()));
        }
        if let Some(time) = &self.specific_time {
            schedule::parse_time(time)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        let config = DelayConfig {
            amount: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(DelayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_specific_time_must_parse() {
        let config = DelayConfig {
            specific_time: Some("9am".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DelayConfig {
            specific_time: Some("09:00".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
