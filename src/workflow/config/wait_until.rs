use serde::{Deserialize, Serialize};

use crate::{
    ReachflowError, Result,
    workflow::{condition::Condition, config::DelayUnit},
};

/// Default interval between condition re-checks, in minutes.
pub const DEFAULT_CHECK_EVERY_MINUTES: i64 = 15;

/// Wait-until node configuration.
///
/// Condition-driven analog of delay: the record suspends and the condition
/// is re-checked on a fixed interval until it holds or the optional timeout
/// elapses. On timeout the record follows the "timeout" branch if one is
/// connected, otherwise the default edge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaitUntilConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default = "default_check_every")]
    pub check_every_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_unit: Option<DelayUnit>,
}

fn default_check_every() -> i64 {
    DEFAULT_CHECK_EVERY_MINUTES
}

impl Default for WaitUntilConfig {
    fn default() -> Self {
        Self {
            condition: None,
            check_every_minutes: DEFAULT_CHECK_EVERY_MINUTES,
            timeout_amount: None,
            timeout_unit: None,
        }
    }
}

impl WaitUntilConfig {
    pub fn validate(&self) -> Result<()> {
        let Some(condition) = &self.condition else {
            return Err(ReachflowError::Node("wait_until node requires a condition".to_string()));
        };
        condition.validate()?;
        if self.check_every_minutes <= 0 {
            return Err(ReachflowError::Node("wait_until check interval must be positive".to_string()));
        }
        if let Some(amount) = self.timeout_amount
            && amount <= 0
        {
            return Err(ReachflowError::Node("wait_until timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Timeout expressed in minutes, if configured.
    pub fn timeout_minutes(&self) -> Option<i64> {
        let amount = self.timeout_amount?;
        let unit = self.timeout_unit.unwrap_or(DelayUnit::Hours);
        Some(match unit {
            DelayUnit::Minutes => amount,
            DelayUnit::Hours => amount * 60,
            DelayUnit::Days => amount * 60 * 24,
            DelayUnit::Weeks => amount * 60 * 24 * 7,
        })
    }
}
