use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// Tolerance when checking that branch percentages sum to 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// How a split node assigns contacts to branches.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SplitType {
    #[default]
    Percentage,
    Random,
    FieldBased,
}

/// A named, weighted outgoing path from a split node.
///
/// The branch `id` doubles as the source handle on the matching edge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub percentage: f64,
}

/// Split node configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitConfig {
    #[serde(default)]
    pub split_type: SplitType,
    pub branches: Vec<Branch>,
    /// Field whose value selects the branch (by label) for `field_based`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            split_type: SplitType::Percentage,
            branches: vec![
                Branch {
                    id: "a".to_string(),
                    label: "A".to_string(),
                    percentage: 50.0,
                },
                Branch {
                    id: "b".to_string(),
                    label: "B".to_string(),
                    percentage: 50.0,
                },
            ],
            field_name: None,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.branches.len() < 2 {
            return Err(ReachflowError::Node("split node requires at least two branches".to_string()));
        }
        if self.split_type == SplitType::FieldBased && self.field_name.as_deref().unwrap_or("").is_empty() {
            return Err(ReachflowError::Node("field_based split requires a field name".to_string()));
        }
        if self.weighted() && !self.percentages_sum_to_100() {
            return Err(ReachflowError::Node(format!("split branch percentages sum to {:.2}, expected 100", self.percentage_sum())));
        }
        Ok(())
    }

    /// Whether branch percentages drive the assignment.
    pub fn weighted(&self) -> bool {
        matches!(self.split_type, SplitType::Percentage | SplitType::Random)
    }

    pub fn percentage_sum(&self) -> f64 {
        self.branches.iter().map(|b| b.percentage).sum()
    }

    pub fn percentages_sum_to_100(&self) -> bool {
        (self.percentage_sum() - 100.0).abs() <= PERCENTAGE_TOLERANCE
    }

    /// Deterministically pick a weighted branch for a contact.
    ///
    /// The contact id is hashed into [0, 100) and walked through the
    /// cumulative percentage ranges, so a given contact always lands on the
    /// same branch of a given split node.
    pub fn pick_weighted(
        &self,
        node_id: &str,
        contact_id: &str,
    ) -> Option<&Branch> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        node_id.hash(&mut hasher);
        contact_id.hash(&mut hasher);
        let point = (hasher.finish() % 10_000) as f64 / 100.0;

        let mut cumulative = 0.0;
        for branch in &self.branches {
            cumulative += branch.percentage;
            if point < cumulative {
                return Some(branch);
            }
        }
        self.branches.last()
    }

    /// Pick the branch whose label equals the field value (`field_based`).
    pub fn pick_by_value(
        &self,
        value: &str,
    ) -> Option<&Branch> {
        self.branches.iter().find(|b| b.label == value)
    }
}
