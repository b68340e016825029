//! Condition model and evaluation.
//!
//! A condition is a primary `{field, operator, value}` check plus optional
//! chained sub-conditions, each carrying the logical operator that combines
//! it with the accumulated result. Evaluation is strictly sequential
//! left-to-right with no precedence; this matches how existing workflows
//! were authored and must not be changed silently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ReachflowError, Result, collab::Contact, common::Vars};

/// Comparison operators available in condition nodes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    /// Operators that test presence only and take no comparison value.
    pub fn is_unary(&self) -> bool {
        matches!(self, ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty)
    }
}

/// How a chained sub-condition combines with the accumulated result.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

/// A condition with optional left-to-right chained sub-conditions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
    /// Combines this condition with the result accumulated so far.
    /// Ignored on the primary condition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub logical_operator: Option<LogicalOperator>,
    /// Chained sub-conditions, evaluated in order after the primary.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conditions: Vec<Condition>,
}

impl Condition {
    /// Checks required-field completeness: a field name is always needed,
    /// and binary operators need a comparison value.
    pub fn validate(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(ReachflowError::Node("condition field is required".to_string()));
        }
        if !self.operator.is_unary() && self.value.is_none() {
            return Err(ReachflowError::Node(format!("condition on '{}' requires a value for operator '{}'", self.field, self.operator.as_ref())));
        }
        for chained in &self.conditions {
            chained.validate()?;
        }
        Ok(())
    }

    /// Evaluates the condition chain against a contact and a record context.
    ///
    /// The primary result is folded with each chained condition in order:
    /// `((primary OP c1) OP c2) ...` - no precedence between and/or.
    pub fn evaluate(
        &self,
        contact: &Contact,
        context: &Vars,
    ) -> bool {
        let mut result = self.evaluate_single(contact, context);
        for chained in &self.conditions {
            let rhs = chained.evaluate_single(contact, context);
            result = match chained.logical_operator.unwrap_or_default() {
                LogicalOperator::And => result && rhs,
                LogicalOperator::Or => result || rhs,
            };
        }
        result
    }

    fn evaluate_single(
        &self,
        contact: &Contact,
        context: &Vars,
    ) -> bool {
        let actual = resolve_field(&self.field, contact, context);
        evaluate_comparison(actual.as_ref(), self.operator, self.value.as_ref())
    }
}

/// Resolves a condition field against the contact and then the record
/// context. The reserved fields "tag"/"tags" resolve to the contact's tag
/// list.
pub fn resolve_field(
    field: &str,
    contact: &Contact,
    context: &Vars,
) -> Option<Value> {
    if field == "tag" || field == "tags" {
        return Some(Value::Array(contact.tags.iter().map(|t| Value::String(t.clone())).collect()));
    }
    if let Some(value) = contact.fields.get_value(field) {
        return Some(value.clone());
    }
    context.get_value(field).cloned()
}

fn evaluate_comparison(
    actual: Option<&Value>,
    operator: ConditionOperator,
    expected: Option<&Value>,
) -> bool {
    match operator {
        ConditionOperator::IsEmpty => match actual {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(arr)) => arr.is_empty(),
            Some(Value::Object(obj)) => obj.is_empty(),
            _ => false,
        },
        ConditionOperator::IsNotEmpty => !evaluate_comparison(actual, ConditionOperator::IsEmpty, expected),
        _ => {
            let (Some(actual), Some(expected)) = (actual, expected) else {
                return false;
            };
            match operator {
                ConditionOperator::Equals => eval_equals(actual, expected),
                ConditionOperator::NotEquals => !eval_equals(actual, expected),
                ConditionOperator::Contains => eval_contains(actual, expected),
                ConditionOperator::NotContains => !eval_contains(actual, expected),
                ConditionOperator::GreaterThan => eval_cmp(actual, expected, |a, b| a > b),
                ConditionOperator::LessThan => eval_cmp(actual, expected, |a, b| a < b),
                ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty => unreachable!(),
            }
        }
    }
}

fn eval_equals(
    actual: &Value,
    expected: &Value,
) -> bool {
    match (actual, expected) {
        // A tag list equals a scalar when any element matches.
        (Value::Array(arr), e) => arr.iter().any(|v| eval_equals(v, e)),
        (Value::Number(n), Value::String(s)) => s.parse::<f64>().ok().is_some_and(|e| n.as_f64() == Some(e)),
        (Value::String(s), Value::Number(n)) => s.parse::<f64>().ok().is_some_and(|a| Some(a) == n.as_f64()),
        (Value::Bool(b), Value::String(s)) => (*b && s == "true") || (!*b && s == "false"),
        (a, e) => a == e,
    }
}

fn eval_contains(
    actual: &Value,
    expected: &Value,
) -> bool {
    match (actual, expected) {
        (Value::String(s), Value::String(e)) => s.contains(e.as_str()),
        (Value::Array(arr), e) => arr.iter().any(|v| eval_equals(v, e)),
        _ => false,
    }
}

fn eval_cmp<F>(
    actual: &Value,
    expected: &Value,
    cmp: F,
) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    let a = match actual {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    let e = match expected {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    match (a, e) {
        (Some(a), Some(e)) => cmp(a, e),
        _ => false,
    }
}
