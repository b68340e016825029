//! Simple filter/pagination query for store collections.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// Default page size when none is set.
const DEFAULT_LIMIT: usize = 10_000;

/// Equality-filtered, offset/limit paginated query.
#[derive(Debug, Clone)]
pub struct Query {
    filters: Vec<(String, JsonValue)>,
    offset: usize,
    limit: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }

    /// add an equality filter on a document field
    pub fn push(
        mut self,
        key: &str,
        value: impl Into<JsonValue>,
    ) -> Self {
        self.filters.push((key.to_string(), value.into()));
        self
    }

    pub fn set_offset(
        mut self,
        offset: usize,
    ) -> Self {
        self.offset = offset;
        self
    }

    pub fn set_limit(
        mut self,
        limit: usize,
    ) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn filters(&self) -> &[(String, JsonValue)] {
        &self.filters
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// whether a flattened document satisfies every filter
    pub fn is_match(
        &self,
        doc: &HashMap<String, JsonValue>,
    ) -> bool {
        self.filters.iter().all(|(key, value)| doc.get(key) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_all_filters_must_match() {
        let query = Query::new().push("wid", "wf1").push("status", "active");

        let mut doc = HashMap::new();
        doc.insert("wid".to_string(), json!("wf1"));
        doc.insert("status".to_string(), json!("active"));
        assert!(query.is_match(&doc));

        doc.insert("status".to_string(), json!("waiting"));
        assert!(!query.is_match(&doc));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(Query::new().is_match(&HashMap::new()));
    }

    #[test]
    fn test_limit_floor_is_one() {
        assert_eq!(Query::new().set_limit(0).limit(), 1);
    }
}
