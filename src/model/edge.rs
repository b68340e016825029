use serde::{Deserialize, Serialize};

/// Serialized directed connection between two nodes.
///
/// `source_handle` distinguishes branches leaving condition and split nodes
/// ("true"/"false" or a branch id). It serializes as `sourceHandle` and is
/// omitted for plain sequential edges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeModel {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle", skip_serializing_if = "Option::is_none", default)]
    pub source_handle: Option<String>,
}
