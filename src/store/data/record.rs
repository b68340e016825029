use serde::{Deserialize, Serialize};

use crate::store::{DbCollectionIden, StoreIden};

/// Persisted execution record row.
#[derive(Default, Deserialize, Serialize, Debug, Clone)]
pub struct Record {
    pub id: String,
    pub wid: String,
    /// contact id
    pub cid: String,
    pub status: String,
    /// serialized [`crate::runtime::ExecutionRecord`]
    pub data: String,
    /// serialized [`crate::model::WorkflowModel`] the record enrolled
    /// against; resume recompiles from this, not the latest deploy
    pub definition: String,
    /// enrollment date as "YYYY-MM-DD", used by the daily enrollment cap
    pub enrolled_day: String,
    pub timestamp: i64,
}

impl DbCollectionIden for Record {
    fn iden() -> StoreIden {
        StoreIden::Records
    }
}
