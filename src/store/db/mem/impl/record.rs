use std::collections::HashMap;

use serde_json::{Value as JsonValue, json};

use crate::{
    Result,
    store::{data::Record, db::mem::DbDocument},
};

impl DbDocument for Record {
    fn id(&self) -> &str {
        &self.id
    }

    fn doc(&self) -> Result<HashMap<String, JsonValue>> {
        let mut map = HashMap::new();
        map.insert("id".to_string(), json!(self.id.clone()));
        map.insert("wid".to_string(), json!(self.wid.clone()));
        map.insert("cid".to_string(), json!(self.cid.clone()));
        map.insert("status".to_string(), json!(self.status.clone()));
        map.insert("data".to_string(), json!(self.data.clone()));
        map.insert("definition".to_string(), json!(self.definition.clone()));
        map.insert("enrolled_day".to_string(), json!(self.enrolled_day.clone()));
        map.insert("timestamp".to_string(), json!(self.timestamp));
        Ok(map)
    }
}
