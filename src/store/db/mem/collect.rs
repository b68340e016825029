use std::{
    collections::HashMap,
    fmt::Debug,
    sync::RwLock,
};

use crate::{
    ReachflowError, Result,
    store::{DbCollection, PageData, query::Query},
    store::db::mem::DbDocument,
};

/// One in-memory collection, keyed by document id.
#[derive(Debug)]
pub struct Collect<T> {
    name: String,
    rows: RwLock<HashMap<String, T>>,
}

impl<T> Collect<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> DbCollection for Collect<T>
where
    T: DbDocument + Debug + Clone + Send + Sync,
{
    type Item = T;

    fn exists(
        &self,
        id: &str,
    ) -> Result<bool> {
        Ok(self.rows.read().unwrap().contains_key(id))
    }

    fn find(
        &self,
        id: &str,
    ) -> Result<T> {
        self.rows.read().unwrap().get(id).cloned().ok_or(ReachflowError::Store(format!("{}: cannot find item by id '{}'", self.name, id)))
    }

    fn query(
        &self,
        query: &Query,
    ) -> Result<PageData<T>> {
        let rows = self.rows.read().unwrap();

        let mut matches: Vec<&T> = Vec::new();
        for row in rows.values() {
            if query.is_match(&row.doc()?) {
                matches.push(row);
            }
        }
        // HashMap iteration order is arbitrary; sort for stable pages.
        matches.sort_by(|a, b| a.id().cmp(b.id()));

        let count = matches.len();
        let page_size = query.limit();
        let rows: Vec<T> = matches.into_iter().skip(query.offset()).take(page_size).cloned().collect();

        Ok(PageData {
            count,
            page_num: query.offset() / page_size + 1,
            page_count: count.div_ceil(page_size),
            page_size,
            rows,
        })
    }

    fn create(
        &self,
        data: &T,
    ) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        if rows.contains_key(data.id()) {
            return Err(ReachflowError::Store(format!("{}: item '{}' already exists", self.name, data.id())));
        }
        rows.insert(data.id().to_string(), data.clone());
        Ok(true)
    }

    fn update(
        &self,
        data: &T,
    ) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        if !rows.contains_key(data.id()) {
            return Err(ReachflowError::Store(format!("{}: cannot find item by id '{}'", self.name, data.id())));
        }
        rows.insert(data.id().to_string(), data.clone());
        Ok(true)
    }

    fn delete(
        &self,
        id: &str,
    ) -> Result<bool> {
        Ok(self.rows.write().unwrap().remove(id).is_some())
    }
}
