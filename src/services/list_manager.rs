//! Comparison List Manager
//!
//! Every operation reads the persisted list fresh (read-modify-write). Two
//! overlapping requests from the same visitor can therefore lose an update;
//! the last write wins. The list is advisory UI state, so this is accepted.

use tracing::debug;

use crate::config::CompareConfig;
use crate::domain::aggregates::{ComparisonList, ListSnapshot};
use crate::domain::value_objects::ProductId;
use crate::storage::ListStore;
use crate::Result;

pub struct ListManager<'a, S: ListStore> {
    store: S,
    config: &'a CompareConfig,
}

impl<'a, S: ListStore> ListManager<'a, S> {
    pub fn new(store: S, config: &'a CompareConfig) -> Self { Self { store, config } }

    pub fn into_store(self) -> S { self.store }

    /// Malformed or invariant-breaking data reads as an empty list.
    pub fn get(&self) -> ComparisonList {
        let max = self.config.max_products;
        self.store.load(&self.config.cookie_name)
            .and_then(|raw| decode(&raw, max))
            .unwrap_or_else(|| ComparisonList::new(max))
    }

    pub fn add(&mut self, id: ProductId) -> Result<ListSnapshot> {
        let mut list = self.get();
        let result = list.add(id);
        self.log_events(&mut list);
        if result? {
            self.persist(&list);
        }
        Ok(list.snapshot())
    }

    pub fn remove(&mut self, id: ProductId) -> ListSnapshot {
        let mut list = self.get();
        list.remove(id);
        self.log_events(&mut list);
        self.persist(&list);
        list.snapshot()
    }

    pub fn clear(&mut self) -> ListSnapshot {
        let mut list = self.get();
        list.clear();
        self.log_events(&mut list);
        self.persist(&list);
        list.snapshot()
    }

    fn persist(&mut self, list: &ComparisonList) {
        self.store.save(&self.config.cookie_name, encode(list.ids()), self.config.retention);
    }

    fn log_events(&self, list: &mut ComparisonList) {
        for event in list.take_events() {
            debug!(?event, "compare list event");
        }
    }
}

fn encode(ids: &[ProductId]) -> String {
    let raw: Vec<u64> = ids.iter().map(|id| id.get()).collect();
    serde_json::to_string(&raw).unwrap_or_else(|_| "[]".to_string())
}

fn decode(raw: &str, max: usize) -> Option<ComparisonList> {
    let ids: Vec<ProductId> = match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(e) => {
            debug!(error = %e, "discarding malformed compare list");
            return None;
        }
    };
    ComparisonList::restore(ids, max)
}
