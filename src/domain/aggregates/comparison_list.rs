//! Comparison List Aggregate

use serde::Serialize;
use crate::domain::value_objects::ProductId;
use crate::domain::events::CompareEvent;

/// Bounded, insertion-ordered set of products a visitor is comparing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonList {
    ids: Vec<ProductId>,
    max: usize,
    events: Vec<CompareEvent>,
}

/// Read-only view returned by list mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListSnapshot {
    pub ids: Vec<ProductId>,
    pub count: usize,
}

impl ComparisonList {
    pub fn new(max: usize) -> Self { Self { ids: vec![], max, events: vec![] } }

    /// Rebuild from persisted ids; `None` when they break the list invariants.
    pub fn restore(ids: Vec<ProductId>, max: usize) -> Option<Self> {
        if ids.len() > max { return None; }
        let mut seen = Vec::with_capacity(ids.len());
        for id in &ids {
            if seen.contains(id) { return None; }
            seen.push(*id);
        }
        Some(Self { ids, max, events: vec![] })
    }

    pub fn ids(&self) -> &[ProductId] { &self.ids }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn is_full(&self) -> bool { self.ids.len() >= self.max }
    pub fn max(&self) -> usize { self.max }
    pub fn contains(&self, id: ProductId) -> bool { self.ids.contains(&id) }

    /// Returns `Ok(true)` if the list changed.
    pub fn add(&mut self, id: ProductId) -> Result<bool, ListError> {
        if self.contains(id) { return Ok(false); }
        if self.is_full() {
            self.raise_event(CompareEvent::CapacityRejected { product_id: id, max: self.max });
            return Err(ListError::CapacityExceeded { max: self.max });
        }
        self.ids.push(id);
        self.raise_event(CompareEvent::ProductAdded { product_id: id, count: self.ids.len() });
        Ok(true)
    }

    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| *i != id);
        let removed = self.ids.len() != before;
        if removed {
            self.raise_event(CompareEvent::ProductRemoved { product_id: id, count: self.ids.len() });
        }
        removed
    }

    pub fn clear(&mut self) {
        let removed = self.ids.len();
        self.ids.clear();
        self.raise_event(CompareEvent::Cleared { removed });
    }

    pub fn snapshot(&self) -> ListSnapshot { ListSnapshot { ids: self.ids.clone(), count: self.ids.len() } }

    pub fn take_events(&mut self) -> Vec<CompareEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: CompareEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ListError { CapacityExceeded { max: usize } }
impl std::error::Error for ListError {}
impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::CapacityExceeded { max } => write!(f, "Maximum {} products can be compared", max) }
    }
}
