//! Domain events
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompareEvent {
    ProductAdded { product_id: ProductId, count: usize },
    ProductRemoved { product_id: ProductId, count: usize },
    Cleared { removed: usize },
    CapacityRejected { product_id: ProductId, max: usize },
}
