//! In-memory catalog

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{CatalogAccessor, CatalogError, ProductView};
use crate::domain::value_objects::ProductId;

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, ProductView>,
    meta: HashMap<(ProductId, String), String>,
    unavailable: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self { Self::default() }

    pub fn with_product(mut self, view: ProductView) -> Self {
        self.products.insert(view.id, view);
        self
    }

    pub fn with_custom_field(mut self, id: ProductId, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert((id, key.into()), value.into());
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) { self.unavailable.store(unavailable, Ordering::SeqCst); }

    fn check(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("catalog offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogAccessor for InMemoryCatalog {
    async fn resolve_product(&self, id: ProductId) -> Result<Option<ProductView>, CatalogError> {
        self.check()?;
        Ok(self.products.get(&id).cloned())
    }

    async fn custom_field(&self, id: ProductId, key: &str) -> Result<Option<String>, CatalogError> {
        self.check()?;
        Ok(self.meta.get(&(id, key.to_string())).cloned())
    }
}
