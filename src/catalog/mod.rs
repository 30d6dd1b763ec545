//! Catalog accessor
//!
//! The product catalog is an external collaborator. The comparison engine only
//! needs a read-only product view and single custom-field lookups, expressed by
//! [`CatalogAccessor`]. Backends:
//! - [`InMemoryCatalog`] seeded at startup (tests, demo mode)
//! - [`PgCatalog`] over the storefront's Postgres tables

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::ProductId;

pub use memory::InMemoryCatalog;
pub use postgres::PgCatalog;

/// Product data as the catalog exposes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    /// Zero when the product has no price set
    pub price: Decimal,
    pub price_html: String,
    pub permalink: String,
    pub add_to_cart_url: String,
    pub in_stock: bool,
    pub rating: f64,
    pub review_count: u32,
    pub short_description: String,
    pub attributes: Vec<DeclaredAttribute>,
}

#[cfg(test)]
impl ProductView {
    /// In-stock product with the given name and price and no attributes.
    pub(crate) fn named(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id, name: name.into(), image: None, price,
            price_html: price.to_string(),
            permalink: format!("/product/{}", id),
            add_to_cart_url: format!("/?add-to-cart={}", id),
            in_stock: true, rating: 0.0, review_count: 0,
            short_description: String::new(), attributes: vec![],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeclaredAttribute {
    /// Backed by a shared taxonomy (e.g. `pa_color`); `terms` are the term
    /// names assigned to the product.
    Taxonomy { taxonomy: String, label: String, terms: Vec<String> },
    /// Defined on the product itself.
    Custom { name: String, options: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog cannot be reached at all.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// A single lookup failed.
    #[error("Catalog lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait CatalogAccessor: Send + Sync {
    /// `Ok(None)` when the product does not exist or is not published.
    async fn resolve_product(&self, id: ProductId) -> Result<Option<ProductView>, CatalogError>;

    /// `Ok(None)` when the field is unset.
    async fn custom_field(&self, id: ProductId, key: &str) -> Result<Option<String>, CatalogError>;
}
