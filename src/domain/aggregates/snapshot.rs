//! Product Snapshot
//!
//! Normalized per-product view assembled for one comparison build. Never
//! persisted.

use rust_decimal::Decimal;
use serde::Serialize;
use crate::catalog::{DeclaredAttribute, ProductView};
use crate::domain::value_objects::{AttributeMap, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub price_html: String,
    pub url: String,
    pub add_to_cart_url: String,
    pub in_stock: bool,
    pub rating: f64,
    pub review_count: u32,
    pub short_description: String,
    pub attributes: AttributeMap,
}

impl ProductSnapshot {
    /// Declared attributes go in first, then the set custom fields; a custom
    /// field overwrites a declared attribute with the same label. Custom
    /// fields holding `""` or `"0"` count as unset.
    pub fn build(view: ProductView, custom_fields: Vec<(String, String)>) -> Self {
        let mut attributes = AttributeMap::new();
        for attr in &view.attributes {
            let (label, value) = match attr {
                DeclaredAttribute::Taxonomy { label, terms, .. } => (label.clone(), terms.join(", ")),
                DeclaredAttribute::Custom { name, options } => (name.clone(), options.join(", ")),
            };
            attributes.insert(label, value);
        }
        for (label, value) in custom_fields {
            if value.is_empty() || value == "0" { continue; }
            attributes.insert(label, value);
        }
        Self {
            id: view.id, name: view.name, image: view.image, price: view.price,
            price_html: view.price_html, url: view.permalink, add_to_cart_url: view.add_to_cart_url,
            in_stock: view.in_stock, rating: view.rating, review_count: view.review_count,
            short_description: view.short_description, attributes,
        }
    }

    pub fn has_positive_price(&self) -> bool { self.price > Decimal::ZERO }
}
