//! Postgres-backed catalog

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CatalogAccessor, CatalogError, DeclaredAttribute, ProductView};
use crate::domain::value_objects::ProductId;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64, name: String, image_url: Option<String>, price: Option<Decimal>, price_html: String,
    permalink: String, add_to_cart_url: String, in_stock: bool, average_rating: f64,
    review_count: i32, short_description: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AttributeRow { name: String, label: Option<String>, is_taxonomy: bool, terms: Vec<String> }

#[derive(Clone)]
pub struct PgCatalog { db: PgPool }

impl PgCatalog {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

/// Connection-level failures mean the whole catalog is out.
fn map_err(e: sqlx::Error) -> CatalogError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => CatalogError::Unavailable(e.to_string()),
        other => CatalogError::Lookup(other.to_string()),
    }
}

fn db_id(id: ProductId) -> Option<i64> { i64::try_from(id.get()).ok() }

#[async_trait]
impl CatalogAccessor for PgCatalog {
    async fn resolve_product(&self, id: ProductId) -> Result<Option<ProductView>, CatalogError> {
        let Some(key) = db_id(id) else { return Ok(None) };
        let row = sqlx::query_as::<_, ProductRow>("SELECT id, name, image_url, price, price_html, permalink, add_to_cart_url, in_stock, average_rating, review_count, short_description FROM products WHERE id = $1 AND status = 'publish'")
            .bind(key).fetch_optional(&self.db).await.map_err(map_err)?;
        let Some(row) = row else { return Ok(None) };

        let attributes = sqlx::query_as::<_, AttributeRow>("SELECT name, label, is_taxonomy, terms FROM product_attributes WHERE product_id = $1 ORDER BY position")
            .bind(row.id).fetch_all(&self.db).await.map_err(map_err)?
            .into_iter()
            .map(|a| if a.is_taxonomy {
                let label = a.label.unwrap_or_else(|| a.name.clone());
                DeclaredAttribute::Taxonomy { taxonomy: a.name, label, terms: a.terms }
            } else {
                DeclaredAttribute::Custom { name: a.name, options: a.terms }
            })
            .collect();

        Ok(Some(ProductView {
            id, name: row.name, image: row.image_url, price: row.price.unwrap_or(Decimal::ZERO),
            price_html: row.price_html, permalink: row.permalink, add_to_cart_url: row.add_to_cart_url,
            in_stock: row.in_stock, rating: row.average_rating, review_count: u32::try_from(row.review_count).unwrap_or(0),
            short_description: row.short_description, attributes,
        }))
    }

    async fn custom_field(&self, id: ProductId, key: &str) -> Result<Option<String>, CatalogError> {
        let Some(product_id) = db_id(id) else { return Ok(None) };
        let value: Option<(String,)> = sqlx::query_as("SELECT meta_value FROM product_meta WHERE product_id = $1 AND meta_key = $2 LIMIT 1")
            .bind(product_id).bind(key).fetch_optional(&self.db).await.map_err(map_err)?;
        Ok(value.map(|v| v.0))
    }
}
