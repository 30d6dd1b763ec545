//! Comparison Matrix Builder

use futures::future::join_all;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{error, warn};

use crate::catalog::{CatalogAccessor, CatalogError};
use crate::config::CompareConfig;
use crate::domain::aggregates::{ComparisonMatrix, ProductSnapshot};
use crate::domain::value_objects::ProductId;
use crate::{CompareError, Result};

#[derive(Clone)]
pub struct MatrixBuilder {
    catalog: Arc<dyn CatalogAccessor>,
    config: Arc<CompareConfig>,
}

enum Lookup {
    Found(ProductSnapshot),
    Skipped,
}

impl MatrixBuilder {
    pub fn new(catalog: Arc<dyn CatalogAccessor>, config: Arc<CompareConfig>) -> Self { Self { catalog, config } }

    /// Resolves products concurrently; the matrix keeps input order. Missing,
    /// failing and timed-out products are skipped. Fails only when the
    /// catalog itself is unavailable.
    pub async fn build(&self, ids: &[ProductId]) -> Result<ComparisonMatrix> {
        let mut unique: Vec<ProductId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) { unique.push(*id); }
        }

        let lookups = join_all(unique.iter().map(|id| self.lookup(*id))).await;

        let mut snapshots = Vec::with_capacity(lookups.len());
        for lookup in lookups {
            match lookup? {
                Lookup::Found(snapshot) => snapshots.push(snapshot),
                Lookup::Skipped => {}
            }
        }
        Ok(ComparisonMatrix::from_snapshots(snapshots))
    }

    async fn lookup(&self, id: ProductId) -> Result<Lookup> {
        match timeout(self.config.lookup_timeout, self.snapshot(id)).await {
            Ok(Ok(Some(snapshot))) => Ok(Lookup::Found(snapshot)),
            Ok(Ok(None)) => Ok(Lookup::Skipped),
            Ok(Err(CatalogError::Unavailable(reason))) => {
                error!(product_id = %id, %reason, "catalog unavailable");
                Err(CompareError::CatalogUnavailable(reason))
            }
            Ok(Err(e @ CatalogError::Lookup(_))) => {
                warn!(product_id = %id, error = %e, "skipping product");
                Ok(Lookup::Skipped)
            }
            Err(_) => {
                warn!(product_id = %id, timeout_ms = self.config.lookup_timeout.as_millis() as u64, "product lookup timed out");
                Ok(Lookup::Skipped)
            }
        }
    }

    async fn snapshot(&self, id: ProductId) -> std::result::Result<Option<ProductSnapshot>, CatalogError> {
        let Some(view) = self.catalog.resolve_product(id).await? else { return Ok(None) };

        let mut custom = Vec::with_capacity(self.config.custom_fields.len());
        for field in &self.config.custom_fields {
            match self.catalog.custom_field(id, &field.key).await {
                Ok(Some(value)) => custom.push((field.label.clone(), value)),
                Ok(None) => {}
                Err(CatalogError::Lookup(reason)) => warn!(product_id = %id, field = %field.key, %reason, "custom field lookup failed"),
                Err(e) => return Err(e),
            }
        }
        Ok(Some(ProductSnapshot::build(view, custom)))
    }
}
