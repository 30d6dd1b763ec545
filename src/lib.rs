//! Neogen Product Compare
//!
//! Side-by-side product comparison for the storefront.
//!
//! ## Features
//! - Bounded comparison list kept in the visitor's cookie
//! - Attribute matrix built from catalog attributes and custom fields
//! - Best-price highlighting
//! - JSON API for the compare bar and compare page

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod services;
pub mod storage;

use thiserror::Error;

pub use api::{router, AppState};
pub use catalog::{CatalogAccessor, CatalogError, DeclaredAttribute, InMemoryCatalog, PgCatalog, ProductView};
pub use config::{CompareConfig, ConfigError, CustomField};
pub use domain::aggregates::{ComparisonList, ComparisonMatrix, ListSnapshot, MatrixRow, ProductSnapshot};
pub use domain::value_objects::{AttributeMap, CellValue, ProductId};
pub use services::{ListManager, MatrixBuilder};
pub use storage::{CookieListStore, ListStore, MemoryListStore};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    #[error("Maximum {max} products can be compared")]
    CapacityExceeded { max: usize },

    #[error("Invalid product")]
    InvalidProduct,

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl From<domain::aggregates::ListError> for CompareError {
    fn from(e: domain::aggregates::ListError) -> Self {
        match e { domain::aggregates::ListError::CapacityExceeded { max } => Self::CapacityExceeded { max } }
    }
}

impl From<domain::value_objects::ProductIdError> for CompareError {
    fn from(_: domain::value_objects::ProductIdError) -> Self { Self::InvalidProduct }
}

pub type Result<T> = std::result::Result<T, CompareError>;
