//! Aggregates module
pub mod comparison_list;
pub mod snapshot;
pub mod matrix;

pub use comparison_list::{ComparisonList, ListError, ListSnapshot};
pub use snapshot::ProductSnapshot;
pub use matrix::{ComparisonMatrix, MatrixRow};
