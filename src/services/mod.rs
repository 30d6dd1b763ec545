//! Comparison services
pub mod list_manager;
pub mod matrix_builder;

pub use list_manager::ListManager;
pub use matrix_builder::MatrixBuilder;
