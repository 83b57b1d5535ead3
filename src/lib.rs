pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pagination;

#[cfg(feature = "ssr")]
pub mod api;

pub use db::Database;
pub use errors::{ConfigError, ReviewError};
pub use models::aggregation::{aggregate, ReviewAggregation, SupplierReviewAggregation};
