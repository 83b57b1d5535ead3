pub mod aggregation;
pub mod catalog;
pub mod review;
