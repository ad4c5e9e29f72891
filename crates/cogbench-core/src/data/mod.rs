//! Dataset views over recorded human-response data.

pub mod dataset;

pub use dataset::{Dataset, Demographics, Trial, DEMOGRAPHIC_COLUMNS, REQUIRED_COLUMNS};
