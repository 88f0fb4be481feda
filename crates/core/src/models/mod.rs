pub mod config;
pub mod holding;
pub mod metrics;
pub mod price;
pub mod report;
pub mod transaction;
