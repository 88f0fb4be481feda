pub mod analytics_service;
pub mod benchmark_service;
pub mod dividend_service;
pub mod lot_service;
pub mod metrics_service;
pub mod recommendation_service;
pub mod scoring_service;
