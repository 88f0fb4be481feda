pub mod convert;
pub mod errors;
pub mod models;
pub mod services;
pub mod xirr;

use convert::{CurrencyConverter, IdentityConverter};
use errors::CoreError;
use services::analytics_service::AnalyticsService;

pub use convert::FixedRateConverter;
pub use models::config::{CategoryWeights, HealthCheckConfig, HealthThresholds};
pub use models::holding::HoldingInput;
pub use models::metrics::{DividendTrend, HealthMetrics};
pub use models::price::{PricePoint, PriceSeries};
pub use models::report::{
    HealthFlag, HealthStrength, HoldingHealthReport, PortfolioHealthSummary, Recommendation,
    Severity,
};
pub use models::transaction::{OpenLot, Transaction, TransactionType};
pub use xirr::CashFlow;

/// Main entry point for the portfolio health analytics core.
///
/// Holds the analysis configuration and the injected currency converter;
/// everything else (open lots, metrics, reports) is rebuilt from the
/// supplied transactions and price series on every call and never
/// persisted. The engine is fully synchronous — fetching transaction and
/// price history is the caller's concern and happens before anything here
/// runs.
#[must_use]
pub struct HealthAnalyzer {
    config: HealthCheckConfig,
    converter: Box<dyn CurrencyConverter>,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for HealthAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthAnalyzer")
            .field("benchmark", &self.config.benchmark_symbol)
            .field("analysis_period_years", &self.config.analysis_period_years)
            .finish()
    }
}

impl HealthAnalyzer {
    /// Analyzer with the given config and no currency conversion
    /// (transactions already in the base currency).
    pub fn new(config: HealthCheckConfig) -> Self {
        Self::with_converter(config, Box::new(IdentityConverter))
    }

    /// Analyzer with an injected currency converter. The converter must be
    /// side-effect-free and referentially stable within one analysis pass.
    pub fn with_converter(config: HealthCheckConfig, converter: Box<dyn CurrencyConverter>) -> Self {
        Self {
            config,
            converter,
            analytics_service: AnalyticsService::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Full health report for a single holding.
    ///
    /// `total_portfolio_value` (base currency) sizes the position weight
    /// for the sizing flags and penalties. A non-positive total computes a
    /// 0% weight, so the holding is flagged and penalized as a small
    /// position; to analyze without a sizing signal, set the
    /// `small_position_pct` threshold to 0.
    #[must_use]
    pub fn analyze_holding(
        &self,
        input: &HoldingInput,
        benchmark: &PriceSeries,
        total_portfolio_value: f64,
    ) -> HoldingHealthReport {
        self.analytics_service.analyze_holding(
            input,
            benchmark,
            total_portfolio_value,
            self.converter.as_ref(),
            &self.config,
        )
    }

    /// Analyze every holding against the benchmark and aggregate into a
    /// portfolio summary. Holdings below the configured minimum weight or
    /// on the exclusion list are skipped.
    #[must_use]
    pub fn analyze_portfolio(
        &self,
        holdings: &[HoldingInput],
        benchmark: &PriceSeries,
    ) -> PortfolioHealthSummary {
        self.analytics_service.analyze_portfolio(
            holdings,
            benchmark,
            self.converter.as_ref(),
            &self.config,
        )
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Serialize a holding report as pretty JSON.
    pub fn report_to_json(&self, report: &HoldingHealthReport) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Serialize a portfolio summary as pretty JSON.
    pub fn summary_to_json(&self, summary: &PortfolioHealthSummary) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(summary)?)
    }
}

impl Default for HealthAnalyzer {
    fn default() -> Self {
        Self::new(HealthCheckConfig::default())
    }
}
