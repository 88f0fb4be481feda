use crate::convert::CurrencyConverter;
use crate::models::config::HealthCheckConfig;
use crate::models::holding::HoldingInput;
use crate::models::price::PriceSeries;
use crate::models::report::{
    HealthFlag, HoldingHealthReport, PortfolioHealthSummary, Severity,
};
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::benchmark_service::BenchmarkService;
use crate::services::dividend_service::DividendService;
use crate::services::lot_service::LotService;
use crate::services::metrics_service::MetricsService;
use crate::services::recommendation_service::RecommendationService;
use crate::services::scoring_service::ScoringService;
use crate::xirr::{self, CashFlow};

/// Portfolio-level narrative threshold: total opportunity cost above this
/// triggers a rotation recommendation.
const OPPORTUNITY_COST_ALERT: f64 = 5000.0;

/// More than this many extended-underwater holdings triggers a review
/// recommendation.
const UNDERWATER_HOLDINGS_ALERT: usize = 3;

/// How many worst performers / biggest opportunity costs to surface.
const TOP_LIST_LEN: usize = 5;

/// Runs the full per-holding pipeline (lots → metrics → benchmark → score
/// → flags → report) and rolls the reports up into a portfolio summary.
///
/// Synchronous, deterministic, no shared mutable state: per-holding
/// analyses are independent and everything is rebuilt from the inputs on
/// every call.
pub struct AnalyticsService {
    lot_service: LotService,
    metrics_service: MetricsService,
    dividend_service: DividendService,
    benchmark_service: BenchmarkService,
    scoring_service: ScoringService,
    recommendation_service: RecommendationService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            lot_service: LotService::new(),
            metrics_service: MetricsService::new(),
            dividend_service: DividendService::new(),
            benchmark_service: BenchmarkService::new(),
            scoring_service: ScoringService::new(),
            recommendation_service: RecommendationService::new(),
        }
    }

    /// Analyze one holding. `total_portfolio_value` (base currency) sizes
    /// the position weight; a non-positive total computes a 0% weight,
    /// which trips the small-position flag and penalty unless the
    /// `small_position_pct` threshold is 0.
    pub fn analyze_holding(
        &self,
        input: &HoldingInput,
        benchmark: &PriceSeries,
        total_portfolio_value: f64,
        converter: &dyn CurrencyConverter,
        config: &HealthCheckConfig,
    ) -> HoldingHealthReport {
        let lots = self.lot_service.open_lots(&input.transactions, converter);

        let current_price = input.prices.latest().map(|p| p.close).unwrap_or(0.0);
        let as_of = input
            .prices
            .latest()
            .map(|p| p.date)
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        let dividends = self
            .dividend_service
            .analyze(&input.transactions, current_price, as_of);

        let market_value = LotService::total_shares(&lots) * current_price;
        let xirr_pct = self.holding_xirr(&input.transactions, market_value, as_of, converter);

        let mut metrics = self
            .metrics_service
            .compute(&lots, &input.prices, &dividends, xirr_pct);
        self.benchmark_service
            .apply(&mut metrics, &lots, &input.prices, benchmark);

        metrics.portfolio_weight_pct = if total_portfolio_value > 0.0 {
            market_value / total_portfolio_value * 100.0
        } else {
            0.0
        };

        let score = self.scoring_service.health_score(&metrics, config);
        let flags = self.recommendation_service.flags(&metrics, config);
        let strengths = self.recommendation_service.strengths(&metrics, config);
        let recommendation = self
            .recommendation_service
            .recommend(score, &flags, &metrics);
        let narrative = self
            .recommendation_service
            .narrative(&flags, &strengths, &metrics);

        HoldingHealthReport {
            symbol: input.symbol.clone(),
            name: input.name.clone(),
            score,
            recommendation,
            severity: Severity::from_score(score),
            flags,
            strengths,
            metrics,
            narrative,
        }
    }

    /// Analyze every holding and aggregate: weighted overall score,
    /// severity counts, worst performers, biggest opportunity costs and
    /// portfolio-level recommendations.
    pub fn analyze_portfolio(
        &self,
        holdings: &[HoldingInput],
        benchmark: &PriceSeries,
        converter: &dyn CurrencyConverter,
        config: &HealthCheckConfig,
    ) -> PortfolioHealthSummary {
        // First pass: market values, for weights and the minimum-weight
        // filter. Total value spans ALL holdings so weights stay honest
        // even when small positions are filtered from the report.
        let values: Vec<f64> = holdings
            .iter()
            .map(|h| self.market_value(h, converter))
            .collect();
        let total_value: f64 = values.iter().sum();

        let mut reports: Vec<HoldingHealthReport> = holdings
            .iter()
            .zip(&values)
            .filter(|(h, &value)| {
                if config
                    .thresholds
                    .excluded_symbols
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(&h.symbol))
                {
                    return false;
                }
                let weight_pct = if total_value > 0.0 {
                    value / total_value * 100.0
                } else {
                    0.0
                };
                weight_pct >= config.thresholds.min_portfolio_weight_pct
            })
            .map(|(h, _)| self.analyze_holding(h, benchmark, total_value, converter, config))
            .collect();

        reports.sort_by(|a, b| a.score.cmp(&b.score));

        let weight_sum: f64 = reports.iter().map(|r| r.metrics.portfolio_weight_pct).sum();
        let overall_score = if weight_sum > 0.0 {
            (reports
                .iter()
                .map(|r| r.score as f64 * r.metrics.portfolio_weight_pct)
                .sum::<f64>()
                / weight_sum)
                .round()
                .clamp(0.0, 100.0) as u8
        } else {
            0
        };

        let critical_count = Self::count_severity(&reports, Severity::Critical);
        let warning_count = Self::count_severity(&reports, Severity::Warning);
        let info_count = Self::count_severity(&reports, Severity::Info);
        let healthy_count = Self::count_severity(&reports, Severity::Healthy);

        // Reports are already sorted ascending by score
        let worst_performers: Vec<String> = reports
            .iter()
            .take(TOP_LIST_LEN)
            .map(|r| r.symbol.clone())
            .collect();

        let mut by_cost: Vec<&HoldingHealthReport> = reports
            .iter()
            .filter(|r| r.metrics.opportunity_cost > 0.0)
            .collect();
        by_cost.sort_by(|a, b| {
            b.metrics
                .opportunity_cost
                .partial_cmp(&a.metrics.opportunity_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let biggest_opportunity_costs: Vec<String> = by_cost
            .iter()
            .take(TOP_LIST_LEN)
            .map(|r| r.symbol.clone())
            .collect();

        let total_opportunity_cost: f64 =
            reports.iter().map(|r| r.metrics.opportunity_cost).sum();

        let recommendations = self.portfolio_recommendations(
            critical_count,
            total_opportunity_cost,
            &reports,
        );

        PortfolioHealthSummary {
            overall_score,
            critical_count,
            warning_count,
            info_count,
            healthy_count,
            worst_performers,
            biggest_opportunity_costs,
            total_opportunity_cost,
            recommendations,
            holdings: reports,
        }
    }

    /// Current market value of one holding: open-lot shares at the latest
    /// close, 0 without lots or prices.
    fn market_value(&self, input: &HoldingInput, converter: &dyn CurrencyConverter) -> f64 {
        let lots = self.lot_service.open_lots(&input.transactions, converter);
        let current_price = input.prices.latest().map(|p| p.close).unwrap_or(0.0);
        LotService::total_shares(&lots) * current_price
    }

    /// XIRR over the holding's dated cash flows (buys and costs negative,
    /// proceeds positive) closed with a synthetic inflow of the current
    /// market value. Non-convergence is logged and absorbed to 0 so a
    /// single stubborn holding never aborts the portfolio pass.
    fn holding_xirr(
        &self,
        transactions: &[Transaction],
        market_value: f64,
        as_of: chrono::NaiveDate,
        converter: &dyn CurrencyConverter,
    ) -> f64 {
        let mut flows: Vec<CashFlow> = Vec::new();
        for tx in transactions {
            let amount = converter.convert(&tx.currency, tx.amount, tx.date);
            let signed = match tx.transaction_type {
                TransactionType::Buy | TransactionType::Reinvest => -amount,
                TransactionType::Sell
                | TransactionType::Dividend
                | TransactionType::Distribution => amount,
                TransactionType::Tax | TransactionType::Fee => -amount,
                TransactionType::Split | TransactionType::Transfer => continue,
            };
            flows.push(CashFlow {
                amount: signed,
                when: tx.date,
            });
        }
        if market_value > 0.0 {
            flows.push(CashFlow {
                amount: market_value,
                when: as_of,
            });
        }

        match xirr::xirr(&flows) {
            Ok(rate) => rate * 100.0,
            Err(e) => {
                log::warn!("XIRR defaulted to 0: {e}");
                0.0
            }
        }
    }

    fn count_severity(reports: &[HoldingHealthReport], severity: Severity) -> usize {
        reports.iter().filter(|r| r.severity == severity).count()
    }

    fn portfolio_recommendations(
        &self,
        critical_count: usize,
        total_opportunity_cost: f64,
        reports: &[HoldingHealthReport],
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if critical_count > 0 {
            recommendations.push(format!(
                "{critical_count} holding(s) scored in the critical range — review them first"
            ));
        }
        if total_opportunity_cost > OPPORTUNITY_COST_ALERT {
            recommendations.push(format!(
                "underperformers cost ${total_opportunity_cost:.0} vs. the benchmark — consider rotating into the index"
            ));
        }
        let underwater_holdings = reports
            .iter()
            .filter(|r| r.flags.contains(&HealthFlag::ExtendedUnderwater))
            .count();
        if underwater_holdings > UNDERWATER_HOLDINGS_ALERT {
            recommendations.push(format!(
                "{underwater_holdings} holdings have been underwater for over a year — check whether the theses still hold"
            ));
        }

        recommendations
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
