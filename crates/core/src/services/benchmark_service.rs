use chrono::{Months, NaiveDate};

use crate::models::metrics::HealthMetrics;
use crate::models::price::PriceSeries;
use crate::models::transaction::OpenLot;

/// Re-expresses the open lots against a benchmark price series: per-horizon
/// alpha and the dollar opportunity cost of not having bought the benchmark
/// instead.
pub struct BenchmarkService;

impl BenchmarkService {
    pub fn new() -> Self {
        Self
    }

    /// Fill the benchmark-relative fields of `metrics` in place.
    ///
    /// With an empty benchmark series every field keeps its zero default —
    /// a missing benchmark never aborts the analysis.
    pub fn apply(
        &self,
        metrics: &mut HealthMetrics,
        lots: &[OpenLot],
        holding: &PriceSeries,
        benchmark: &PriceSeries,
    ) {
        let (Some(first_lot), Some(latest)) = (lots.first(), holding.latest()) else {
            return;
        };
        if benchmark.is_empty() {
            return;
        }
        let inception = first_lot.opened_on();
        let now = latest.date;

        metrics.benchmark_return_1y_pct = self.gated_return(benchmark, inception, now, Some(1));
        metrics.benchmark_return_3y_pct = self.gated_return(benchmark, inception, now, Some(3));
        metrics.benchmark_return_5y_pct = self.gated_return(benchmark, inception, now, Some(5));
        metrics.benchmark_return_inception_pct = self.gated_return(benchmark, inception, now, None);

        // Alpha compares price returns on both sides. The holding's total
        // returns carry a dividend-yield add-on with no benchmark
        // counterpart, so they would overstate alpha for payers.
        metrics.alpha_1y_pct =
            self.gated_return(holding, inception, now, Some(1)) - metrics.benchmark_return_1y_pct;
        metrics.alpha_3y_pct =
            self.gated_return(holding, inception, now, Some(3)) - metrics.benchmark_return_3y_pct;
        metrics.alpha_5y_pct =
            self.gated_return(holding, inception, now, Some(5)) - metrics.benchmark_return_5y_pct;
        metrics.alpha_inception_pct = self.gated_return(holding, inception, now, None)
            - metrics.benchmark_return_inception_pct;

        metrics.opportunity_cost =
            self.opportunity_cost(lots, benchmark, now, metrics.market_value);
    }

    /// Price return of one series over a gated window: a window starting
    /// before the first open lot yields 0. Applied to the holding and the
    /// benchmark alike so alpha subtracts like for like.
    fn gated_return(
        &self,
        series: &PriceSeries,
        inception: NaiveDate,
        now: NaiveDate,
        horizon_years: Option<u32>,
    ) -> f64 {
        let start = match horizon_years {
            Some(years) => match now.checked_sub_months(Months::new(12 * years)) {
                Some(d) => d,
                None => return 0.0,
            },
            None => inception,
        };
        if start < inception {
            return 0.0;
        }
        series.return_between(start, now)
    }

    /// Counterfactual: each lot's cost basis buys benchmark shares at the
    /// benchmark's close on the lot's date; the shortfall of the actual
    /// market value against that counterfactual value is the opportunity
    /// cost. Strictly nonnegative — outperformance is not costed.
    fn opportunity_cost(
        &self,
        lots: &[OpenLot],
        benchmark: &PriceSeries,
        now: NaiveDate,
        market_value: f64,
    ) -> f64 {
        let Some(current_benchmark) = benchmark.close_on_or_before(now) else {
            return 0.0;
        };

        let mut benchmark_shares = 0.0_f64;
        for lot in lots {
            let Some(entry_price) = benchmark.close_on_or_before(lot.opened_on()) else {
                continue;
            };
            if entry_price > 0.0 {
                benchmark_shares += lot.remaining_amount / entry_price;
            }
        }

        let counterfactual_value = benchmark_shares * current_benchmark;
        (counterfactual_value - market_value).max(0.0)
    }
}

impl Default for BenchmarkService {
    fn default() -> Self {
        Self::new()
    }
}
