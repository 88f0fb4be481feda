// ═══════════════════════════════════════════════════════════════════
// Analyzer Tests — full pipeline scenarios through the facade:
// winners, losers, portfolio aggregation, filtering and JSON export
// ═══════════════════════════════════════════════════════════════════

use chrono::{Months, NaiveDate};

use portfolio_health_core::models::config::HealthCheckConfig;
use portfolio_health_core::models::holding::HoldingInput;
use portfolio_health_core::models::price::PriceSeries;
use portfolio_health_core::models::report::PortfolioHealthSummary;
use portfolio_health_core::{
    DividendTrend, FixedRateConverter, HealthAnalyzer, HealthFlag, HealthStrength, PricePoint,
    Recommendation, Severity, Transaction,
};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monthly closes moving linearly from `first` to `last`.
fn monthly_series(start: NaiveDate, points: u32, first: f64, last: f64) -> PriceSeries {
    let step = (last - first) / (points - 1) as f64;
    PriceSeries::from_points(
        (0..points)
            .map(|i| PricePoint {
                date: start.checked_add_months(Months::new(i)).unwrap(),
                close: first + step * f64::from(i),
            })
            .collect(),
    )
}

/// Daily closes moving linearly from `first` to `last`.
fn daily_series(start: NaiveDate, points: u32, first: f64, last: f64) -> PriceSeries {
    let step = (last - first) / (points - 1) as f64;
    PriceSeries::from_points(
        (0..points)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i64::from(i)),
                close: first + step * f64::from(i),
            })
            .collect(),
    )
}

/// 10 shares bought at $100 in January 2021; the price doubles over
/// 4.5 years while the benchmark gains 20%.
fn winner() -> HoldingInput {
    let inception = make_date(2021, 1, 4);
    HoldingInput::new(
        "WIN",
        "Winner Corp.",
        vec![Transaction::buy(inception, 10.0, 100.0, "USD")],
        monthly_series(inception, 54, 100.0, 200.0),
    )
}

fn winner_benchmark() -> PriceSeries {
    monthly_series(make_date(2021, 1, 4), 54, 100.0, 120.0)
}

/// 10 shares bought at $100 in January 2022; the price bleeds to $60
/// over 3.4 years while the benchmark gains 50%.
fn loser() -> HoldingInput {
    let inception = make_date(2022, 1, 3);
    HoldingInput::new(
        "LOSE",
        "Loser Corp.",
        vec![Transaction::buy(inception, 10.0, 100.0, "USD")],
        daily_series(inception, 1246, 100.0, 60.0),
    )
}

fn loser_benchmark() -> PriceSeries {
    daily_series(make_date(2022, 1, 3), 1246, 100.0, 150.0)
}

// ═══════════════════════════════════════════════════════════════════
// Single-holding scenarios
// ═══════════════════════════════════════════════════════════════════

mod single_holding {
    use super::*;

    #[test]
    fn strong_outperformer_is_an_accumulate() {
        let analyzer = HealthAnalyzer::default();
        // 10% of a $20k portfolio: no sizing penalty
        let report = analyzer.analyze_holding(&winner(), &winner_benchmark(), 20_000.0);

        assert_eq!(report.score, 100);
        assert_eq!(report.recommendation, Recommendation::Accumulate);
        assert_eq!(report.severity, Severity::Healthy);
        assert!(report.flags.is_empty(), "unexpected flags: {:?}", report.flags);

        assert!(report.strengths.contains(&HealthStrength::StrongReturns));
        assert!(report.strengths.contains(&HealthStrength::BeatingBenchmark));
        assert!(report.strengths.contains(&HealthStrength::NeverUnderwater));
        assert!(report.strengths.contains(&HealthStrength::StrongRiskAdjusted));

        assert_eq!(report.metrics.days_underwater, 0);
        assert_eq!(report.metrics.opportunity_cost, 0.0);
        assert!(report.metrics.xirr_pct > 10.0);
        assert!(report.metrics.alpha_3y_pct > 5.0);
    }

    #[test]
    fn tiny_position_pays_the_sizing_penalty() {
        let analyzer = HealthAnalyzer::default();
        // 0.25% of an $800k portfolio
        let report = analyzer.analyze_holding(&winner(), &winner_benchmark(), 800_000.0);

        assert_eq!(report.score, 90);
        assert!(report.flags.contains(&HealthFlag::SmallPosition));
        assert_eq!(report.severity, Severity::Healthy);
    }

    #[test]
    fn zero_portfolio_total_counts_as_a_small_position() {
        let analyzer = HealthAnalyzer::default();
        // No sizing context: the weight computes as 0% and is penalized
        let report = analyzer.analyze_holding(&winner(), &winner_benchmark(), 0.0);

        assert_eq!(report.score, 90);
        assert!(report.flags.contains(&HealthFlag::SmallPosition));
    }

    #[test]
    fn small_position_signal_can_be_disabled_via_the_threshold() {
        let mut config = HealthCheckConfig::default();
        config.thresholds.small_position_pct = 0.0;
        let analyzer = HealthAnalyzer::new(config);

        let report = analyzer.analyze_holding(&winner(), &winner_benchmark(), 0.0);
        assert_eq!(report.score, 100);
        assert!(!report.flags.contains(&HealthFlag::SmallPosition));
    }

    #[test]
    fn persistent_underperformer_is_a_sell() {
        let analyzer = HealthAnalyzer::default();
        let report = analyzer.analyze_holding(&loser(), &loser_benchmark(), 6_000.0);

        assert_eq!(report.score, 0);
        assert_eq!(report.recommendation, Recommendation::Sell);
        assert_eq!(report.severity, Severity::Critical);

        assert!(report.flags.contains(&HealthFlag::NegativeReturn1Y));
        assert!(report.flags.contains(&HealthFlag::NegativeReturn3Y));
        assert!(report.flags.contains(&HealthFlag::ExtendedUnderwater));
        assert!(report.flags.contains(&HealthFlag::HighOpportunityCost));
        assert!(report.strengths.is_empty());

        // $1000 in the benchmark would be $1500; the holding is worth $600
        assert!((report.metrics.opportunity_cost - 900.0).abs() < 1e-6);
        assert!(report.metrics.days_underwater > 730);
        assert!(report.metrics.xirr_pct < -5.0);
    }

    #[test]
    fn growing_dividends_show_up_in_the_report() {
        let analyzer = HealthAnalyzer::default();
        let inception = make_date(2022, 1, 3);
        let input = HoldingInput::new(
            "DIV",
            "Dividend Corp.",
            vec![
                Transaction::buy(inception, 10.0, 100.0, "USD"),
                Transaction::dividend(make_date(2022, 6, 1), 30.0, "USD"),
                Transaction::dividend(make_date(2023, 6, 1), 40.0, "USD"),
                Transaction::dividend(make_date(2024, 6, 1), 50.0, "USD"),
            ],
            monthly_series(inception, 40, 100.0, 140.0),
        );

        let report = analyzer.analyze_holding(&input, &PriceSeries::new(), 14_000.0);
        assert_eq!(report.metrics.dividend_trend, DividendTrend::Growing);
        assert!(report.metrics.dividend_growth_pct > 3.0);
        assert!(report.strengths.contains(&HealthStrength::GrowingDividends));
    }

    #[test]
    fn empty_holding_degrades_instead_of_failing() {
        let analyzer = HealthAnalyzer::default();
        let input = HoldingInput::new("EMPTY", "Empty", vec![], PriceSeries::new());

        let report = analyzer.analyze_holding(&input, &PriceSeries::new(), 0.0);
        // Neutral sub-scores minus the small-position penalty
        assert_eq!(report.score, 58);
        assert_eq!(report.recommendation, Recommendation::Hold);
        assert_eq!(report.severity, Severity::Info);
        assert_eq!(report.flags, vec![HealthFlag::SmallPosition]);
        assert_eq!(report.metrics.market_value, 0.0);
    }

    #[test]
    fn transactions_are_converted_to_the_base_currency() {
        let converter = FixedRateConverter::new().with_rate("EUR", 2.0);
        let analyzer =
            HealthAnalyzer::with_converter(HealthCheckConfig::default(), Box::new(converter));

        let inception = make_date(2024, 1, 2);
        let input = HoldingInput::new(
            "EUR1",
            "European Corp.",
            vec![Transaction::buy(inception, 10.0, 100.0, "EUR")],
            daily_series(inception, 10, 100.0, 100.0),
        );

        let report = analyzer.analyze_holding(&input, &PriceSeries::new(), 10_000.0);
        assert_eq!(report.metrics.cost_basis, 2000.0);
        assert_eq!(report.metrics.market_value, 1000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio aggregation
// ═══════════════════════════════════════════════════════════════════

mod portfolio {
    use super::*;

    fn mixed_portfolio() -> (Vec<HoldingInput>, PriceSeries) {
        // One benchmark series covering both holdings' lifetimes
        let benchmark = loser_benchmark();
        (vec![winner(), loser()], benchmark)
    }

    #[test]
    fn summary_sorts_worst_first_and_counts_severities() {
        let analyzer = HealthAnalyzer::default();
        let (holdings, benchmark) = mixed_portfolio();

        let summary = analyzer.analyze_portfolio(&holdings, &benchmark);

        assert_eq!(summary.holdings.len(), 2);
        assert_eq!(summary.holdings[0].symbol, "LOSE");
        assert!(summary.holdings[0].score <= summary.holdings[1].score);
        assert_eq!(summary.worst_performers[0], "LOSE");

        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.healthy_count, 1);
        assert_eq!(summary.warning_count, 0);
        assert_eq!(summary.info_count, 0);

        // Weighted between the two holding scores
        let low = summary.holdings[0].score;
        let high = summary.holdings[1].score;
        assert!(summary.overall_score >= low && summary.overall_score <= high);
    }

    #[test]
    fn opportunity_costs_only_list_underperformers() {
        let analyzer = HealthAnalyzer::default();
        let (holdings, benchmark) = mixed_portfolio();

        let summary = analyzer.analyze_portfolio(&holdings, &benchmark);

        assert_eq!(summary.biggest_opportunity_costs, vec!["LOSE".to_string()]);
        assert!(summary.total_opportunity_cost > 0.0);
    }

    #[test]
    fn critical_holdings_surface_a_portfolio_recommendation() {
        let analyzer = HealthAnalyzer::default();
        let (holdings, benchmark) = mixed_portfolio();

        let summary = analyzer.analyze_portfolio(&holdings, &benchmark);
        assert!(summary
            .recommendations
            .iter()
            .any(|line| line.contains("critical")));
    }

    #[test]
    fn excluded_symbols_are_skipped_case_insensitively() {
        let mut config = HealthCheckConfig::default();
        config.thresholds.excluded_symbols = vec!["lose".to_string()];
        let analyzer = HealthAnalyzer::new(config);
        let (holdings, benchmark) = mixed_portfolio();

        let summary = analyzer.analyze_portfolio(&holdings, &benchmark);
        assert_eq!(summary.holdings.len(), 1);
        assert_eq!(summary.holdings[0].symbol, "WIN");
    }

    #[test]
    fn minimum_weight_filter_drops_small_holdings() {
        let mut config = HealthCheckConfig::default();
        // Winner is ~77% of the portfolio, loser ~23%
        config.thresholds.min_portfolio_weight_pct = 50.0;
        let analyzer = HealthAnalyzer::new(config);
        let (holdings, benchmark) = mixed_portfolio();

        let summary = analyzer.analyze_portfolio(&holdings, &benchmark);
        assert_eq!(summary.holdings.len(), 1);
        assert_eq!(summary.holdings[0].symbol, "WIN");
    }

    #[test]
    fn empty_portfolio_produces_an_empty_summary() {
        let analyzer = HealthAnalyzer::default();
        let summary = analyzer.analyze_portfolio(&[], &PriceSeries::new());

        assert_eq!(summary.overall_score, 0);
        assert!(summary.holdings.is_empty());
        assert!(summary.worst_performers.is_empty());
        assert_eq!(summary.total_opportunity_cost, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// JSON export
// ═══════════════════════════════════════════════════════════════════

mod export {
    use super::*;

    #[test]
    fn holding_report_serializes_to_json() {
        let analyzer = HealthAnalyzer::default();
        let report = analyzer.analyze_holding(&winner(), &winner_benchmark(), 20_000.0);

        let json = analyzer.report_to_json(&report).unwrap();
        assert!(json.contains("\"symbol\": \"WIN\""));
        assert!(json.contains("\"score\": 100"));
    }

    #[test]
    fn portfolio_summary_round_trips_through_json() {
        let analyzer = HealthAnalyzer::default();
        let summary = analyzer.analyze_portfolio(&[winner()], &winner_benchmark());

        let json = analyzer.summary_to_json(&summary).unwrap();
        let parsed: PortfolioHealthSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.holdings.len(), summary.holdings.len());
        assert_eq!(parsed.overall_score, summary.overall_score);
    }
}
