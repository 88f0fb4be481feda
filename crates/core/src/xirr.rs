//! Annualized internal rate of return over irregular dated cash flows.
//!
//! Newton-Raphson on the NPV with a bisection fallback when the derivative
//! misbehaves. Callers treat non-convergence as a soft failure: the facade
//! logs it and defaults the XIRR metric to 0.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A dated cash flow. Outflows (buys) are negative, inflows (sells,
/// dividends, the synthetic terminal market value) are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub amount: f64,
    pub when: NaiveDate,
}

const MAX_ITERATIONS: u32 = 100;
const TOLERANCE: f64 = 1e-7;
const DAYS_PER_YEAR: f64 = 365.0;

/// Solve for the annualized rate `r` such that
/// `Σ amount_i / (1 + r)^(years_i) = 0`, with `years_i` measured from the
/// earliest flow.
///
/// Returns the rate as a fraction (0.08 = 8% per year).
pub fn xirr(flows: &[CashFlow]) -> Result<f64, CoreError> {
    let has_negative = flows.iter().any(|f| f.amount < 0.0);
    let has_positive = flows.iter().any(|f| f.amount > 0.0);
    if !has_negative || !has_positive {
        return Err(CoreError::XirrDegenerateCashFlows);
    }

    let t0 = flows.iter().map(|f| f.when).min().unwrap_or_default();
    let years: Vec<f64> = flows
        .iter()
        .map(|f| (f.when - t0).num_days() as f64 / DAYS_PER_YEAR)
        .collect();

    // Newton-Raphson from a conventional 10% starting guess
    let mut rate = 0.1_f64;
    for _ in 0..MAX_ITERATIONS {
        let (npv, derivative) = npv_and_derivative(flows, &years, rate);
        if derivative.abs() < f64::EPSILON {
            break;
        }
        let next = rate - npv / derivative;
        // Rates at or below -100% are outside the domain of (1+r)^t
        if !next.is_finite() || next <= -1.0 {
            break;
        }
        if (next - rate).abs() < TOLERANCE {
            return Ok(next);
        }
        rate = next;
    }

    bisect(flows, &years)
}

fn npv_and_derivative(flows: &[CashFlow], years: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut derivative = 0.0;
    for (flow, &t) in flows.iter().zip(years) {
        let discount = (1.0 + rate).powf(t);
        npv += flow.amount / discount;
        derivative -= t * flow.amount / ((1.0 + rate).powf(t + 1.0));
    }
    (npv, derivative)
}

fn npv(flows: &[CashFlow], years: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .zip(years)
        .map(|(flow, &t)| flow.amount / (1.0 + rate).powf(t))
        .sum()
}

/// Fallback: bisect on [-99.99%, +1000%] if a sign change exists there.
fn bisect(flows: &[CashFlow], years: &[f64]) -> Result<f64, CoreError> {
    let mut lo = -0.9999_f64;
    let mut hi = 10.0_f64;
    let mut npv_lo = npv(flows, years, lo);
    let npv_hi = npv(flows, years, hi);

    if npv_lo.signum() == npv_hi.signum() {
        return Err(CoreError::XirrNonConvergent {
            iterations: MAX_ITERATIONS,
        });
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let npv_mid = npv(flows, years, mid);
        if npv_mid.abs() < TOLERANCE || (hi - lo) / 2.0 < TOLERANCE {
            return Ok(mid);
        }
        if npv_mid.signum() == npv_lo.signum() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    Err(CoreError::XirrNonConvergent {
        iterations: MAX_ITERATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_flow_pair_one_year() {
        // $1000 in, $1100 out exactly one year later → 10%
        let flows = vec![
            CashFlow { amount: -1000.0, when: make_date(2023, 1, 1) },
            CashFlow { amount: 1100.0, when: make_date(2024, 1, 1) },
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - 0.1).abs() < 1e-3, "got {rate}");
    }

    #[test]
    fn negative_rate() {
        let flows = vec![
            CashFlow { amount: -1000.0, when: make_date(2023, 1, 1) },
            CashFlow { amount: 900.0, when: make_date(2024, 1, 1) },
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate + 0.1).abs() < 1e-3, "got {rate}");
    }

    #[test]
    fn multiple_irregular_flows() {
        let flows = vec![
            CashFlow { amount: -5000.0, when: make_date(2022, 1, 15) },
            CashFlow { amount: -2500.0, when: make_date(2022, 9, 1) },
            CashFlow { amount: 500.0, when: make_date(2023, 3, 10) },
            CashFlow { amount: 8500.0, when: make_date(2024, 1, 15) },
        ];
        let rate = xirr(&flows).unwrap();
        // NPV at the solved rate should be ~0
        let t0 = make_date(2022, 1, 15);
        let residual: f64 = flows
            .iter()
            .map(|f| {
                let t = (f.when - t0).num_days() as f64 / 365.0;
                f.amount / (1.0 + rate).powf(t)
            })
            .sum();
        assert!(residual.abs() < 0.01, "residual {residual}");
    }

    #[test]
    fn all_outflows_is_degenerate() {
        let flows = vec![
            CashFlow { amount: -1000.0, when: make_date(2023, 1, 1) },
            CashFlow { amount: -500.0, when: make_date(2023, 6, 1) },
        ];
        assert!(matches!(
            xirr(&flows),
            Err(CoreError::XirrDegenerateCashFlows)
        ));
    }

    #[test]
    fn empty_flows_is_degenerate() {
        assert!(xirr(&[]).is_err());
    }
}
