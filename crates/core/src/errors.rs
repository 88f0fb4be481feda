use thiserror::Error;

/// Unified error type for the portfolio-health-core library.
///
/// The analytics core itself never surfaces errors: missing data and
/// numerical degeneracies are absorbed into neutral default metrics so a
/// single bad holding cannot abort a portfolio-wide analysis. `CoreError`
/// covers the fallible edges around the core — the XIRR solver and the
/// JSON export helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("XIRR solver did not converge after {iterations} iterations")]
    XirrNonConvergent { iterations: u32 },

    #[error("XIRR requires at least one negative and one positive cash flow")]
    XirrDegenerateCashFlows,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
