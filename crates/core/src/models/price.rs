use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily closing price (date → close).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A date-ascending daily price series for one symbol (holding or benchmark).
///
/// No gap-filling is assumed: weekends and holidays simply have no point,
/// and lookups fall back to the latest available close on or before the
/// requested date. All lookups use binary search (O(log n)).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from points in any order; sorts by date ascending.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The latest close on or before `date`.
    ///
    /// Falls back to the series' first point when `date` precedes the whole
    /// series, so the only `None` case is an empty series.
    pub fn close_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let idx = match self.points.binary_search_by_key(&date, |p| p.date) {
            Ok(idx) => idx,
            // Insertion point: everything before it is < date
            Err(0) => 0,
            Err(idx) => idx - 1,
        };
        Some(self.points[idx].close)
    }

    /// Percentage return between the closes on-or-before `from` and `to`.
    /// Returns 0 when either endpoint is unavailable or the starting close
    /// is zero.
    pub fn return_between(&self, from: NaiveDate, to: NaiveDate) -> f64 {
        let (start, end) = match (self.close_on_or_before(from), self.close_on_or_before(to)) {
            (Some(s), Some(e)) => (s, e),
            _ => return 0.0,
        };
        if start == 0.0 {
            return 0.0;
        }
        (end - start) / start * 100.0
    }

    /// Daily close-to-close percentage changes across the whole series.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter(|w| w[0].close != 0.0)
            .map(|w| (w[1].close - w[0].close) / w[0].close * 100.0)
            .collect()
    }
}
