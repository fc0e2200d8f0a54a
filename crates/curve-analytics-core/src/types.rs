use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::CurveResult;

/// All quoted and derived prices. Wraps Decimal to prevent accidental f64 usage.
pub type Price = Decimal;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A delivery month on the forward curve, ordered by (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractMonth {
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
}

impl ContractMonth {
    pub fn new(year: i32, month: u32) -> CurveResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CurveError::DateError(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(ContractMonth { year, month })
    }

    /// The month containing today, per the local clock.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        ContractMonth {
            year: today.year(),
            month: today.month(),
        }
    }

    /// The month `offset` calendar months after this one.
    pub fn plus_months(&self, offset: u32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + offset as i32;
        ContractMonth {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Two-digit year, e.g. 2026 -> 26.
    pub fn short_year(&self) -> i32 {
        self.year.rem_euclid(100)
    }

    /// Feed key in "YY/MM" form, e.g. "26/01".
    pub fn feed_key(&self) -> String {
        format!("{:02}/{:02}", self.short_year(), self.month)
    }

    /// Display label in "YY-MON" form, e.g. "26-JAN".
    pub fn short_label(&self) -> String {
        format!("{:02}-{}", self.short_year(), month_name(self.month))
    }
}

/// Three-letter upper-case month name; empty string for an out-of-range month.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Where a cell's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Loaded from a feed or entered by hand.
    Observed,
    /// Copied from the preceding month by the gap filler.
    PropagatedForward,
    /// Copied from the following month by the gap filler.
    PropagatedBackward,
    /// Produced by the cascade recompute.
    Computed,
    /// No value; reads as zero.
    Missing,
}

/// One cell of the curve grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Stored rounded to `precision` decimal places; None reads as zero.
    pub value: Option<Price>,
    /// Decimal places the value is held at (0 or 2 depending on field).
    pub precision: u32,
    pub editable: bool,
    pub provenance: Provenance,
}

impl Cell {
    pub fn empty(precision: u32, editable: bool) -> Self {
        Cell {
            value: None,
            precision,
            editable,
            provenance: Provenance::Missing,
        }
    }
}

/// Row-major string table in fixed header order, for display and file export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_months_within_year() {
        let m = ContractMonth::new(2026, 3).unwrap();
        assert_eq!(m.plus_months(2), ContractMonth::new(2026, 5).unwrap());
    }

    #[test]
    fn test_plus_months_across_year_end() {
        let m = ContractMonth::new(2026, 11).unwrap();
        assert_eq!(m.plus_months(3), ContractMonth::new(2027, 2).unwrap());
        assert_eq!(m.plus_months(14), ContractMonth::new(2028, 1).unwrap());
    }

    #[test]
    fn test_labels() {
        let m = ContractMonth::new(2026, 1).unwrap();
        assert_eq!(m.feed_key(), "26/01");
        assert_eq!(m.short_label(), "26-JAN");
    }

    #[test]
    fn test_ordering_by_year_then_month() {
        let a = ContractMonth::new(2026, 9).unwrap();
        let b = ContractMonth::new(2027, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(ContractMonth::new(2026, 0).is_err());
        assert!(ContractMonth::new(2026, 13).is_err());
    }
}
