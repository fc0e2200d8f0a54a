use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{SelectionConfig, SpreadPairDef};
use crate::error::CurveError;
use crate::feed::FeedEntry;
use crate::selection::active_months;
use crate::types::{month_name, with_metadata, ComputationOutput, ContractMonth, Price};
use crate::CurveResult;

/// Prior- and current-session snapshots for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPair {
    /// Label prefix for emitted rows, e.g. "PTA".
    pub name: String,
    /// Current-session quotes.
    pub current: Vec<FeedEntry>,
    /// Prior-session closes, aligned month by month with `current`.
    pub prior: Vec<FeedEntry>,
}

impl SnapshotPair {
    /// Pull both sessions of one instrument from a feed, using the
    /// configured field indexes for current vs prior quotes.
    pub fn from_feed(
        feed: &dyn crate::feed::PriceFeed,
        name: &str,
        instrument: &str,
        codes: &crate::config::InstrumentCodes,
    ) -> Self {
        SnapshotPair {
            name: name.to_string(),
            current: feed.fetch_monthly_series(instrument, codes.current_session_index),
            prior: feed.fetch_monthly_series(instrument, codes.prior_session_index),
        }
    }
}

/// Input for daily-change composition across one or more instruments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeInput {
    pub instruments: Vec<SnapshotPair>,
    /// Reference month anchoring the active-month selection.
    pub reference: ContractMonth,
}

/// One labelled change row: a single delivery month or a calendar spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub label: String,
    pub yday: Price,
    pub tday: Price,
    /// tday − yday.
    pub diff: Price,
    /// diff converted by the static USD/CNY approximation.
    pub usd_diff: Price,
}

/// Output of daily-change composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeOutput {
    pub rows: Vec<ChangeRow>,
    /// The delivery months that were considered active.
    pub active_months: Vec<ContractMonth>,
}

#[derive(Debug, Clone, Copy)]
struct Quote {
    yday: Decimal,
    tday: Decimal,
}

/// Merge two aligned snapshots into (two-digit year, month) -> quote.
/// Months where either side is absent are dropped.
fn merge_snapshots(pair: &SnapshotPair) -> BTreeMap<(u32, u32), Quote> {
    let mut merged = BTreeMap::new();
    for (t, y) in pair.current.iter().zip(pair.prior.iter()) {
        if let (Some(tday), Some(yday)) = (t.price, y.price) {
            if let Some(key) = t.month_key() {
                merged.insert(key, Quote { yday, tday });
            }
        }
    }
    merged
}

/// Compose labelled daily-change rows plus calendar-spread rows.
///
/// For every instrument: one row per active month present in the merged
/// snapshots (in month order), then one row per configured spread pairing
/// whose legs both have data (in configuration order). The ordering is fully
/// deterministic for identical inputs.
pub fn compose_changes(
    input: &ComposeInput,
    selection: &SelectionConfig,
    pairs: &[SpreadPairDef],
    usd_divisor: Decimal,
) -> CurveResult<ComputationOutput<ComposeOutput>> {
    let start = Instant::now();

    if input.instruments.is_empty() {
        return Err(CurveError::InsufficientData(
            "at least one instrument snapshot pair is required".into(),
        ));
    }
    if usd_divisor == Decimal::ZERO {
        return Err(CurveError::DivisionByZero {
            context: "USD/CNY normalisation divisor".into(),
        });
    }

    let months = active_months(input.reference, selection);
    let mut warnings = Vec::new();
    let mut rows = Vec::new();

    for pair in &input.instruments {
        if pair.current.len() != pair.prior.len() {
            warnings.push(format!(
                "{}: current and prior snapshots differ in length ({} vs {})",
                pair.name,
                pair.current.len(),
                pair.prior.len()
            ));
        }
        let merged = merge_snapshots(pair);
        if merged.is_empty() {
            warnings.push(format!("{}: no months with both sessions quoted", pair.name));
            continue;
        }

        // Month-number index for the spread legs; when the scan spans two
        // Januaries the later one wins, matching the target order.
        let mut by_month_number: BTreeMap<u32, Quote> = BTreeMap::new();

        for target in &months {
            let key = (target.short_year() as u32, target.month);
            if let Some(quote) = merged.get(&key) {
                by_month_number.insert(target.month, *quote);
                rows.push(change_row(
                    format!("{} {}", pair.name, target.short_label()),
                    quote.yday,
                    quote.tday,
                    usd_divisor,
                ));
            }
        }

        for spread in pairs {
            if let (Some(a), Some(b)) = (
                by_month_number.get(&spread.month_a),
                by_month_number.get(&spread.month_b),
            ) {
                rows.push(change_row(
                    format!("{} {}", pair.name, spread.label),
                    a.yday - b.yday,
                    a.tday - b.tday,
                    usd_divisor,
                ));
            }
        }
    }

    let result = ComposeOutput {
        rows,
        active_months: months,
    };
    Ok(with_metadata(
        "Session-over-session change composition over active delivery months with calendar-spread pairings",
        &serde_json::json!({
            "usd_divisor": usd_divisor.to_string(),
            "near_horizon": selection.near_horizon,
            "scan_horizon": selection.scan_horizon,
            "primary_months": selection.primary_months.iter().map(|m| month_name(*m)).collect::<Vec<_>>(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn change_row(label: String, yday: Decimal, tday: Decimal, usd_divisor: Decimal) -> ChangeRow {
    let diff = tday - yday;
    ChangeRow {
        label,
        yday,
        tday,
        diff,
        usd_diff: diff / usd_divisor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_spread_pairs;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn entry(month: &str, price: Option<Decimal>) -> FeedEntry {
        FeedEntry::new(month, price)
    }

    fn pta_pair() -> SnapshotPair {
        SnapshotPair {
            name: "PTA".into(),
            current: vec![
                entry("26/01", Some(dec!(4850))),
                entry("26/02", Some(dec!(4830))),
                entry("26/03", Some(dec!(4812))),
                entry("26/05", Some(dec!(4790))),
                entry("26/09", Some(dec!(4760))),
            ],
            prior: vec![
                entry("26/01", Some(dec!(4840))),
                entry("26/02", Some(dec!(4825))),
                entry("26/03", Some(dec!(4815))),
                entry("26/05", Some(dec!(4800))),
                entry("26/09", Some(dec!(4770))),
            ],
        }
    }

    fn input() -> ComposeInput {
        ComposeInput {
            instruments: vec![pta_pair()],
            reference: ContractMonth::new(2026, 1).unwrap(),
        }
    }

    #[test]
    fn test_month_rows_then_spread_rows() {
        let out = compose_changes(
            &input(),
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;

        let labels: Vec<&str> = out.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "PTA 26-JAN",
                "PTA 26-FEB",
                "PTA 26-MAR",
                "PTA 26-MAY",
                "PTA 26-SEP",
                "PTA 1/2",
                "PTA 1/3",
                "PTA 3/5",
                "PTA 1/5",
                "PTA 5/9",
            ]
        );
    }

    #[test]
    fn test_diff_and_usd_normalisation() {
        let out = compose_changes(
            &input(),
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;

        let jan = &out.rows[0];
        assert_eq!(jan.diff, dec!(10));
        assert_eq!(jan.usd_diff, dec!(10) / dec!(7.2));

        // 1/2 spread: yday 4840-4825=15, tday 4850-4830=20.
        let spread = out.rows.iter().find(|r| r.label == "PTA 1/2").unwrap();
        assert_eq!(spread.yday, dec!(15));
        assert_eq!(spread.tday, dec!(20));
        assert_eq!(spread.diff, dec!(5));
    }

    #[test]
    fn test_months_with_one_side_missing_are_dropped() {
        let mut pair = pta_pair();
        pair.prior[1].price = None;
        let input = ComposeInput {
            instruments: vec![pair],
            reference: ContractMonth::new(2026, 1).unwrap(),
        };
        let out = compose_changes(
            &input,
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;

        assert!(!out.rows.iter().any(|r| r.label == "PTA 26-FEB"));
        // The 1/2 pairing loses its far leg with February gone.
        assert!(!out.rows.iter().any(|r| r.label == "PTA 1/2"));
        assert!(out.rows.iter().any(|r| r.label == "PTA 1/3"));
    }

    #[test]
    fn test_identical_inputs_produce_identical_rows() {
        let a = compose_changes(
            &input(),
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;
        let b = compose_changes(
            &input(),
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.active_months, b.active_months);
    }

    #[test]
    fn test_snapshot_pair_from_feed_uses_both_session_indexes() {
        use crate::config::InstrumentCodes;
        use crate::feed::StaticFeed;

        let mut feed = StaticFeed::new();
        feed.insert_series("nf_TA", 8, vec![entry("26/01", Some(dec!(4850)))]);
        feed.insert_series("nf_TA", 10, vec![entry("26/01", Some(dec!(4840)))]);

        let pair = SnapshotPair::from_feed(&feed, "PTA", "nf_TA", &InstrumentCodes::default());
        assert_eq!(pair.current[0].price, Some(dec!(4850)));
        assert_eq!(pair.prior[0].price, Some(dec!(4840)));
    }

    #[test]
    fn test_zero_divisor_refused() {
        let err = compose_changes(
            &input(),
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(0),
        );
        assert!(matches!(err, Err(CurveError::DivisionByZero { .. })));
    }

    #[test]
    fn test_two_instruments_grouped_not_interleaved() {
        let mut px = pta_pair();
        px.name = "PX".into();
        let input = ComposeInput {
            instruments: vec![pta_pair(), px],
            reference: ContractMonth::new(2026, 1).unwrap(),
        };
        let out = compose_changes(
            &input,
            &SelectionConfig::default(),
            &default_spread_pairs(),
            dec!(7.2),
        )
        .unwrap()
        .result;

        let first_px = out.rows.iter().position(|r| r.label.starts_with("PX")).unwrap();
        assert!(out.rows[..first_px]
            .iter()
            .all(|r| r.label.starts_with("PTA")));
    }
}
