use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parse a quoted price as feeds report it: plain numbers, numbers with
/// thousands separators, or the "N/A" / dash placeholders some venues emit.
/// Anything unparseable is treated as absent, never as an error.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "N/A" || trimmed == "-" || trimmed == "None" {
        return None;
    }
    Decimal::from_str(&trimmed.replace(',', "")).ok()
}

/// One month's quote from a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Month key in "YY/MM" form, ascending from the current month.
    pub month: String,
    /// None when the venue reported "N/A" or nothing at all.
    #[serde(with = "na_price")]
    pub price: Option<Decimal>,
}

impl FeedEntry {
    pub fn new(month: &str, price: Option<Decimal>) -> Self {
        FeedEntry {
            month: month.to_string(),
            price,
        }
    }

    /// Split the "YY/MM" key into (two-digit year, month number).
    pub fn month_key(&self) -> Option<(u32, u32)> {
        let (y, m) = self.month.split_once('/')?;
        let year = y.trim().parse::<u32>().ok()? % 100;
        let month = m.trim().parse::<u32>().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }
}

/// Serde for the feed price column: accepts a number, a numeric string
/// (possibly with thousands separators), "N/A", or null; writes "N/A" back
/// for absent values so round-tripped snapshots keep the feed convention.
mod na_price {
    use super::parse_price;
    use rust_decimal::Decimal;
    use serde::de::Deserializer;
    use serde::ser::Serializer;
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&d.to_string()),
            None => s.serialize_str("N/A"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        let raw = serde_json::Value::deserialize(d)?;
        Ok(match raw {
            serde_json::Value::Null => None,
            serde_json::Value::Number(n) => parse_price(&n.to_string()),
            serde_json::Value::String(s) => parse_price(&s),
            _ => None,
        })
    }
}

/// Source of monthly futures quotes for one instrument.
///
/// Implementations return up to 12 entries ascending from the current month;
/// callers tolerate shorter series and absent prices.
pub trait PriceFeed {
    fn fetch_monthly_series(&self, instrument: &str, field_index: usize) -> Vec<FeedEntry>;
}

/// Source of the USD/CNH forward series. Kept separate from [`PriceFeed`]
/// because the rate comes over a much heavier synchronous channel.
pub trait FxFeed {
    fn fetch_fx_series(&self) -> Vec<FeedEntry>;
}

/// In-memory feed over pre-captured series, keyed by (instrument, field index).
/// Backs file-based snapshots and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    series: HashMap<(String, usize), Vec<FeedEntry>>,
    fx: Vec<FeedEntry>,
}

impl StaticFeed {
    pub fn new() -> Self {
        StaticFeed::default()
    }

    pub fn insert_series(&mut self, instrument: &str, field_index: usize, entries: Vec<FeedEntry>) {
        self.series
            .insert((instrument.to_string(), field_index), entries);
    }

    pub fn set_fx(&mut self, entries: Vec<FeedEntry>) {
        self.fx = entries;
    }
}

impl PriceFeed for StaticFeed {
    fn fetch_monthly_series(&self, instrument: &str, field_index: usize) -> Vec<FeedEntry> {
        self.series
            .get(&(instrument.to_string(), field_index))
            .cloned()
            .unwrap_or_default()
    }
}

impl FxFeed for StaticFeed {
    fn fetch_fx_series(&self) -> Vec<FeedEntry> {
        self.fx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price_variants() {
        assert_eq!(parse_price("7.2345"), Some(dec!(7.2345)));
        assert_eq!(parse_price("9,494"), Some(dec!(9494)));
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("garbage"), None);
    }

    #[test]
    fn test_entry_deserialize_number_string_and_na() {
        let entries: Vec<FeedEntry> = serde_json::from_str(
            r#"[
                {"month": "26/01", "price": 81.5},
                {"month": "26/02", "price": "5,842"},
                {"month": "26/03", "price": "N/A"},
                {"month": "26/04", "price": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries[0].price, Some(dec!(81.5)));
        assert_eq!(entries[1].price, Some(dec!(5842)));
        assert_eq!(entries[2].price, None);
        assert_eq!(entries[3].price, None);
    }

    #[test]
    fn test_na_serialized_back_as_na() {
        let entry = FeedEntry::new("26/03", None);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("N/A"));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(FeedEntry::new("26/01", None).month_key(), Some((26, 1)));
        assert_eq!(FeedEntry::new("2026/05", None).month_key(), Some((26, 5)));
        assert_eq!(FeedEntry::new("26-01", None).month_key(), None);
        assert_eq!(FeedEntry::new("26/13", None).month_key(), None);
    }

    #[test]
    fn test_static_feed_missing_instrument_is_empty() {
        let feed = StaticFeed::new();
        assert!(feed.fetch_monthly_series("nf_TA", 8).is_empty());
        assert!(feed.fetch_fx_series().is_empty());
    }
}
