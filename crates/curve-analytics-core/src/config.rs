use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Product and unit conversion constants used by the derived-spread formulas.
///
/// These are static desk approximations, not live rates; the engine only
/// guarantees correct propagation of whatever numbers it is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConstants {
    /// PX -> PTA conversion factor applied in the PX-PTA spread formula.
    pub px_pta_factor: Decimal,
    /// CNY/tonne conversion factor applied in the ZCE-SGX spread formula.
    pub zce_sgx_factor: Decimal,
    /// Static USD/CNY approximation used to normalise daily changes.
    pub usd_cny_divisor: Decimal,
}

impl Default for CurveConstants {
    fn default() -> Self {
        // 0.655 t PX per t PTA, grossed up for VAT and freight.
        let vat_freight = dec!(1.13) * dec!(1.02);
        CurveConstants {
            px_pta_factor: dec!(0.655) * vat_freight,
            zce_sgx_factor: vat_freight,
            usd_cny_divisor: dec!(7.2),
        }
    }
}

/// Parameters for selecting which delivery months are actively reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Calendar month numbers always included when seen (main contracts).
    pub primary_months: Vec<u32>,
    /// The reference month and the next N months are always included.
    pub near_horizon: u32,
    /// How many month offsets from the reference to examine.
    pub scan_horizon: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            primary_months: vec![1, 3, 5, 9],
            near_horizon: 2,
            // 13 so a February reference still reaches next January.
            scan_horizon: 13,
        }
    }
}

/// A configured calendar-spread pairing of two contract months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadPairDef {
    pub label: String,
    /// Near-leg calendar month number.
    pub month_a: u32,
    /// Far-leg calendar month number.
    pub month_b: u32,
}

impl SpreadPairDef {
    pub fn new(label: &str, month_a: u32, month_b: u32) -> Self {
        SpreadPairDef {
            label: label.to_string(),
            month_a,
            month_b,
        }
    }
}

/// The main-contract pairings the desk quotes.
pub fn default_spread_pairs() -> Vec<SpreadPairDef> {
    vec![
        SpreadPairDef::new("1/2", 1, 2),
        SpreadPairDef::new("1/3", 1, 3),
        SpreadPairDef::new("3/5", 3, 5),
        SpreadPairDef::new("1/5", 1, 5),
        SpreadPairDef::new("5/9", 5, 9),
    ]
}

/// Symmetric offsets applied around a solved centre value.
pub fn default_scenario_ladder() -> Vec<Decimal> {
    vec![
        dec!(-2.0),
        dec!(-1.5),
        dec!(-1.0),
        dec!(-0.5),
        dec!(0),
        dec!(0.5),
        dec!(1.0),
        dec!(1.5),
        dec!(2.0),
    ]
}

/// Feed instrument codes and the column offsets for current vs prior session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentCodes {
    pub brent: String,
    pub px_futures: String,
    pub pta_futures: String,
    /// Field index of the current-session price in the raw quote record.
    pub current_session_index: usize,
    /// Field index of the prior-session close in the raw quote record.
    pub prior_session_index: usize,
}

impl Default for InstrumentCodes {
    fn default() -> Self {
        InstrumentCodes {
            brent: "hf_OIL".to_string(),
            px_futures: "nf_PX".to_string(),
            pta_futures: "nf_TA".to_string(),
            current_session_index: 8,
            prior_session_index: 10,
        }
    }
}

/// Complete engine configuration with desk defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub constants: CurveConstants,
    pub selection: SelectionConfig,
    pub spread_pairs: Vec<SpreadPairDef>,
    pub scenario_ladder: Vec<Decimal>,
    pub instruments: InstrumentCodes,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            constants: CurveConstants::default(),
            selection: SelectionConfig::default(),
            spread_pairs: default_spread_pairs(),
            scenario_ladder: default_scenario_ladder(),
            instruments: InstrumentCodes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let c = CurveConstants::default();
        assert_eq!(c.zce_sgx_factor, dec!(1.1526));
        assert_eq!(c.px_pta_factor, dec!(0.754953));
        assert_eq!(c.usd_cny_divisor, dec!(7.2));
    }

    #[test]
    fn test_config_roundtrip_and_partial_override() {
        // A partial config file only overrides what it names.
        let json = r#"{"constants": {"usd_cny_divisor": "7.35"}}"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.constants.usd_cny_divisor, dec!(7.35));
        assert_eq!(cfg.constants.zce_sgx_factor, dec!(1.1526));
        assert_eq!(cfg.spread_pairs.len(), 5);
        assert_eq!(cfg.scenario_ladder.len(), 9);
    }
}
