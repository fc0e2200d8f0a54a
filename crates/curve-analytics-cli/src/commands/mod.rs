pub mod curve;
pub mod daily;
pub mod months;
pub mod solve;

use curve_analytics_core::config::EngineConfig;
use curve_analytics_core::types::ContractMonth;

use crate::input;

/// Load the engine config from a JSON/YAML file, or fall back to defaults.
pub fn load_config(path: &Option<String>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_config(p),
        None => Ok(EngineConfig::default()),
    }
}

/// Parse a "YYYY-MM" reference month, defaulting to the current month.
pub fn parse_reference(
    text: &Option<String>,
) -> Result<ContractMonth, Box<dyn std::error::Error>> {
    match text {
        Some(t) => {
            let (year, month) = t
                .split_once('-')
                .ok_or_else(|| format!("reference must be YYYY-MM, got '{t}'"))?;
            Ok(ContractMonth::new(year.trim().parse()?, month.trim().parse()?)?)
        }
        None => Ok(ContractMonth::current()),
    }
}
