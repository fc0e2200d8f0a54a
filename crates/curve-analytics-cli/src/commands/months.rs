use clap::Args;
use serde_json::Value;

use curve_analytics_core::selection::active_months;

/// Arguments for listing the active delivery months
#[derive(Args)]
pub struct MonthsArgs {
    /// Reference month as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub reference: Option<String>,

    /// Path to a JSON/YAML config file overriding desk defaults
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_months(args: MonthsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    let reference = super::parse_reference(&args.reference)?;

    let months: Vec<Value> = active_months(reference, &config.selection)
        .into_iter()
        .map(|m| {
            serde_json::json!({
                "year": m.year,
                "month": m.month,
                "label": m.short_label(),
            })
        })
        .collect();

    Ok(Value::Array(months))
}
