use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use curve_analytics_core::solver::{solve_scenarios, SolveDirection, SolveInput};

/// Arguments for the inverse curve-value solver
#[derive(Args)]
pub struct SolveArgs {
    /// Which side of the conversion identity to solve for
    #[arg(long, value_enum)]
    pub direction: Direction,

    /// Delivery month name carried through the scenario table (e.g. jan)
    #[arg(long, default_value = "jan")]
    pub month: String,

    /// Known spread
    #[arg(long, allow_hyphen_values = true)]
    pub spread: Decimal,

    /// Known futures price (PTA futures for px-from-pta, PX futures otherwise)
    #[arg(long)]
    pub future: Decimal,

    /// Known USD/CNH rate; must be non-zero
    #[arg(long)]
    pub fx: Decimal,

    /// Path to a JSON/YAML config file overriding desk defaults
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Direction {
    /// Solve the implied PX value from PTA futures
    PxFromPta,
    /// Solve the implied PTA value from PX futures
    PtaFromPx,
}

impl From<Direction> for SolveDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::PxFromPta => SolveDirection::PxFromPta,
            Direction::PtaFromPx => SolveDirection::PtaFromPx,
        }
    }
}

pub fn run_solve(args: SolveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;

    let input = SolveInput {
        direction: args.direction.into(),
        month: args.month,
        spread: args.spread,
        future: args.future,
        fx: args.fx,
    };
    let result = solve_scenarios(&input, &config.constants, &config.scenario_ladder)?;
    Ok(serde_json::to_value(result)?)
}
