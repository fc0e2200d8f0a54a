use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use curve_analytics_core::composer::{compose_changes, ComposeInput, SnapshotPair};
use curve_analytics_core::config::InstrumentCodes;
use curve_analytics_core::feed::StaticFeed;
use curve_analytics_core::types::ContractMonth;

use crate::input;

/// Arguments for daily change composition
#[derive(Args)]
pub struct DailyArgs {
    /// Path to a JSON file with instrument snapshot pairs
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON snapshot of current-session PTA futures quotes
    #[arg(long)]
    pub pta_current: Option<String>,

    /// Path to a JSON snapshot of prior-session PTA futures closes
    #[arg(long)]
    pub pta_prior: Option<String>,

    /// Path to a JSON snapshot of current-session PX futures quotes
    #[arg(long)]
    pub px_current: Option<String>,

    /// Path to a JSON snapshot of prior-session PX futures closes
    #[arg(long)]
    pub px_prior: Option<String>,

    /// Reference month as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub reference: Option<String>,

    /// Path to a JSON/YAML config file overriding desk defaults
    #[arg(long)]
    pub config: Option<String>,
}

/// On-disk request shape: snapshot pairs plus an optional reference month.
#[derive(Deserialize)]
struct DailyRequest {
    instruments: Vec<SnapshotPair>,
    #[serde(default)]
    reference: Option<ContractMonth>,
}

pub fn run_daily(args: DailyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;

    let (instruments, reference) = if let Some(ref path) = args.input {
        let request: DailyRequest = input::file::read_json(path)?;
        (request.instruments, request.reference)
    } else if let Some(request) = input::stdin::read_stdin::<DailyRequest>()? {
        (request.instruments, request.reference)
    } else {
        let pairs = pairs_from_files(&args, &config.instruments)?;
        if pairs.is_empty() {
            return Err("--input <file.json>, stdin, or per-instrument snapshot \
                        files required for daily change composition"
                .into());
        }
        (pairs, None)
    };

    let reference = match reference {
        Some(m) => m,
        None => super::parse_reference(&args.reference)?,
    };

    let compose_input = ComposeInput {
        instruments,
        reference,
    };
    let result = compose_changes(
        &compose_input,
        &config.selection,
        &config.spread_pairs,
        config.constants.usd_cny_divisor,
    )?;
    Ok(serde_json::to_value(result)?)
}

/// Build snapshot pairs from captured feed files, both sessions per
/// instrument, the same way a live run would pull them from the feed.
fn pairs_from_files(
    args: &DailyArgs,
    codes: &InstrumentCodes,
) -> Result<Vec<SnapshotPair>, Box<dyn std::error::Error>> {
    let mut feed = StaticFeed::new();
    let mut loaded = Vec::new();

    let sources = [
        ("PTA", codes.pta_futures.clone(), &args.pta_current, &args.pta_prior),
        ("PX", codes.px_futures.clone(), &args.px_current, &args.px_prior),
    ];
    for (name, instrument, current, prior) in sources {
        if let (Some(current), Some(prior)) = (current, prior) {
            feed.insert_series(
                &instrument,
                codes.current_session_index,
                input::file::read_json(current)?,
            );
            feed.insert_series(
                &instrument,
                codes.prior_session_index,
                input::file::read_json(prior)?,
            );
            loaded.push((name, instrument));
        }
    }

    Ok(loaded
        .into_iter()
        .map(|(name, instrument)| SnapshotPair::from_feed(&feed, name, &instrument, codes))
        .collect())
}
