use std::time::Duration;

use clap::Args;
use serde_json::Value;

use curve_analytics_core::curve::session::{CurveSession, LoadSummary};

use crate::feeds::{self, SnapshotPaths, TimeoutFeed};

/// Arguments for building the curve grid from feed snapshots
#[derive(Args)]
pub struct CurveArgs {
    /// Path to a JSON snapshot of Brent quotes
    #[arg(long)]
    pub brent: Option<String>,

    /// Path to a JSON snapshot of ZCE PX futures quotes
    #[arg(long)]
    pub px_futures: Option<String>,

    /// Path to a JSON snapshot of PTA futures quotes
    #[arg(long)]
    pub pta_futures: Option<String>,

    /// Path to a JSON snapshot of the USD/CNH forward series
    #[arg(long)]
    pub fx: Option<String>,

    /// Reference month as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub reference: Option<String>,

    /// Path to a JSON/YAML config file overriding desk defaults
    #[arg(long)]
    pub config: Option<String>,

    /// Seconds to wait on each feed before substituting an empty series
    #[arg(long, default_value = "30")]
    pub feed_timeout: u64,
}

/// Arguments for exporting the curve grid to a CSV file
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Destination CSV path
    #[arg(long)]
    pub path: String,
}

fn build_session(
    args: &CurveArgs,
) -> Result<(CurveSession, LoadSummary), Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    let reference = super::parse_reference(&args.reference)?;

    let paths = SnapshotPaths {
        brent: args.brent.as_deref(),
        px_futures: args.px_futures.as_deref(),
        pta_futures: args.pta_futures.as_deref(),
        fx: args.fx.as_deref(),
    };
    let feed = TimeoutFeed::new(
        feeds::snapshot_feed(&config.instruments, &paths)?,
        Duration::from_secs(args.feed_timeout),
    );

    let mut session = CurveSession::new(reference, config);
    let summary = session.load(&feed, &feed);
    Ok((session, summary))
}

pub fn run_curve(args: CurveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (session, summary) = build_session(&args)?;

    Ok(serde_json::json!({
        "reference": session.grid().reference(),
        "summary": summary,
        "table": session.grid().to_table(),
    }))
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (session, _) = build_session(&args.curve)?;
    let table = session.grid().to_table();

    let mut writer = csv::Writer::from_path(&args.path)
        .map_err(|e| format!("Failed to open '{}': {}", args.path, e))?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(serde_json::json!({
        "path": args.path,
        "rows": table.rows.len(),
    }))
}
