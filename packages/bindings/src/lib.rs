use napi::Result as NapiResult;
use napi_derive::napi;

use serde::Deserialize;

use curve_analytics_core::config::EngineConfig;
use curve_analytics_core::curve::session::CurveSession;
use curve_analytics_core::feed::{FeedEntry, StaticFeed};
use curve_analytics_core::types::ContractMonth;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Curve grid
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CurveRequest {
    reference: ContractMonth,
    #[serde(default)]
    brent: Vec<FeedEntry>,
    #[serde(default)]
    px_futures: Vec<FeedEntry>,
    #[serde(default)]
    pta_futures: Vec<FeedEntry>,
    #[serde(default)]
    fx: Vec<FeedEntry>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

#[napi]
pub fn build_curve(input_json: String) -> NapiResult<String> {
    let request: CurveRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = request.config.unwrap_or_default();

    let mut feed = StaticFeed::new();
    let idx = config.instruments.current_session_index;
    feed.insert_series(&config.instruments.brent, idx, request.brent);
    feed.insert_series(&config.instruments.px_futures, idx, request.px_futures);
    feed.insert_series(&config.instruments.pta_futures, idx, request.pta_futures);
    feed.set_fx(request.fx);

    let mut session = CurveSession::new(request.reference, config);
    let summary = session.load(&feed, &feed);

    let output = serde_json::json!({
        "reference": session.grid().reference(),
        "summary": summary,
        "table": session.grid().to_table(),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Daily changes
// ---------------------------------------------------------------------------

#[napi]
pub fn compose_changes(input_json: String) -> NapiResult<String> {
    let input: curve_analytics_core::composer::ComposeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = EngineConfig::default();
    let output = curve_analytics_core::composer::compose_changes(
        &input,
        &config.selection,
        &config.spread_pairs,
        config.constants.usd_cny_divisor,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Inverse solver
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_scenarios(input_json: String) -> NapiResult<String> {
    let input: curve_analytics_core::solver::SolveInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = EngineConfig::default();
    let output = curve_analytics_core::solver::solve_scenarios(
        &input,
        &config.constants,
        &config.scenario_ladder,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Month selection
// ---------------------------------------------------------------------------

#[napi]
pub fn active_months(reference_json: String) -> NapiResult<String> {
    let reference: ContractMonth = serde_json::from_str(&reference_json).map_err(to_napi_error)?;
    let config = EngineConfig::default();
    let months = curve_analytics_core::selection::active_months(reference, &config.selection);
    serde_json::to_string(&months).map_err(to_napi_error)
}
