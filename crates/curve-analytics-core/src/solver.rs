use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CurveConstants;
use crate::error::CurveError;
use crate::types::{with_metadata, ComputationOutput, Price};
use crate::CurveResult;

/// Which side of the conversion identity is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveDirection {
    /// Known PTA futures, spread, and FX; solve the implied PX value:
    /// `px = (future − spread) / (k · fx)`.
    PxFromPta,
    /// Known PX futures, spread, and FX; solve the implied PTA value:
    /// `pta = future · k · fx + spread`.
    PtaFromPx,
}

impl SolveDirection {
    /// The conversion constant each direction uses.
    pub fn constant(&self, constants: &CurveConstants) -> Decimal {
        match self {
            SolveDirection::PxFromPta => constants.px_pta_factor,
            SolveDirection::PtaFromPx => constants.zce_sgx_factor,
        }
    }
}

/// Known quantities for an inverse solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveInput {
    pub direction: SolveDirection,
    /// Delivery month label carried through to every scenario row.
    pub month: String,
    /// Known spread S.
    pub spread: Price,
    /// Known futures price F.
    pub future: Price,
    /// Known cross rate U; must be non-zero.
    pub fx: Price,
}

/// One rung of the sensitivity ladder around the solved centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub month: String,
    /// Candidate value: centre plus the rung's offset.
    pub value: Price,
    /// Spread implied by re-running the forward formula at this candidate.
    pub spread: Price,
    pub future: Price,
    pub fx: Price,
    /// True only on the offset-zero rung, the canonical solved result.
    pub is_center: bool,
}

/// Output of an inverse solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOutput {
    pub direction: SolveDirection,
    pub center: Price,
    pub rows: Vec<ScenarioRow>,
}

/// Solve the unknown side of the conversion identity, then build the
/// symmetric scenario table by re-running the forward formula at each
/// ladder offset. A zero cross rate is refused outright; the undefined
/// result is an error value, never a NaN in the output.
pub fn solve_scenarios(
    input: &SolveInput,
    constants: &CurveConstants,
    ladder: &[Decimal],
) -> CurveResult<ComputationOutput<SolveOutput>> {
    let start = Instant::now();

    if input.fx == Decimal::ZERO {
        return Err(CurveError::DivisionByZero {
            context: "inverse solve cross rate".into(),
        });
    }
    if ladder.is_empty() {
        return Err(CurveError::InsufficientData(
            "scenario ladder must contain at least one offset".into(),
        ));
    }

    let k = input.direction.constant(constants);
    let converted = k * input.fx;

    let center = match input.direction {
        SolveDirection::PxFromPta => (input.future - input.spread) / converted,
        SolveDirection::PtaFromPx => input.future * converted + input.spread,
    };

    let rows = ladder
        .iter()
        .map(|offset| {
            let candidate = center + *offset;
            let spread = match input.direction {
                SolveDirection::PxFromPta => input.future - candidate * converted,
                SolveDirection::PtaFromPx => candidate - input.future * converted,
            };
            ScenarioRow {
                month: input.month.clone(),
                value: candidate,
                spread,
                future: input.future,
                fx: input.fx,
                is_center: offset.is_zero(),
            }
        })
        .collect();

    let result = SolveOutput {
        direction: input.direction,
        center,
        rows,
    };
    Ok(with_metadata(
        "Inverse conversion-identity solve with a symmetric scenario ladder",
        &serde_json::json!({
            "conversion_constant": k.to_string(),
            "ladder_rungs": ladder.len(),
        }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}
