use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::curve::cascade::recompute;
use crate::curve::gapfill::fill_column;
use crate::curve::grid::{CurveField, CurveGrid, ROWS};
use crate::error::CurveError;
use crate::feed::{FeedEntry, FxFeed, PriceFeed};
use crate::types::{ContractMonth, Provenance};
use crate::CurveResult;

/// A single cell edit submitted to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellEdit {
    pub row: usize,
    pub field: CurveField,
    pub value: Decimal,
}

/// What a load run did, reported as data rather than printed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Cells populated directly from feed observations.
    pub cells_loaded: usize,
    /// USD/CNH cells repaired by the gap filler.
    pub fx_cells_filled: usize,
    pub warnings: Vec<String>,
}

/// Exclusive owner of one curve grid and its configuration.
///
/// Every operation is synchronous and runs to completion under `&mut self`,
/// so a caller can never observe a partially recomputed grid: load, submit,
/// and reset each finish their full recompute before returning.
#[derive(Debug, Clone)]
pub struct CurveSession {
    grid: CurveGrid,
    config: EngineConfig,
}

impl CurveSession {
    pub fn new(reference: ContractMonth, config: EngineConfig) -> Self {
        CurveSession {
            grid: CurveGrid::new(reference),
            config,
        }
    }

    pub fn grid(&self) -> &CurveGrid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load raw observations from the feeds, repair the FX column, and
    /// recompute. Short series and absent prices are tolerated and reported
    /// as warnings; a feed failure is indistinguishable from an empty feed.
    pub fn load(&mut self, prices: &dyn PriceFeed, fx: &dyn FxFeed) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let codes = self.config.instruments.clone();
        let session_idx = codes.current_session_index;

        for (instrument, field) in [
            (codes.brent.as_str(), CurveField::Brent),
            (codes.px_futures.as_str(), CurveField::PxFutures),
            (codes.pta_futures.as_str(), CurveField::PtaFutures),
        ] {
            let series = prices.fetch_monthly_series(instrument, session_idx);
            if series.is_empty() {
                summary
                    .warnings
                    .push(format!("no data returned for {instrument}"));
            }
            summary.cells_loaded += load_series(&mut self.grid, field, &series);
        }

        let fx_series = fx.fetch_fx_series();
        if fx_series.is_empty() {
            summary.warnings.push("no USD/CNH series returned".into());
        }
        summary.cells_loaded += load_series(&mut self.grid, CurveField::UsdCnh, &fx_series);
        summary.fx_cells_filled = fill_column(&mut self.grid, CurveField::UsdCnh);
        if summary.fx_cells_filled > 0 {
            summary.warnings.push(format!(
                "{} USD/CNH cells filled from neighbouring months",
                summary.fx_cells_filled
            ));
        }

        recompute(&mut self.grid, &self.config.constants);
        summary
    }

    /// Apply one edit and recompute. Only the raw input columns accept edits.
    pub fn submit(&mut self, edit: CellEdit) -> CurveResult<()> {
        if edit.row >= ROWS {
            return Err(CurveError::InvalidInput {
                field: "row".into(),
                reason: format!("row must be 0-{}, got {}", ROWS - 1, edit.row),
            });
        }
        if !edit.field.editable() {
            return Err(CurveError::InvalidInput {
                field: edit.field.header().into(),
                reason: "column is derived and not editable".into(),
            });
        }

        self.grid
            .set_as(edit.row, edit.field, edit.value, Provenance::Observed);
        recompute(&mut self.grid, &self.config.constants);
        Ok(())
    }

    /// Force a full recompute without changing any input.
    pub fn recompute(&mut self) {
        recompute(&mut self.grid, &self.config.constants);
    }

    /// Back to the zeroed state with spread-column defaults restored.
    pub fn reset(&mut self) {
        self.grid.reset();
    }
}

fn load_series(grid: &mut CurveGrid, field: CurveField, series: &[FeedEntry]) -> usize {
    let mut loaded = 0;
    for row in 0..ROWS {
        if let Some(price) = series.get(row).and_then(|entry| entry.price) {
            grid.set_as(row, field, price, Provenance::Observed);
            loaded += 1;
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::StaticFeed;
    use rust_decimal_macros::dec;

    fn reference() -> ContractMonth {
        ContractMonth::new(2026, 1).unwrap()
    }

    fn entries(prices: &[Option<Decimal>]) -> Vec<FeedEntry> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| FeedEntry::new(&reference().plus_months(i as u32).feed_key(), *p))
            .collect()
    }

    #[test]
    fn test_load_with_empty_feeds_is_soft() {
        let mut session = CurveSession::new(reference(), EngineConfig::default());
        let feed = StaticFeed::new();
        let summary = session.load(&feed, &feed);

        assert_eq!(summary.cells_loaded, 0);
        assert_eq!(summary.fx_cells_filled, 0);
        assert_eq!(summary.warnings.len(), 4);
        assert_eq!(session.grid().value(0, CurveField::Brent), Decimal::ZERO);
    }

    #[test]
    fn test_load_populates_observed_and_fills_fx() {
        let mut feed = StaticFeed::new();
        feed.insert_series("hf_OIL", 8, entries(&[Some(dec!(66.4)), Some(dec!(66.1))]));
        feed.insert_series(
            "nf_PX",
            8,
            entries(&[Some(dec!(6898)), None, Some(dec!(6910))]),
        );
        feed.insert_series("nf_TA", 8, entries(&[Some(dec!(4846))]));
        feed.set_fx(entries(&[Some(dec!(7.12)), None, Some(dec!(7.14))]));

        let mut session = CurveSession::new(reference(), EngineConfig::default());
        let summary = session.load(&feed, &feed);

        assert_eq!(summary.cells_loaded, 2 + 2 + 1 + 2);
        assert_eq!(summary.fx_cells_filled, 2);

        let grid = session.grid();
        assert_eq!(
            grid.cell(0, CurveField::Brent).unwrap().provenance,
            Provenance::Observed
        );
        // Row 1 FX gap was filled forward; rows 3..11 stay missing after the
        // one-hop passes except row 3, reached backward from row 2's quote.
        assert_eq!(grid.value(1, CurveField::UsdCnh), dec!(7.12));
        assert_eq!(
            grid.cell(1, CurveField::UsdCnh).unwrap().provenance,
            Provenance::PropagatedForward
        );
        assert_eq!(grid.value(3, CurveField::UsdCnh), dec!(7.14));
        assert_eq!(
            grid.cell(3, CurveField::UsdCnh).unwrap().provenance,
            Provenance::PropagatedForward
        );
        assert_eq!(
            grid.cell(5, CurveField::UsdCnh).unwrap().provenance,
            Provenance::Missing
        );
        // Derived cells carry the computed tag after the load's recompute.
        assert_eq!(
            grid.cell(0, CurveField::Pxn).unwrap().provenance,
            Provenance::Computed
        );
    }

    #[test]
    fn test_submit_edit_triggers_recompute() {
        let mut session = CurveSession::new(reference(), EngineConfig::default());
        session
            .submit(CellEdit {
                row: 0,
                field: CurveField::Px,
                value: dec!(830),
            })
            .unwrap();
        session
            .submit(CellEdit {
                row: 0,
                field: CurveField::Mopj,
                value: dec!(615),
            })
            .unwrap();

        assert_eq!(session.grid().value(0, CurveField::Pxn), dec!(215));
        // Spread defaults are zero, so the benchmark carries flat down the curve.
        assert_eq!(session.grid().value(11, CurveField::Px), dec!(830));
    }

    #[test]
    fn test_submit_rejects_derived_columns_and_bad_rows() {
        let mut session = CurveSession::new(reference(), EngineConfig::default());
        assert!(session
            .submit(CellEdit {
                row: 0,
                field: CurveField::Pxn,
                value: dec!(1),
            })
            .is_err());
        assert!(session
            .submit(CellEdit {
                row: 12,
                field: CurveField::Px,
                value: dec!(1),
            })
            .is_err());
    }

    #[test]
    fn test_reset_clears_observations() {
        let mut session = CurveSession::new(reference(), EngineConfig::default());
        session
            .submit(CellEdit {
                row: 0,
                field: CurveField::Px,
                value: dec!(830),
            })
            .unwrap();
        session.reset();
        assert_eq!(session.grid().value(0, CurveField::Px), Decimal::ZERO);
        assert_eq!(
            session.grid().cell(0, CurveField::PxSpread).unwrap().value,
            Some(dec!(0.00))
        );
    }
}
