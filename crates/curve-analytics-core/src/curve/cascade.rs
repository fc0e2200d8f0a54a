use crate::config::CurveConstants;
use crate::curve::grid::{CurveField, CurveGrid, ROWS};

/// Recompute every derived field across the full grid.
///
/// Row 0 benchmark values are leaves (loads or edits); each later month's
/// benchmark decays from the prior month by that month's realised roll
/// spread. Derived spreads are then rebuilt per row, and the box column from
/// adjacent PXN margins. There is no incremental path: the grid is small
/// enough that a full pass is cheap, and it rules out stale derived values.
/// Missing inputs read as zero, so this never fails.
pub fn recompute(grid: &mut CurveGrid, constants: &CurveConstants) {
    for row in 0..ROWS {
        if row > 0 {
            let mopj =
                grid.value(row - 1, CurveField::Mopj) - grid.value(row - 1, CurveField::MopjSpread);
            grid.set(row, CurveField::Mopj, mopj);

            let px =
                grid.value(row - 1, CurveField::Px) - grid.value(row - 1, CurveField::PxSpread);
            grid.set(row, CurveField::Px, px);
        }

        let mopj = grid.value(row, CurveField::Mopj);
        let px = grid.value(row, CurveField::Px);
        let px_futures = grid.value(row, CurveField::PxFutures);
        let pta_futures = grid.value(row, CurveField::PtaFutures);
        let usd_cnh = grid.value(row, CurveField::UsdCnh);

        grid.set(row, CurveField::Pxn, px - mopj);
        grid.set(
            row,
            CurveField::PxPtaSpread,
            pta_futures - constants.px_pta_factor * px * usd_cnh,
        );
        grid.set(
            row,
            CurveField::ZceSgxSpread,
            px_futures - constants.zce_sgx_factor * px * usd_cnh,
        );
    }

    // Box needs a successor month; the last row stays blank rather than zero.
    for row in 0..ROWS - 1 {
        let diff = grid.value(row, CurveField::Pxn) - grid.value(row + 1, CurveField::Pxn);
        grid.set(row, CurveField::BoxSpread, diff);
    }
    grid.clear(ROWS - 1, CurveField::BoxSpread);
}
