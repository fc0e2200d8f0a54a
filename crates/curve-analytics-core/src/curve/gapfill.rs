use rust_decimal::Decimal;

use crate::curve::grid::{CurveField, CurveGrid, ROWS};
use crate::types::Provenance;

/// Repair missing observations in one column by bidirectional
/// nearest-neighbour propagation.
///
/// Pass 1 walks forward (rows 1..11) copying a non-zero predecessor into a
/// zero cell; pass 2 walks backward (rows 10..0) copying a non-zero
/// successor. A copy is only taken from a neighbour that was not itself
/// settled by propagation, so each pass advances at most one hop into a run
/// of gaps: a run of two or more missing months gets its first gap filled
/// from above and the rest attempted from below. This one-hop behaviour is
/// intentional: values invented further than one month from a quote are not
/// trusted. Cells still zero after both passes stay tagged missing.
///
/// Returns the number of cells filled.
pub fn fill_column(grid: &mut CurveGrid, field: CurveField) -> usize {
    let mut settled = [false; ROWS];
    let mut filled = 0;

    for row in 1..ROWS {
        if grid.value(row, field) == Decimal::ZERO {
            let prev = grid.value(row - 1, field);
            if prev != Decimal::ZERO && !settled[row - 1] {
                settled[row] = true;
                grid.set_as(row, field, prev, Provenance::PropagatedForward);
                filled += 1;
            }
        }
    }

    for row in (0..ROWS - 1).rev() {
        if grid.value(row, field) == Decimal::ZERO {
            let next = grid.value(row + 1, field);
            if next != Decimal::ZERO && !settled[row + 1] {
                settled[row] = true;
                grid.set_as(row, field, next, Provenance::PropagatedBackward);
                filled += 1;
            }
        }
    }

    for row in 0..ROWS {
        if grid.value(row, field) == Decimal::ZERO {
            if let Some(cell) = grid.cell(row, field) {
                if cell.provenance != Provenance::Missing {
                    grid.tag(row, field, Provenance::Missing);
                }
            }
        }
    }

    filled
}
