use serde::{Deserialize, Serialize};

use rust_decimal::Decimal;

use crate::types::{Cell, ContractMonth, Price, Provenance, TableModel};

/// A curve always spans exactly this many delivery months.
pub const ROWS: usize = 12;

/// The fixed column set of the curve grid, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveField {
    /// Brent crude, display reference only.
    Brent,
    /// Naphtha benchmark (MOPJ), cascaded month to month.
    Mopj,
    /// Monthly roll spread subtracted from MOPJ.
    MopjSpread,
    /// Paraxylene benchmark, cascaded month to month.
    Px,
    /// Monthly roll spread subtracted from PX.
    PxSpread,
    /// PX minus naphtha margin.
    Pxn,
    /// ZCE PX futures.
    PxFutures,
    /// Domestic PTA futures.
    PtaFutures,
    /// PTA futures minus converted PX value.
    PxPtaSpread,
    /// ZCE PX futures minus converted SGX PX value.
    ZceSgxSpread,
    /// USD/CNH forward, the gap-filled column.
    UsdCnh,
    /// Month-over-month change of the PXN margin.
    BoxSpread,
}

impl CurveField {
    pub const ALL: [CurveField; 12] = [
        CurveField::Brent,
        CurveField::Mopj,
        CurveField::MopjSpread,
        CurveField::Px,
        CurveField::PxSpread,
        CurveField::Pxn,
        CurveField::PxFutures,
        CurveField::PtaFutures,
        CurveField::PxPtaSpread,
        CurveField::ZceSgxSpread,
        CurveField::UsdCnh,
        CurveField::BoxSpread,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            CurveField::Brent => "BRENT",
            CurveField::Mopj => "MOPJ",
            CurveField::MopjSpread => "MOPJ SPREAD",
            CurveField::Px => "PX",
            CurveField::PxSpread => "PX SPREAD",
            CurveField::Pxn => "PXN",
            CurveField::PxFutures => "PX Futures",
            CurveField::PtaFutures => "PTA Futures",
            CurveField::PxPtaSpread => "PX-PTA SPREAD",
            CurveField::ZceSgxSpread => "ZCEPX-SGXPX",
            CurveField::UsdCnh => "USD/CNH",
            CurveField::BoxSpread => "BOX",
        }
    }

    /// Decimal places values in this column are held at.
    pub fn precision(&self) -> u32 {
        match self {
            CurveField::PxFutures | CurveField::PtaFutures => 0,
            _ => 2,
        }
    }

    /// Raw input columns are editable; derived columns are not.
    pub fn editable(&self) -> bool {
        !matches!(
            self,
            CurveField::Pxn
                | CurveField::PxPtaSpread
                | CurveField::ZceSgxSpread
                | CurveField::BoxSpread
        )
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// The 12-month curve grid for the PX/PTA complex.
///
/// Row 0 is the reference month; row i is i months later. Reads are
/// deliberately defensive: an out-of-range row or an empty cell yields zero,
/// never an error. Writes round to the column's precision, so downstream
/// formulas always see the same value a reader of the grid sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    reference: ContractMonth,
    cells: Vec<Vec<Cell>>,
}

impl CurveGrid {
    /// An empty grid anchored at `reference`, with the roll-spread columns
    /// seeded to their editable 0.00 defaults.
    pub fn new(reference: ContractMonth) -> Self {
        let mut grid = CurveGrid {
            reference,
            cells: Vec::new(),
        };
        grid.reset();
        grid
    }

    pub fn reference(&self) -> ContractMonth {
        self.reference
    }

    /// Delivery month for a row; row 0 is the reference month.
    pub fn month(&self, row: usize) -> ContractMonth {
        self.reference.plus_months(row as u32)
    }

    pub fn months(&self) -> Vec<ContractMonth> {
        (0..ROWS).map(|row| self.month(row)).collect()
    }

    /// Read a cell's numeric value. Out-of-range rows and absent cells read
    /// as zero; this is the grid's never-throwing read contract.
    pub fn value(&self, row: usize, field: CurveField) -> Price {
        self.cells
            .get(row)
            .and_then(|r| r.get(field.index()))
            .and_then(|cell| cell.value)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cell(&self, row: usize, field: CurveField) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(field.index()))
    }

    /// Store a computed value, rounded to the column's precision.
    pub fn set(&mut self, row: usize, field: CurveField, value: Price) {
        self.set_as(row, field, value, Provenance::Computed);
    }

    /// Store a value with an explicit provenance tag.
    pub fn set_as(&mut self, row: usize, field: CurveField, value: Price, provenance: Provenance) {
        if let Some(cell) = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(field.index()))
        {
            cell.value = Some(value.round_dp(field.precision()));
            cell.precision = field.precision();
            cell.editable = field.editable();
            cell.provenance = provenance;
        }
    }

    /// Blank a cell back to missing.
    pub fn clear(&mut self, row: usize, field: CurveField) {
        if let Some(cell) = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(field.index()))
        {
            *cell = Cell::empty(field.precision(), field.editable());
        }
    }

    /// Retag a cell's provenance without touching its value.
    pub fn tag(&mut self, row: usize, field: CurveField, provenance: Provenance) {
        if let Some(cell) = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(field.index()))
        {
            cell.provenance = provenance;
        }
    }

    /// Zero all mutable state and restore the fixed defaults: every cell back
    /// to missing, then the two roll-spread columns seeded with editable 0.00
    /// values so the cascade has leaves to work from.
    pub fn reset(&mut self) {
        self.cells = (0..ROWS)
            .map(|_| {
                CurveField::ALL
                    .iter()
                    .map(|f| Cell::empty(f.precision(), f.editable()))
                    .collect()
            })
            .collect();
        for row in 0..ROWS {
            self.set_as(
                row,
                CurveField::MopjSpread,
                Decimal::ZERO,
                Provenance::Observed,
            );
            self.set_as(
                row,
                CurveField::PxSpread,
                Decimal::ZERO,
                Provenance::Observed,
            );
        }
    }

    /// Export the grid as header-labelled string cells in fixed header order,
    /// months first. Blank cells export as empty strings.
    pub fn to_table(&self) -> TableModel {
        let mut headers = vec!["Month".to_string()];
        headers.extend(CurveField::ALL.iter().map(|f| f.header().to_string()));

        let rows = (0..ROWS)
            .map(|row| {
                let mut out = vec![self.month(row).short_label()];
                for field in CurveField::ALL {
                    out.push(match self.cell(row, field).and_then(|c| c.value) {
                        Some(v) => format!("{:.prec$}", v, prec = field.precision() as usize),
                        None => String::new(),
                    });
                }
                out
            })
            .collect();

        TableModel { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn reference() -> ContractMonth {
        ContractMonth::new(2026, 1).unwrap()
    }

    #[test]
    fn test_defensive_read_out_of_range() {
        let grid = CurveGrid::new(reference());
        assert_eq!(grid.value(12, CurveField::Px), Decimal::ZERO);
        assert_eq!(grid.value(usize::MAX, CurveField::Px), Decimal::ZERO);
        assert_eq!(grid.value(0, CurveField::Px), Decimal::ZERO);
    }

    #[test]
    fn test_set_rounds_to_field_precision() {
        let mut grid = CurveGrid::new(reference());
        grid.set(0, CurveField::Px, dec!(831.456));
        assert_eq!(grid.value(0, CurveField::Px), dec!(831.46));

        // Futures columns are held at whole numbers.
        grid.set(0, CurveField::PtaFutures, dec!(4843.7));
        assert_eq!(grid.value(0, CurveField::PtaFutures), dec!(4844));
    }

    #[test]
    fn test_set_tags_computed_unless_designated() {
        let mut grid = CurveGrid::new(reference());
        grid.set(0, CurveField::Pxn, dec!(10));
        assert_eq!(
            grid.cell(0, CurveField::Pxn).unwrap().provenance,
            Provenance::Computed
        );

        grid.set_as(1, CurveField::Brent, dec!(66.1), Provenance::Observed);
        assert_eq!(
            grid.cell(1, CurveField::Brent).unwrap().provenance,
            Provenance::Observed
        );
    }

    #[test]
    fn test_reset_restores_spread_defaults_and_months() {
        let mut grid = CurveGrid::new(reference());
        grid.set_as(3, CurveField::MopjSpread, dec!(12.5), Provenance::Observed);
        grid.set_as(3, CurveField::Brent, dec!(66), Provenance::Observed);
        grid.reset();

        let spread = grid.cell(3, CurveField::MopjSpread).unwrap();
        assert_eq!(spread.value, Some(dec!(0.00)));
        assert!(spread.editable);
        assert_eq!(grid.cell(3, CurveField::Brent).unwrap().value, None);
        assert_eq!(grid.month(0), reference());
        assert_eq!(grid.month(11), ContractMonth::new(2026, 12).unwrap());
    }

    #[test]
    fn test_export_headers_and_blanks() {
        let mut grid = CurveGrid::new(reference());
        grid.set(0, CurveField::Px, dec!(830));
        let table = grid.to_table();

        assert_eq!(
            table.headers,
            vec![
                "Month",
                "BRENT",
                "MOPJ",
                "MOPJ SPREAD",
                "PX",
                "PX SPREAD",
                "PXN",
                "PX Futures",
                "PTA Futures",
                "PX-PTA SPREAD",
                "ZCEPX-SGXPX",
                "USD/CNH",
                "BOX"
            ]
        );
        assert_eq!(table.rows.len(), ROWS);
        assert_eq!(table.rows[0][0], "26-JAN");
        assert_eq!(table.rows[0][4], "830.00");
        // Brent never set: exports blank, not zero.
        assert_eq!(table.rows[0][1], "");
    }
}
