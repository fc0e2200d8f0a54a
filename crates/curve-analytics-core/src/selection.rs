use std::collections::BTreeSet;

use crate::config::SelectionConfig;
use crate::types::ContractMonth;

/// Which delivery months are actively reported, given a reference month.
///
/// A month is included if its calendar month number is one of the primary
/// contract months, or if it falls within the near horizon immediately after
/// the reference. Scanning past twelve offsets can revisit a calendar month
/// in the following year, so results are deduplicated by (year, month) and
/// returned ascending.
pub fn active_months(reference: ContractMonth, config: &SelectionConfig) -> Vec<ContractMonth> {
    let mut selected = BTreeSet::new();
    for offset in 0..config.scan_horizon {
        let candidate = reference.plus_months(offset);
        let is_primary = config.primary_months.contains(&candidate.month);
        let is_near = offset <= config.near_horizon;
        if is_primary || is_near {
            selected.insert(candidate);
        }
    }
    selected.into_iter().collect()
}
