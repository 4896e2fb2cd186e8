//! Efficiency and unused-area accounting.
//!
//! Only nominal footprints count as used; bleed is treated as waste.

use crate::types::{Placement, SheetResult};

pub fn used_area(placements: &[Placement]) -> u64 {
    placements.iter().map(|p| p.area()).sum()
}

/// `100 * used / working`, or 0 for an empty working area.
pub fn efficiency_percent(used: u64, working_area: u64) -> f64 {
    if working_area == 0 {
        return 0.0;
    }
    used as f64 / working_area as f64 * 100.0
}

/// `(efficiency_percent, unused_area)` for one sheet.
pub fn sheet_metrics(placements: &[Placement], working_area: u64) -> (f64, u64) {
    let used = used_area(placements);
    (
        efficiency_percent(used, working_area),
        working_area.saturating_sub(used),
    )
}

/// `(efficiency_percent, unused_area)` across all sheets of an allocation.
///
/// The combined working area can exceed `u64`, so the ratio is taken in
/// `f64` and unused area saturates.
pub fn aggregate(sheets: &[SheetResult], working_area: u64) -> (f64, u64) {
    let total = working_area as f64 * sheets.len() as f64;
    let efficiency = if total == 0.0 {
        0.0
    } else {
        let used: f64 = sheets.iter().map(|s| used_area(&s.placements) as f64).sum();
        used / total * 100.0
    };
    let unused = sheets
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.unused_area));
    (efficiency, unused)
}
