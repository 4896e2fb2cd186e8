use crate::types::{DemandItem, UnitItem};

/// Expands quantity-bearing demand into one unit item per requested copy,
/// preserving input order. Zero-quantity items contribute nothing.
pub fn expand_items(items: &[DemandItem]) -> Vec<UnitItem> {
    let mut units = Vec::with_capacity(items.iter().map(|d| d.quantity as usize).sum());
    for d in items {
        for _ in 0..d.quantity {
            units.push(UnitItem::from(d));
        }
    }
    units
}

/// Descending area; `sort_by` is stable so equal areas keep input order.
pub fn sort_by_area_desc(units: &mut [UnitItem]) {
    units.sort_by(|a, b| b.area().cmp(&a.area()));
}
