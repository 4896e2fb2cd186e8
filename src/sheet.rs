//! Single-sheet packing.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::Frame;
use crate::metrics::sheet_metrics;
use crate::strategy::{Algorithm, GangOptions, strategy_for};
use crate::types::{DemandItem, Margins, SheetResult, SheetSpec};

/// Packs as much of `items` as fits onto one sheet.
///
/// Items with zero width or height are skipped. Efficiency counts nominal
/// footprints over the working area; bleed is waste.
pub fn pack_sheet(
    items: &[DemandItem],
    sheet: SheetSpec,
    bleed: u32,
    margins: Margins,
    algorithm: Algorithm,
    gang: Option<&GangOptions>,
) -> Result<SheetResult> {
    pack_sheet_with_cancel(items, sheet, bleed, margins, algorithm, gang, &CancelToken::new())
}

/// [`pack_sheet`] that stops with [`crate::Error::Cancelled`] or
/// [`crate::Error::DeadlineExceeded`] once `cancel` fires.
pub fn pack_sheet_with_cancel(
    items: &[DemandItem],
    sheet: SheetSpec,
    bleed: u32,
    margins: Margins,
    algorithm: Algorithm,
    gang: Option<&GangOptions>,
    cancel: &CancelToken,
) -> Result<SheetResult> {
    let frame = Frame::new(sheet, margins, bleed);
    pack_frame(items, &frame, algorithm, gang, cancel, 1)
}

pub(crate) fn pack_frame(
    items: &[DemandItem],
    frame: &Frame,
    algorithm: Algorithm,
    gang: Option<&GangOptions>,
    cancel: &CancelToken,
    index: usize,
) -> Result<SheetResult> {
    let valid: Vec<DemandItem> = items
        .iter()
        .filter(|d| {
            let ok = d.has_valid_geometry();
            if !ok {
                tracing::warn!(id = %d.id, width = d.width, height = d.height, "skipping item with empty footprint");
            }
            ok
        })
        .cloned()
        .collect();

    let placements = strategy_for(algorithm, gang).pack(&valid, frame, cancel)?;
    let (efficiency_percent, unused_area) = sheet_metrics(&placements, frame.working_area());

    Ok(SheetResult {
        index,
        sheet: frame.sheet,
        placements,
        efficiency_percent,
        unused_area,
    })
}
