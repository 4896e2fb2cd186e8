use std::collections::HashMap;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::Frame;
use crate::metrics::aggregate;
use crate::sheet::pack_frame;
use crate::strategy::{Algorithm, GangOptions};
use crate::types::{
    AllocationResult, DemandItem, Margins, SheetResult, SheetSpec, UnitItem, UnplacedItem,
    UnplacedReason,
};

pub const DEFAULT_MAX_SHEETS: usize = 1000;

/// Spreads demand over as many identical sheets as it takes.
///
/// Holds configuration only; each call to [`Allocator::pack`] works on its
/// own remaining-quantity table.
#[derive(Debug, Clone)]
pub struct Allocator {
    frame: Frame,
    algorithm: Algorithm,
    gang: Option<GangOptions>,
    max_sheets: usize,
    cancel: CancelToken,
}

/// One demand line and how many of its copies still need a sheet.
struct Pending {
    item: DemandItem,
    remaining: u32,
}

impl Allocator {
    pub fn new(sheet: SheetSpec, bleed: u32, margins: Margins, algorithm: Algorithm) -> Self {
        Self {
            frame: Frame::new(sheet, margins, bleed),
            algorithm,
            gang: None,
            max_sheets: DEFAULT_MAX_SHEETS,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_gang_options(mut self, gang: GangOptions) -> Self {
        self.gang = Some(gang);
        self
    }

    pub fn with_max_sheets(mut self, max_sheets: usize) -> Self {
        self.max_sheets = max_sheets;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn pack(&self, items: &[DemandItem]) -> Result<AllocationResult> {
        let mut unplaced = Vec::new();
        let mut pending = self.screen(items, &mut unplaced);

        let mut sheets: Vec<SheetResult> = Vec::new();
        let mut iteration_limit_reached = false;

        loop {
            let candidates: Vec<DemandItem> = pending
                .iter()
                .filter(|p| p.remaining > 0)
                .map(|p| DemandItem {
                    quantity: p.remaining,
                    ..p.item.clone()
                })
                .collect();
            if candidates.is_empty() {
                break;
            }

            if sheets.len() >= self.max_sheets {
                tracing::warn!(
                    max_sheets = self.max_sheets,
                    remaining = candidates.iter().map(|c| c.quantity).sum::<u32>(),
                    "sheet limit reached before all demand was placed"
                );
                iteration_limit_reached = true;
                drain(&mut pending, UnplacedReason::IterationLimit, &mut unplaced);
                break;
            }

            let sheet = pack_frame(
                &candidates,
                &self.frame,
                self.algorithm,
                self.gang.as_ref(),
                &self.cancel,
                sheets.len() + 1,
            )?;

            if sheet.placements.is_empty() {
                tracing::warn!(
                    sheet = sheets.len() + 1,
                    "pass placed nothing, giving up on remaining demand"
                );
                drain(&mut pending, UnplacedReason::NoProgress, &mut unplaced);
                break;
            }

            // Ids may repeat across demand lines, so credit by the full unit.
            let mut placed: HashMap<&UnitItem, u32> = HashMap::new();
            for p in &sheet.placements {
                *placed.entry(&p.item).or_default() += 1;
            }
            for entry in pending.iter_mut() {
                let unit = UnitItem::from(&entry.item);
                if let Some(count) = placed.get_mut(&unit) {
                    let taken = (*count).min(entry.remaining);
                    entry.remaining -= taken;
                    *count -= taken;
                }
            }

            tracing::debug!(
                sheet = sheet.index,
                placed = sheet.placements.len(),
                efficiency = sheet.efficiency_percent,
                "sheet packed"
            );
            sheets.push(sheet);
        }

        let (efficiency_percent, unused_area) = aggregate(&sheets, self.frame.working_area());
        tracing::info!(
            algorithm = %self.algorithm,
            sheets = sheets.len(),
            unplaced = unplaced.len(),
            efficiency = efficiency_percent,
            "allocation finished"
        );

        Ok(AllocationResult {
            sheet_count: sheets.len(),
            sheets,
            unplaced,
            efficiency_percent,
            unused_area,
            iteration_limit_reached,
        })
    }

    /// Rejects items no sheet could ever take, before any packing.
    fn screen(&self, items: &[DemandItem], unplaced: &mut Vec<UnplacedItem>) -> Vec<Pending> {
        let mut pending = Vec::with_capacity(items.len());
        for item in items.iter().filter(|d| d.quantity > 0) {
            let reason = if !item.has_valid_geometry() {
                Some(UnplacedReason::InvalidGeometry)
            } else if !self.frame.can_ever_fit(&UnitItem::from(item)) {
                Some(UnplacedReason::TooLarge)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    tracing::debug!(id = %item.id, %reason, "item rejected before packing");
                    unplaced.push(unplaced_item(item, item.quantity, reason));
                }
                None => pending.push(Pending {
                    item: item.clone(),
                    remaining: item.quantity,
                }),
            }
        }
        pending
    }
}

fn unplaced_item(item: &DemandItem, remaining: u32, reason: UnplacedReason) -> UnplacedItem {
    UnplacedItem {
        id: item.id.clone(),
        remaining_quantity: remaining,
        reason,
        width: item.width,
        height: item.height,
    }
}

fn drain(pending: &mut [Pending], reason: UnplacedReason, unplaced: &mut Vec<UnplacedItem>) {
    for entry in pending.iter_mut().filter(|p| p.remaining > 0) {
        unplaced.push(unplaced_item(&entry.item, entry.remaining, reason));
        entry.remaining = 0;
    }
}

/// Packs all demand onto as many sheets as needed with default limits.
pub fn pack_multi_sheet(
    items: &[DemandItem],
    sheet: SheetSpec,
    bleed: u32,
    margins: Margins,
    algorithm: Algorithm,
) -> Result<AllocationResult> {
    Allocator::new(sheet, bleed, margins, algorithm).pack(items)
}
