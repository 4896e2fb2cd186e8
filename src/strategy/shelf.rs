use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::{Frame, orientations};
use crate::strategy::PlacementStrategy;
use crate::types::{Placement, UnitItem};

/// Shelf packing: units fill horizontal shelves left to right; a unit that
/// overruns the right edge opens a new shelf on top of the tallest unit of
/// the current one. Linear after sorting, looser than the other strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shelf;

impl PlacementStrategy for Shelf {
    fn arrange(&self, mut units: Vec<UnitItem>) -> Vec<UnitItem> {
        units.sort_by(|a, b| b.height.cmp(&a.height));
        units
    }

    fn place(
        &self,
        units: &[UnitItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>> {
        let area = frame.working;
        let mut shelf_y = area.y;
        let mut shelf_height = 0;
        let mut cursor_x = area.x;
        let mut placements = Vec::new();

        for unit in units {
            cancel.check()?;
            let mut placed = None;

            for o in orientations(unit) {
                let (w, h) = frame.inflate(o);
                // An orientation that cannot fit an empty sheet must not open a shelf.
                if !area.fits(w, h) {
                    continue;
                }
                if cursor_x + w > area.right() {
                    shelf_y += shelf_height;
                    cursor_x = area.x;
                    shelf_height = 0;
                }
                if shelf_y + h > area.top() {
                    continue;
                }
                placed = Some(frame.place(unit, o, cursor_x, shelf_y));
                cursor_x += w;
                shelf_height = shelf_height.max(h);
                break;
            }

            match placed {
                Some(p) => placements.push(p),
                None => tracing::debug!(id = %unit.id, "unit could not be placed on a shelf"),
            }
        }

        Ok(placements)
    }
}
