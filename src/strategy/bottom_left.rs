use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::{Frame, Rect, orientations};
use crate::strategy::PlacementStrategy;
use crate::types::{Placement, UnitItem};

/// Bottom-left fill: every unit goes to the first free anchor found by
/// scanning rows bottom to top and, within a row, left to right.
///
/// The result is the same as a unit-step scan over every integer anchor.
/// Anchors covered by an already placed box are skipped in one jump: in x
/// past the first blocking box, in y past the lowest box top blocking the
/// whole row.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomLeftFill;

impl PlacementStrategy for BottomLeftFill {
    fn place(
        &self,
        units: &[UnitItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>> {
        let mut occupied: Vec<Rect> = Vec::new();
        let mut placements = Vec::new();

        for unit in units {
            cancel.check()?;
            match find_anchor(unit, frame, &occupied, cancel)? {
                Some(p) => {
                    occupied.push(frame.occupied(&p));
                    placements.push(p);
                }
                None => tracing::debug!(id = %unit.id, "unit could not be placed on the sheet"),
            }
        }

        Ok(placements)
    }
}

fn find_anchor(
    unit: &UnitItem,
    frame: &Frame,
    occupied: &[Rect],
    cancel: &CancelToken,
) -> Result<Option<Placement>> {
    let area = frame.working;

    for o in orientations(unit) {
        let (w, h) = frame.inflate(o);
        if !area.fits(w, h) {
            continue;
        }
        let max_x = area.right() - w;
        let max_y = area.top() - h;

        let mut y = area.y;
        while y <= max_y {
            cancel.check()?;

            let mut x = area.x;
            while x <= max_x {
                let candidate = Rect::new(x, y, w, h);
                match occupied.iter().find(|b| b.overlaps(&candidate)) {
                    None => return Ok(Some(frame.place(unit, o, x, y))),
                    Some(b) => x = b.right(),
                }
            }

            // Row is blocked. Rows below the lowest top of the boxes crossing
            // this band are blocked by the same boxes.
            y = occupied
                .iter()
                .filter(|b| b.y < y + h && b.top() > y)
                .map(|b| b.top())
                .min()
                .unwrap_or(y + 1);
        }
    }

    Ok(None)
}
