use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::geometry::{Frame, Orientation, Rect, orientations};
use crate::strategy::PlacementStrategy;
use crate::types::{Placement, UnitItem};

/// MaxRects with best-area-fit scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRects;

impl PlacementStrategy for MaxRects {
    fn place(
        &self,
        units: &[UnitItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>> {
        let mut bin = FreeRegions::new(frame.working);
        let mut placements = Vec::new();

        for unit in units {
            cancel.check()?;
            match bin.find_best(unit, frame) {
                Some(scored) => placements.push(bin.commit(scored, unit, frame)?),
                None => tracing::debug!(id = %unit.id, "no free region fits unit"),
            }
        }

        Ok(placements)
    }
}

/// Live set of maximal free regions. No region is contained in another.
#[derive(Debug, Clone)]
pub struct FreeRegions {
    pub free: Vec<Rect>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub orientation: Orientation,
    /// Leftover area, then leftover short side.
    pub score: (u64, u64),
}

impl FreeRegions {
    pub fn new(working: Rect) -> Self {
        let free = if working.area() > 0 {
            vec![working]
        } else {
            Vec::new()
        };
        Self { free }
    }

    /// Best-area-fit over every (region, orientation) pair. Ties go to the
    /// earliest region, then the unrotated orientation.
    pub fn find_best(&self, unit: &UnitItem, frame: &Frame) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free.iter().enumerate() {
            for o in orientations(unit) {
                let (w, h) = frame.inflate(o);
                if !free.fits(w, h) {
                    continue;
                }
                let leftover = free.area() - w as u64 * h as u64;
                let short_side = std::cmp::min(free.w - w, free.h - h) as u64;
                let score = (leftover, short_side);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        orientation: o,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Places the unit in the bottom-left corner of the chosen region and
    /// carves the used box out of every region it touches.
    pub fn commit(
        &mut self,
        scored: ScoredPlacement,
        unit: &UnitItem,
        frame: &Frame,
    ) -> Result<Placement> {
        let region = *self.free.get(scored.free_idx).ok_or_else(|| {
            Error::Internal(format!(
                "free region {} out of range ({} regions)",
                scored.free_idx,
                self.free.len()
            ))
        })?;
        let (w, h) = frame.inflate(scored.orientation);
        let used = Rect::new(region.x, region.y, w, h);
        if !region.contains(&used) {
            return Err(Error::Internal(format!(
                "box {used:?} does not fit chosen region {region:?}"
            )));
        }

        self.split(used);
        self.prune();

        Ok(frame.place(unit, scored.orientation, region.x, region.y))
    }

    fn split(&mut self, used: Rect) {
        let mut next = Vec::with_capacity(self.free.len() + 4);
        for free in self.free.drain(..) {
            if !free.overlaps(&used) {
                next.push(free);
                continue;
            }
            // Left
            if used.x > free.x {
                next.push(Rect::new(free.x, free.y, used.x - free.x, free.h));
            }
            // Right
            if used.right() < free.right() {
                next.push(Rect::new(
                    used.right(),
                    free.y,
                    free.right() - used.right(),
                    free.h,
                ));
            }
            // Bottom
            if used.y > free.y {
                next.push(Rect::new(free.x, free.y, free.w, used.y - free.y));
            }
            // Top
            if used.top() < free.top() {
                next.push(Rect::new(free.x, used.top(), free.w, free.top() - used.top()));
            }
        }
        self.free = next;
    }

    fn prune(&mut self) {
        let n = self.free.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && keep[j] && self.free[j].contains(&self.free[i]) {
                    keep[i] = false;
                    break;
                }
            }
        }
        let mut keep = keep.into_iter();
        self.free.retain(|_| keep.next().unwrap_or(true));
    }
}
