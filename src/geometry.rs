//! Axis-aligned box arithmetic shared by the strategies.

use crate::types::{Margins, Placement, Rotation, SheetSpec, UnitItem};

/// Axis-aligned box in sheet coordinates (origin at the bottom-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn top(&self) -> u32 {
        self.y + self.h
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }

    pub fn fits(&self, w: u32, h: u32) -> bool {
        w <= self.w && h <= self.h
    }
}

/// One way of laying an item down: nominal footprint plus the rotation that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
}

/// Unrotated first; the quarter turn only when the item allows it.
pub fn orientations(item: &UnitItem) -> Vec<Orientation> {
    let upright = Orientation {
        width: item.width,
        height: item.height,
        rotation: Rotation::None,
    };
    if !item.can_rotate {
        return vec![upright];
    }
    vec![
        upright,
        Orientation {
            width: item.height,
            height: item.width,
            rotation: Rotation::Quarter,
        },
    ]
}

/// A sheet together with its margins and bleed: everything a strategy needs
/// to know about where items may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub sheet: SheetSpec,
    pub margins: Margins,
    pub bleed: u32,
    /// Placeable region inside the margins.
    pub working: Rect,
}

impl Frame {
    pub fn new(sheet: SheetSpec, margins: Margins, bleed: u32) -> Self {
        let w = sheet
            .width
            .saturating_sub(margins.left)
            .saturating_sub(margins.right);
        let h = sheet
            .height
            .saturating_sub(margins.bottom)
            .saturating_sub(margins.top);
        Self {
            sheet,
            margins,
            bleed,
            working: Rect::new(margins.left, margins.bottom, w, h),
        }
    }

    pub fn working_area(&self) -> u64 {
        self.working.area()
    }

    /// Footprint grown by bleed on every side.
    pub fn inflate(&self, o: Orientation) -> (u32, u32) {
        let pad = self.bleed.saturating_mul(2);
        (o.width.saturating_add(pad), o.height.saturating_add(pad))
    }

    pub fn fits_empty(&self, o: Orientation) -> bool {
        let (w, h) = self.inflate(o);
        self.working.fits(w, h)
    }

    /// Whether the item fits an empty sheet in any allowed orientation.
    pub fn can_ever_fit(&self, item: &UnitItem) -> bool {
        orientations(item).into_iter().any(|o| self.fits_empty(o))
    }

    /// Builds the placement whose inflated box has its bottom-left corner at
    /// `(box_x, box_y)`.
    pub fn place(&self, item: &UnitItem, o: Orientation, box_x: u32, box_y: u32) -> Placement {
        Placement {
            item: item.clone(),
            x: box_x + self.bleed,
            y: box_y + self.bleed,
            rotation: o.rotation,
            actual_width: o.width,
            actual_height: o.height,
        }
    }

    /// Bleed-inflated box of a placement, used for overlap testing.
    pub fn occupied(&self, p: &Placement) -> Rect {
        Rect::new(
            p.x - self.bleed,
            p.y - self.bleed,
            p.actual_width + 2 * self.bleed,
            p.actual_height + 2 * self.bleed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DemandItem;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(5, 5, 10, 10)));
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        assert!(!a.overlaps(&Rect::new(20, 20, 1, 1)));
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains(&Rect::new(10, 10, 90, 90)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Rect::new(10, 10, 91, 10)));
    }

    #[test]
    fn test_orientations() {
        let fixed = UnitItem::from(&DemandItem::new("a", 30, 10, 1));
        let os = orientations(&fixed);
        assert_eq!(os.len(), 1);
        assert_eq!((os[0].width, os[0].height), (30, 10));

        let free = UnitItem::from(&DemandItem::new("a", 30, 10, 1).rotatable(true));
        let os = orientations(&free);
        assert_eq!(os.len(), 2);
        assert_eq!(os[0].rotation, Rotation::None);
        assert_eq!((os[1].width, os[1].height), (10, 30));
        assert_eq!(os[1].rotation, Rotation::Quarter);
    }

    #[test]
    fn test_frame_working_area() {
        let margins = Margins {
            top: 5,
            bottom: 10,
            left: 20,
            right: 0,
        };
        let frame = Frame::new(SheetSpec::new(100, 50), margins, 0);
        assert_eq!(frame.working, Rect::new(20, 10, 80, 35));
        assert_eq!(frame.working_area(), 80 * 35);
    }

    #[test]
    fn test_margins_larger_than_sheet() {
        let frame = Frame::new(SheetSpec::new(10, 10), Margins::uniform(6), 0);
        assert_eq!(frame.working_area(), 0);
        let item = UnitItem::from(&DemandItem::new("a", 1, 1, 1));
        assert!(!frame.can_ever_fit(&item));
    }

    #[test]
    fn test_bleed_inflation() {
        let frame = Frame::new(SheetSpec::new(100, 100), Margins::default(), 3);
        let item = UnitItem::from(&DemandItem::new("a", 94, 50, 1));
        let o = orientations(&item)[0];
        assert_eq!(frame.inflate(o), (100, 56));
        assert!(frame.fits_empty(o));

        let wide = UnitItem::from(&DemandItem::new("b", 95, 50, 1));
        assert!(!frame.can_ever_fit(&wide));
    }

    #[test]
    fn test_place_and_occupied_round_trip() {
        let frame = Frame::new(SheetSpec::new(100, 100), Margins::default(), 2);
        let item = UnitItem::from(&DemandItem::new("a", 10, 20, 1));
        let p = frame.place(&item, orientations(&item)[0], 4, 6);
        assert_eq!((p.x, p.y), (6, 8));
        assert_eq!(frame.occupied(&p), Rect::new(4, 6, 14, 24));
    }
}
