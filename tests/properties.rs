//! Layout guarantees checked through the public API.

use sheet_nester::geometry::Frame;
use sheet_nester::{
    Algorithm, AllocationResult, Allocator, DemandItem, Margins, SheetSpec, UnplacedReason,
    pack_multi_sheet,
};

const ALGORITHMS: [Algorithm; 4] = [
    Algorithm::BottomLeftFill,
    Algorithm::Shelf,
    Algorithm::MaxRects,
    Algorithm::Gang,
];

fn heterogeneous_demand() -> Vec<DemandItem> {
    vec![
        DemandItem::new("poster", 420, 594, 3).rotatable(true),
        DemandItem::new("flyer", 210, 297, 14).rotatable(true),
        DemandItem::new("card", 90, 50, 40).rotatable(true),
        DemandItem::new("banner", 1200, 300, 2),
        DemandItem::new("sticker", 75, 75, 25),
        DemandItem::new("wall", 2000, 2000, 1).rotatable(true),
    ]
}

fn assert_invariants(result: &AllocationResult, frame: &Frame, items: &[DemandItem]) {
    for sheet in &result.sheets {
        assert!(
            (0.0..=100.0).contains(&sheet.efficiency_percent),
            "sheet {} efficiency {}",
            sheet.index,
            sheet.efficiency_percent
        );
        let boxes: Vec<_> = sheet.placements.iter().map(|p| frame.occupied(p)).collect();
        for (i, p) in sheet.placements.iter().enumerate() {
            assert!(frame.working.contains(&boxes[i]));
            let upright = (p.actual_width, p.actual_height) == (p.item.width, p.item.height);
            let turned = (p.actual_width, p.actual_height) == (p.item.height, p.item.width);
            assert!(upright || (turned && p.item.can_rotate));
            for j in (i + 1)..boxes.len() {
                assert!(
                    !boxes[i].overlaps(&boxes[j]),
                    "sheet {}: {:?} overlaps {:?}",
                    sheet.index,
                    boxes[i],
                    boxes[j]
                );
            }
        }
    }
    for item in items {
        assert_eq!(
            result.placed_count(&item.id) + result.unplaced_count(&item.id),
            item.quantity,
            "{}",
            item.id
        );
    }
}

#[test]
fn single_item_quarter_of_sheet() {
    let result = pack_multi_sheet(
        &[DemandItem::new("a", 100, 100, 1)],
        SheetSpec::new(200, 200),
        0,
        Margins::default(),
        Algorithm::BottomLeftFill,
    )
    .unwrap();
    assert_eq!(result.sheet_count, 1);
    let p = &result.sheets[0].placements[0];
    assert_eq!((p.x, p.y), (0, 0));
    assert_eq!((p.actual_width, p.actual_height), (100, 100));
    assert!((result.sheets[0].efficiency_percent - 25.0).abs() < 1e-9);
}

#[test]
fn oversized_item_produces_no_sheets() {
    let result = pack_multi_sheet(
        &[DemandItem::new("a", 250, 250, 1).rotatable(true)],
        SheetSpec::new(200, 200),
        0,
        Margins::default(),
        Algorithm::BottomLeftFill,
    )
    .unwrap();
    assert_eq!(result.sheet_count, 0);
    assert_eq!(result.unplaced.len(), 1);
    assert_eq!(result.unplaced[0].reason, UnplacedReason::TooLarge);
    assert_eq!(result.unplaced[0].reason.to_string(), "too large for sheet");
}

#[test]
fn every_strategy_places_all_feasible_demand() {
    let sheet = SheetSpec::new(1300, 900);
    let margins = Margins::uniform(10);
    let bleed = 3;
    let frame = Frame::new(sheet, margins, bleed);
    let items = heterogeneous_demand();

    for algorithm in ALGORITHMS {
        let result = Allocator::new(sheet, bleed, margins, algorithm)
            .pack(&items)
            .unwrap();
        assert_invariants(&result, &frame, &items);
        assert_eq!(result.unplaced.len(), 1, "{algorithm}");
        assert_eq!(result.unplaced[0].id, "wall");
        assert_eq!(result.unplaced[0].reason, UnplacedReason::TooLarge);
        assert!(result.sheet_count >= 1);
        assert!((0.0..=100.0).contains(&result.efficiency_percent));
        let unused: u64 = result.sheets.iter().map(|s| s.unused_area).sum();
        assert_eq!(result.unused_area, unused);
    }
}

#[test]
fn identical_input_identical_layout() {
    let sheet = SheetSpec::new(1300, 900);
    let items = heterogeneous_demand();
    for algorithm in ALGORITHMS {
        let run = || {
            let result = pack_multi_sheet(&items, sheet, 2, Margins::uniform(5), algorithm).unwrap();
            serde_json::to_string(&result).unwrap()
        };
        assert_eq!(run(), run(), "{algorithm}");
    }
}

#[test]
fn rotation_never_used_when_forbidden() {
    let sheet = SheetSpec::new(300, 200);
    let items = vec![
        DemandItem::new("tall", 40, 150, 6),
        DemandItem::new("wide", 150, 40, 6),
    ];
    for algorithm in ALGORITHMS {
        let result = pack_multi_sheet(&items, sheet, 0, Margins::default(), algorithm).unwrap();
        assert!(
            result
                .sheets
                .iter()
                .flat_map(|s| &s.placements)
                .all(|p| p.rotation.degrees() == 0)
        );
        assert!(result.unplaced.is_empty());
    }
}

#[test]
fn json_output_shape() {
    let result = pack_multi_sheet(
        &[DemandItem::new("a", 50, 100, 1).rotatable(true)],
        SheetSpec::new(100, 50),
        0,
        Margins::default(),
        Algorithm::MaxRects,
    )
    .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    let placement = &value["sheets"][0]["placements"][0];
    assert_eq!(placement["id"], "a");
    assert_eq!(placement["rotation"], 90);
    assert_eq!(placement["actual_width"], 100);
    assert_eq!(value["sheets"][0]["index"], 1);
    assert_eq!(value["sheet_count"], 1);
}
