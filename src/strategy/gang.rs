//! Gang runs: interleave demand groups so one group cannot monopolize a
//! sheet when only part of the total demand fits.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::Frame;
use crate::strategy::{BaseStrategy, PlacementStrategy};
use crate::types::{Placement, UnitItem};

/// Caller-supplied unit ordering; may capture state.
pub type UnitOrder = Arc<dyn Fn(&UnitItem, &UnitItem) -> Ordering + Send + Sync>;
/// Caller-supplied grouping key; may capture state such as a customer table.
pub type GroupKey = Arc<dyn Fn(&UnitItem) -> String + Send + Sync>;

pub fn by_area_desc(a: &UnitItem, b: &UnitItem) -> Ordering {
    b.area().cmp(&a.area())
}

pub fn by_height_desc(a: &UnitItem, b: &UnitItem) -> Ordering {
    b.height.cmp(&a.height)
}

pub fn input_order(_: &UnitItem, _: &UnitItem) -> Ordering {
    Ordering::Equal
}

pub fn group_by_id(u: &UnitItem) -> String {
    u.id.clone()
}

/// Groups by the item's `group` label, falling back to its id.
pub fn group_by_group(u: &UnitItem) -> String {
    u.group.clone().unwrap_or_else(|| u.id.clone())
}

#[derive(Clone)]
pub struct GangOptions {
    pub base: BaseStrategy,
    pub order: UnitOrder,
    pub group_key: GroupKey,
}

impl Default for GangOptions {
    fn default() -> Self {
        Self {
            base: BaseStrategy::BottomLeftFill,
            order: Arc::new(by_area_desc),
            group_key: Arc::new(group_by_id),
        }
    }
}

impl GangOptions {
    pub fn with_base(mut self, base: BaseStrategy) -> Self {
        self.base = base;
        self
    }

    pub fn with_order(
        mut self,
        order: impl Fn(&UnitItem, &UnitItem) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.order = Arc::new(order);
        self
    }

    pub fn with_group_key(
        mut self,
        key: impl Fn(&UnitItem) -> String + Send + Sync + 'static,
    ) -> Self {
        self.group_key = Arc::new(key);
        self
    }
}

impl std::fmt::Debug for GangOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GangOptions")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Contributes ordering only; placement is delegated to the base strategy.
#[derive(Debug, Clone, Default)]
pub struct Gang {
    options: GangOptions,
}

impl Gang {
    pub fn new(options: GangOptions) -> Self {
        Self { options }
    }
}

impl PlacementStrategy for Gang {
    fn arrange(&self, mut units: Vec<UnitItem>) -> Vec<UnitItem> {
        units.sort_by(|a, b| (self.options.order)(a, b));
        interleave(units, self.options.group_key.as_ref())
    }

    fn place(
        &self,
        units: &[UnitItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>> {
        self.options.base.strategy().place(units, frame, cancel)
    }
}

/// Round-robin draw, one unit per group per round. Groups take turns in the
/// order they first appear; each keeps its internal order.
pub fn interleave(units: Vec<UnitItem>, key: &dyn Fn(&UnitItem) -> String) -> Vec<UnitItem> {
    let total = units.len();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<VecDeque<UnitItem>> = Vec::new();

    for unit in units {
        let slot = *slots.entry(key(&unit)).or_insert_with(|| {
            groups.push(VecDeque::new());
            groups.len() - 1
        });
        groups[slot].push_back(unit);
    }

    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for group in groups.iter_mut() {
            if let Some(unit) = group.pop_front() {
                out.push(unit);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand_items;
    use crate::strategy::test_support::assert_layout_valid;
    use crate::types::{DemandItem, Margins, SheetSpec};

    fn ids(units: &[UnitItem]) -> Vec<&str> {
        units.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_interleave_round_robin() {
        let units = expand_items(&[
            DemandItem::new("a", 10, 10, 3),
            DemandItem::new("b", 10, 10, 1),
            DemandItem::new("c", 10, 10, 2),
        ]);
        let out = interleave(units, &group_by_id);
        assert_eq!(ids(&out), vec!["a", "b", "c", "a", "c", "a"]);
    }

    #[test]
    fn test_arrange_sorts_before_grouping() {
        let gang = Gang::default();
        let out = gang.arrange(expand_items(&[
            DemandItem::new("small", 5, 5, 2),
            DemandItem::new("big", 20, 20, 2),
        ]));
        assert_eq!(ids(&out), vec!["big", "small", "big", "small"]);
    }

    #[test]
    fn test_group_by_customer() {
        let gang = Gang::new(
            GangOptions::default()
                .with_order(input_order)
                .with_group_key(group_by_group),
        );
        let out = gang.arrange(expand_items(&[
            DemandItem::new("a1", 10, 10, 2).in_group("acme"),
            DemandItem::new("a2", 10, 10, 1).in_group("acme"),
            DemandItem::new("z", 10, 10, 2).in_group("zenith"),
        ]));
        assert_eq!(ids(&out), vec!["a1", "z", "a1", "z", "a2"]);
    }

    #[test]
    fn test_shares_sheet_between_groups() {
        // Room for two 50x100 units: a plain area sort would give both to "a".
        let frame = Frame::new(SheetSpec::new(100, 100), Margins::default(), 0);
        let items = [
            DemandItem::new("a", 50, 100, 4),
            DemandItem::new("b", 50, 100, 4),
        ];
        for base in [BaseStrategy::BottomLeftFill, BaseStrategy::Shelf, BaseStrategy::MaxRects] {
            let gang = Gang::new(GangOptions::default().with_base(base));
            let placements = gang.pack(&items, &frame, &CancelToken::new()).unwrap();
            let mut placed: Vec<&str> = placements.iter().map(|p| p.item.id.as_str()).collect();
            placed.sort();
            assert_eq!(placed, vec!["a", "b"], "base {base:?}");
            assert_layout_valid(&frame, &placements);
        }
    }

    #[test]
    fn test_group_key_from_lookup_table() {
        let customers: HashMap<String, String> = [
            ("flyer".to_string(), "acme".to_string()),
            ("card".to_string(), "acme".to_string()),
            ("poster".to_string(), "zenith".to_string()),
        ]
        .into_iter()
        .collect();
        let gang = Gang::new(
            GangOptions::default()
                .with_order(input_order)
                .with_group_key(move |u| {
                    customers.get(&u.id).cloned().unwrap_or_else(|| u.id.clone())
                }),
        );
        let out = gang.arrange(expand_items(&[
            DemandItem::new("flyer", 10, 10, 2),
            DemandItem::new("card", 10, 10, 1),
            DemandItem::new("poster", 10, 10, 2),
        ]));
        assert_eq!(ids(&out), vec!["flyer", "poster", "flyer", "poster", "card"]);
    }

    #[test]
    fn test_capturing_order() {
        let priority = vec!["late".to_string(), "early".to_string()];
        let gang = Gang::new(GangOptions::default().with_order(move |a, b| {
            let rank = |u: &UnitItem| priority.iter().position(|p| *p == u.id);
            rank(a).cmp(&rank(b))
        }));
        let out = gang.arrange(expand_items(&[
            DemandItem::new("early", 10, 10, 1),
            DemandItem::new("late", 10, 10, 1),
        ]));
        assert_eq!(ids(&out), vec!["late", "early"]);
    }
}
