//! Interchangeable single-sheet placement heuristics.

pub mod bottom_left;
pub mod gang;
pub mod max_rects;
pub mod shelf;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::expand::{expand_items, sort_by_area_desc};
use crate::geometry::Frame;
use crate::types::{DemandItem, Placement, UnitItem};

pub use bottom_left::BottomLeftFill;
pub use gang::{Gang, GangOptions};
pub use max_rects::MaxRects;
pub use shelf::Shelf;

/// A heuristic that lays unit items onto one sheet.
///
/// Units that fit nowhere are dropped silently; callers detect the shortfall
/// by counting placements.
pub trait PlacementStrategy {
    /// Orders the expanded units before placement. Descending area by default.
    fn arrange(&self, mut units: Vec<UnitItem>) -> Vec<UnitItem> {
        sort_by_area_desc(&mut units);
        units
    }

    /// Places units in exactly the given order.
    fn place(
        &self,
        units: &[UnitItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>>;

    fn pack(
        &self,
        items: &[DemandItem],
        frame: &Frame,
        cancel: &CancelToken,
    ) -> Result<Vec<Placement>> {
        let units = self.arrange(expand_items(items));
        self.place(&units, frame, cancel)
    }
}

/// Strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    #[default]
    BottomLeftFill,
    Shelf,
    MaxRects,
    Gang,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BottomLeftFill => "bottom-left-fill",
            Algorithm::Shelf => "shelf",
            Algorithm::MaxRects => "max-rects",
            Algorithm::Gang => "gang",
        }
    }

    /// Parses a selector, falling back to BottomLeftFill for anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(name, "unknown algorithm, using bottom-left-fill");
            Algorithm::BottomLeftFill
        })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bottomleftfill" | "bottomleft" | "blf" => Ok(Algorithm::BottomLeftFill),
            "shelf" => Ok(Algorithm::Shelf),
            "maxrects" => Ok(Algorithm::MaxRects),
            "gang" => Ok(Algorithm::Gang),
            _ => Err(format!(
                "invalid algorithm '{}', expected: bottom-left-fill, shelf, max-rects, or gang",
                s
            )),
        }
    }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self {
        Algorithm::from_name(&s)
    }
}

impl From<Algorithm> for String {
    fn from(a: Algorithm) -> Self {
        a.name().to_string()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Strategies a gang run can delegate placement to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseStrategy {
    #[default]
    BottomLeftFill,
    Shelf,
    MaxRects,
}

impl BaseStrategy {
    pub fn strategy(self) -> &'static dyn PlacementStrategy {
        match self {
            BaseStrategy::BottomLeftFill => &BottomLeftFill,
            BaseStrategy::Shelf => &Shelf,
            BaseStrategy::MaxRects => &MaxRects,
        }
    }
}

impl std::str::FromStr for BaseStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<Algorithm>()? {
            Algorithm::BottomLeftFill => Ok(BaseStrategy::BottomLeftFill),
            Algorithm::Shelf => Ok(BaseStrategy::Shelf),
            Algorithm::MaxRects => Ok(BaseStrategy::MaxRects),
            Algorithm::Gang => Err("gang cannot delegate to itself".to_string()),
        }
    }
}

/// Resolves a selector to its strategy. `gang` is only consulted for
/// [`Algorithm::Gang`]; `None` means default gang options.
pub fn strategy_for(
    algorithm: Algorithm,
    gang: Option<&GangOptions>,
) -> Box<dyn PlacementStrategy> {
    match algorithm {
        Algorithm::BottomLeftFill => Box::new(BottomLeftFill),
        Algorithm::Shelf => Box::new(Shelf),
        Algorithm::MaxRects => Box::new(MaxRects),
        Algorithm::Gang => Box::new(Gang::new(gang.cloned().unwrap_or_default())),
    }
}
