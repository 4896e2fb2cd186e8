use serde::{Deserialize, Serialize};

/// N copies of one rectangular print job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandItem {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub quantity: u32,
    #[serde(default)]
    pub can_rotate: bool,
    /// Gang grouping label (customer, order batch, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl DemandItem {
    pub fn new(id: impl Into<String>, width: u32, height: u32, quantity: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            quantity,
            can_rotate: false,
            group: None,
        }
    }

    pub fn rotatable(mut self, can_rotate: bool) -> Self {
        self.can_rotate = can_rotate;
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn has_valid_geometry(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A single copy of a demand item, the atomic placement unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitItem {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub can_rotate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl UnitItem {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<&DemandItem> for UnitItem {
    fn from(item: &DemandItem) -> Self {
        Self {
            id: item.id.clone(),
            width: item.width,
            height: item.height,
            can_rotate: item.can_rotate,
            group: item.group.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    None,
    Quarter,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        match deg {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            _ => Err(format!("unsupported rotation {deg}, expected 0 or 90")),
        }
    }
}

/// A unit item positioned on a sheet.
///
/// `x`/`y` are the bottom-left corner of the nominal footprint (bleed
/// excluded) in sheet coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    #[serde(flatten)]
    pub item: UnitItem,
    pub x: u32,
    pub y: u32,
    pub rotation: Rotation,
    pub actual_width: u32,
    pub actual_height: u32,
}

impl Placement {
    pub fn area(&self) -> u64 {
        self.actual_width as u64 * self.actual_height as u64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Margins {
    pub fn uniform(m: u32) -> Self {
        Self {
            top: m,
            bottom: m,
            left: m,
            right: m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub width: u32,
    pub height: u32,
}

impl SheetSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for SheetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetResult {
    /// 1-based sheet number.
    pub index: usize,
    pub sheet: SheetSpec,
    pub placements: Vec<Placement>,
    pub efficiency_percent: f64,
    pub unused_area: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// Does not fit an empty sheet in any allowed orientation.
    TooLarge,
    /// A whole pass placed nothing while demand remained.
    ///
    /// Screening already rejects every unit that cannot fit an empty sheet,
    /// and each strategy places at least one such unit, so this only fires
    /// if a strategy breaks that guarantee. It stops the allocator from
    /// opening empty sheets forever.
    NoProgress,
    /// The sheet ceiling was hit with demand remaining.
    IterationLimit,
    /// Zero width or height.
    InvalidGeometry,
}

impl std::fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            UnplacedReason::TooLarge => "too large for sheet",
            UnplacedReason::NoProgress => "no fit on sheet with remaining items",
            UnplacedReason::IterationLimit => "sheet limit reached with items remaining",
            UnplacedReason::InvalidGeometry => "invalid item geometry",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnplacedItem {
    pub id: String,
    pub remaining_quantity: u32,
    pub reason: UnplacedReason,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub sheets: Vec<SheetResult>,
    pub sheet_count: usize,
    pub unplaced: Vec<UnplacedItem>,
    pub efficiency_percent: f64,
    pub unused_area: u64,
    /// Set when the sheet ceiling stopped packing before demand ran out.
    pub iteration_limit_reached: bool,
}

impl AllocationResult {
    pub fn placed_count(&self, id: &str) -> u32 {
        self.sheets
            .iter()
            .flat_map(|s| &s.placements)
            .filter(|p| p.item.id == id)
            .count() as u32
    }

    pub fn unplaced_count(&self, id: &str) -> u32 {
        self.unplaced
            .iter()
            .filter(|u| u.id == id)
            .map(|u| u.remaining_quantity)
            .sum()
    }

    pub fn total_placed(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }
}
