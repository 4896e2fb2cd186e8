//! JSON job files.
//!
//! ```json
//! {
//!   "sheet": { "width": 1300, "height": 900 },
//!   "items": [{ "id": "order-17", "width": 210, "height": 297, "quantity": 40, "can_rotate": true }],
//!   "bleed": 3,
//!   "margins": { "top": 10, "bottom": 10, "left": 10, "right": 10 },
//!   "algorithm": "gang",
//!   "gang": { "base": "max-rects", "group_by": "group" }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocator::{Allocator, DEFAULT_MAX_SHEETS};
use crate::cancel::CancelToken;
use crate::strategy::gang::{self, GangOptions};
use crate::strategy::{Algorithm, BaseStrategy};
use crate::types::{DemandItem, Margins, SheetSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub sheet: SheetSpec,
    pub items: Vec<DemandItem>,
    #[serde(default)]
    pub bleed: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Overrides every item's `can_rotate` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<bool>,
    #[serde(default)]
    pub gang: GangConfig,
    #[serde(default = "default_max_sheets")]
    pub max_sheets: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,
}

fn default_max_sheets() -> usize {
    DEFAULT_MAX_SHEETS
}

impl JobConfig {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn demand(&self) -> Vec<DemandItem> {
        self.items
            .iter()
            .map(|d| match self.rotate {
                Some(rotate) => d.clone().rotatable(rotate),
                None => d.clone(),
            })
            .collect()
    }

    pub fn allocator(&self) -> Allocator {
        let cancel = match self.time_limit_ms {
            Some(ms) => CancelToken::with_time_limit(Duration::from_millis(ms)),
            None => CancelToken::new(),
        };
        Allocator::new(self.sheet, self.bleed, self.margins, self.algorithm)
            .with_gang_options(self.gang.into())
            .with_max_sheets(self.max_sheets)
            .with_cancel(cancel)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GangConfig {
    pub base: BaseStrategy,
    pub order: GangOrder,
    pub group_by: GangGrouping,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GangOrder {
    #[default]
    AreaDesc,
    HeightDesc,
    Input,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GangGrouping {
    #[default]
    Id,
    Group,
}

impl From<GangConfig> for GangOptions {
    fn from(c: GangConfig) -> Self {
        let options = GangOptions::default().with_base(c.base);
        let options = match c.order {
            GangOrder::AreaDesc => options.with_order(gang::by_area_desc),
            GangOrder::HeightDesc => options.with_order(gang::by_height_desc),
            GangOrder::Input => options.with_order(gang::input_order),
        };
        match c.group_by {
            GangGrouping::Id => options.with_group_key(gang::group_by_id),
            GangGrouping::Group => options.with_group_key(gang::group_by_group),
        }
    }
}

impl std::str::FromStr for GangOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "area-desc" => Ok(GangOrder::AreaDesc),
            "height-desc" => Ok(GangOrder::HeightDesc),
            "input" => Ok(GangOrder::Input),
            _ => Err(format!(
                "invalid gang order '{}', expected: area-desc, height-desc, or input",
                s
            )),
        }
    }
}

impl std::str::FromStr for GangGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(GangGrouping::Id),
            "group" => Ok(GangGrouping::Group),
            _ => Err(format!("invalid gang grouping '{}', expected: id or group", s)),
        }
    }
}
