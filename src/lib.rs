//! Rectangle nesting for print production: places quantity-bearing print
//! jobs onto fixed-size sheets with bleed and margins, one sheet at a time
//! or across as many sheets as the demand needs.

pub mod allocator;
pub mod cancel;
pub mod config;
pub mod error;
pub mod expand;
pub mod geometry;
pub mod metrics;
pub mod render;
pub mod sheet;
pub mod strategy;
pub mod types;

pub use allocator::{Allocator, pack_multi_sheet};
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use sheet::{pack_sheet, pack_sheet_with_cancel};
pub use strategy::{Algorithm, BaseStrategy, GangOptions};
pub use types::{
    AllocationResult, DemandItem, Margins, Placement, Rotation, SheetResult, SheetSpec,
    UnitItem, UnplacedItem, UnplacedReason,
};
