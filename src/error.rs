//! Error types for the packing engine.
//!
//! An item that does not fit is never an error; it is reported through
//! [`crate::types::UnplacedItem`]. These variants cover aborted requests and
//! broken internal invariants only.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The caller's cancellation token was tripped.
    #[error("packing cancelled")]
    Cancelled,

    /// The caller's deadline passed before packing finished.
    #[error("packing deadline exceeded")]
    DeadlineExceeded,

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}
