//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `HsError` as one variant
//! via `#[from]`.

use thiserror::Error;

use crate::{HotelId, ResellerId};

/// The top-level error type for `hs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HsError {
    #[error("hotel {0} not configured")]
    UnknownHotel(HotelId),

    #[error("reseller {0} not configured")]
    UnknownReseller(ResellerId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hs-*` crates.
pub type HsResult<T> = Result<T, HsError>;
