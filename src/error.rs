//! Error types for store and panel operations.

use thiserror::Error;

use crate::color::ColorError;

/// Errors surfaced by the engine.
///
/// Operations on a category the store was not built with are not errors; they
/// are ignored (see [`crate::store::CategoryStore`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input did not match `#RGB` / `#RRGGBB`
    #[error(transparent)]
    Color(#[from] ColorError),

    /// The scanned text held no color literals
    #[error("no colors found in the scanned text")]
    EmptyScanResult,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
