//! Error types for parcel.

use thiserror::Error;

/// Result type alias for parcel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, checking or packing packages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A value failed validation (bad weight, bad dimension, undefined comparison).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown package field requested.
    #[error("Invalid package field: {0}")]
    InvalidField(String),

    /// Item is missing required dimensional fields.
    #[error("Malformed item: {0}")]
    MalformedItem(String),

    /// A single unit of the item cannot be shipped even on its own.
    #[error("Unpackable item: {0}")]
    UnpackableItem(String),

    /// Two packages could not be merged.
    #[error("Merge failed: {0}")]
    MergeFailed(String),

    /// Invalid packer or constraint configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Returns true if the error concerns a single item rather than the packer setup.
    ///
    /// Item-local errors are recorded in the not-packed list and never abort a
    /// packing run; configuration errors surface immediately.
    pub fn is_item_local(&self) -> bool {
        !matches!(self, Error::ConfigError(_))
    }
}
