//! # Parcel FFI
//!
//! C FFI interface for the parcel packing engine.
//!
//! Requests and responses are JSON strings, so hosts written in any language
//! can hand over their cart rows as they store them. Field names may carry a
//! platform prefix (see [`PackRequest::field_prefix`]).

mod api;
mod host;
mod types;

pub use api::*;
pub use host::HostItem;
pub use types::*;
