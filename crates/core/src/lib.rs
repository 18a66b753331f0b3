//! # Parcel Core
//!
//! Value types and building blocks for the parcel packing engine.
//!
//! This crate provides the types shared between the packers and the host
//! integration layer: packages, their options, the constraints a carrier
//! imposes on them and the strategies used to merge two packages.
//!
//! ## Core Components
//!
//! - **Package**: immutable weight, sorted dimensions, options and unit count
//! - **Constraints**: `ValueConstraint`, `OptionConstraint`, `HandlingConstraint`,
//!   `TypeConstraint`, `FlexibleConstraint`
//! - **Merge strategies**: `VerticalStackMerge`, `SideBySideMerge`
//! - **Items**: the `ShippableItem` capability trait and its normalized `ItemSpec`
//! - **Shipment**: the boundary to carrier adapters (`Shipper`)
//! - **Units**: length, weight and currency conversion
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod constraint;
pub mod error;
pub mod item;
pub mod merge;
pub mod options;
pub mod package;
pub mod shipment;
pub mod units;

// Re-exports
pub use constraint::{
    Constraint, FlexibleConstraint, HandlingConstraint, OptionConstraint, Operator,
    TypeConstraint, ValueConstraint, Verdict,
};
pub use error::{Error, Result};
pub use item::{Item, ItemSpec, NotPacked, ShippableItem, MAX_QUANTITY, MIN_UNIT_WEIGHT};
pub use merge::{MergeStrategy, SideBySideMerge, VerticalStackMerge};
pub use options::{OptionKey, OptionValue, PackageOptions};
pub use package::{girth_size, sort_dimensions, Package, PackageField};
pub use shipment::{
    Address, LabelResult, PackageLabel, RateQuote, ServiceRate, Shipment, Shipper,
};
pub use units::{LengthUnit, UnitConversion, WeightUnit};
