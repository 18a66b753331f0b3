//! Items to be packed.
//!
//! Hosts describe their catalog rows in many shapes. Anything that can report a
//! weight, three dimensions, a quantity and options implements
//! [`ShippableItem`]; packers only ever see the normalized [`ItemSpec`].

use crate::options::PackageOptions;
use crate::package::{sort_dimensions, Package};
use crate::units::UnitConversion;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum per-unit weight when a combined line weight is divided by quantity.
pub const MIN_UNIT_WEIGHT: f64 = 0.1;

/// Largest quantity a single item line may carry.
pub const MAX_QUANTITY: u32 = 100_000;

/// Capability interface for anything that can be packed.
pub trait ShippableItem {
    /// Weight of one unit, or of the whole line when the packer treats weights as combined.
    fn weight(&self) -> Option<f64>;

    /// First dimension.
    fn length(&self) -> Option<f64>;

    /// Second dimension.
    fn width(&self) -> Option<f64>;

    /// Third dimension.
    fn height(&self) -> Option<f64>;

    /// Number of identical units.
    fn quantity(&self) -> u32 {
        1
    }

    /// Options for the whole line; an insured amount covers every unit.
    ///
    /// Options that cannot be read fail with [`Error::MalformedItem`].
    fn options(&self) -> Result<PackageOptions> {
        Ok(PackageOptions::default())
    }

    /// Short description used in log messages.
    fn label(&self) -> String {
        "item".to_string()
    }
}

/// A plain item record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Caller-side identifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    /// Weight.
    pub weight: Option<f64>,
    /// Length.
    pub length: Option<f64>,
    /// Width.
    pub width: Option<f64>,
    /// Height.
    pub height: Option<f64>,
    /// Quantity (at least 1).
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: u32,
    /// Line options.
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: PackageOptions,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

impl Item {
    /// Creates an item with all measurements present.
    pub fn new(id: impl Into<String>, weight: f64, length: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            weight: Some(weight),
            length: Some(length),
            width: Some(width),
            height: Some(height),
            quantity: 1,
            options: PackageOptions::default(),
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the options.
    pub fn with_options(mut self, options: PackageOptions) -> Self {
        self.options = options;
        self
    }
}

impl ShippableItem for Item {
    fn weight(&self) -> Option<f64> {
        self.weight
    }

    fn length(&self) -> Option<f64> {
        self.length
    }

    fn width(&self) -> Option<f64> {
        self.width
    }

    fn height(&self) -> Option<f64> {
        self.height
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn options(&self) -> Result<PackageOptions> {
        Ok(self.options.clone())
    }

    fn label(&self) -> String {
        if self.id.is_empty() {
            "item".to_string()
        } else {
            self.id.clone()
        }
    }
}

/// An item normalized for packing: per-unit weight and options, converted
/// units, dimensions sorted longest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    /// Weight of one unit.
    pub unit_weight: f64,
    /// Dimensions of one unit, longest first.
    pub dimensions: [f64; 3],
    /// Number of units.
    pub quantity: u32,
    /// Options of one unit.
    pub unit_options: PackageOptions,
    /// Label for log messages.
    pub label: String,
}

impl ItemSpec {
    /// Normalizes an item.
    ///
    /// When `weight_combined` is set, the item weight covers the whole line and
    /// is divided by the quantity (never below [`MIN_UNIT_WEIGHT`]).
    pub fn from_item<I: ShippableItem + ?Sized>(
        item: &I,
        units: &UnitConversion,
        weight_combined: bool,
    ) -> Result<Self> {
        let fields = [
            ("weight", item.weight()),
            ("length", item.length()),
            ("width", item.width()),
            ("height", item.height()),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MalformedItem(format!(
                "Item must contain the following fields: 'weight', 'length', 'width', 'height'; missing {}",
                missing.join(", ")
            )));
        }

        let mut values = [0.0; 4];
        for (slot, (name, value)) in values.iter_mut().zip(fields) {
            let value = value.unwrap_or_default();
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::MalformedItem(format!(
                    "Item {name} must be a positive number, got {value}"
                )));
            }
            *slot = value;
        }
        let [weight, length, width, height] = values;

        let quantity = item.quantity();
        if quantity == 0 {
            return Err(Error::MalformedItem("Item quantity must be at least 1".into()));
        }
        if quantity > MAX_QUANTITY {
            return Err(Error::MalformedItem(format!(
                "Item quantity must be at most {MAX_QUANTITY}, got {quantity}"
            )));
        }

        let mut unit_weight = units.weight(weight);
        if weight_combined && quantity > 1 {
            unit_weight = (unit_weight / f64::from(quantity)).max(MIN_UNIT_WEIGHT);
        }

        let mut line_options = item.options()?;
        if let Some(amount) = line_options.insured_amount.as_mut() {
            *amount = units.currency(*amount);
        }

        Ok(Self {
            unit_weight,
            dimensions: sort_dimensions([
                units.measurement(length),
                units.measurement(width),
                units.measurement(height),
            ]),
            quantity,
            unit_options: line_options.per_unit(quantity),
            label: item.label(),
        })
    }

    /// Builds the package holding exactly one unit.
    pub fn single_unit(&self) -> Result<Package> {
        Package::new(self.unit_weight, self.dimensions, self.unit_options.clone())
    }

    /// Options for a batch of `quantity` units.
    pub fn batch_options(&self, quantity: u32) -> PackageOptions {
        self.unit_options.scaled(quantity)
    }
}

/// An item that could not be packed, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct NotPacked<I> {
    /// The original item.
    pub item: I,
    /// Why it was not packed.
    pub error: Error,
}

impl<I> NotPacked<I> {
    /// Creates a not-packed entry.
    pub fn new(item: I, error: Error) -> Self {
        Self { item, error }
    }

    /// Human-readable reason.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}
