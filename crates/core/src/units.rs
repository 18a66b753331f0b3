//! Unit normalization hooks.
//!
//! Every packer limit and every item measurement passes through a
//! [`UnitConversion`] before it is used, so a host can describe its catalog in
//! centimeters and grams while the carrier limits stay in inches and pounds.
//! The default conversion is the identity.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length units understood by [`UnitConversion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    /// Inches (base unit).
    #[default]
    Inch,
    /// Feet.
    Foot,
    /// Centimeters.
    Centimeter,
    /// Millimeters.
    Millimeter,
    /// Meters.
    Meter,
}

impl LengthUnit {
    /// Number of inches in one of this unit.
    pub fn to_inches(self) -> f64 {
        match self {
            LengthUnit::Inch => 1.0,
            LengthUnit::Foot => 12.0,
            LengthUnit::Centimeter => 1.0 / 2.54,
            LengthUnit::Millimeter => 1.0 / 25.4,
            LengthUnit::Meter => 100.0 / 2.54,
        }
    }
}

/// Weight units understood by [`UnitConversion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WeightUnit {
    /// Pounds (base unit).
    #[default]
    Pound,
    /// Ounces.
    Ounce,
    /// Kilograms.
    Kilogram,
    /// Grams.
    Gram,
}

impl WeightUnit {
    /// Number of pounds in one of this unit.
    pub fn to_pounds(self) -> f64 {
        match self {
            WeightUnit::Pound => 1.0,
            WeightUnit::Ounce => 1.0 / 16.0,
            WeightUnit::Kilogram => 2.204_622_621_8,
            WeightUnit::Gram => 0.002_204_622_621_8,
        }
    }
}

/// Conversion applied to measurements, weights and currency values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitConversion {
    /// Unit the caller supplies lengths in.
    pub length_from: LengthUnit,
    /// Unit the packer works in.
    pub length_to: LengthUnit,
    /// Unit the caller supplies weights in.
    pub weight_from: WeightUnit,
    /// Unit the packer works in.
    pub weight_to: WeightUnit,
    /// Multiplier applied to currency values (insured amounts, insurance limits).
    pub currency_rate: f64,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self {
            length_from: LengthUnit::Inch,
            length_to: LengthUnit::Inch,
            weight_from: WeightUnit::Pound,
            weight_to: WeightUnit::Pound,
            currency_rate: 1.0,
        }
    }
}

impl UnitConversion {
    /// Creates the identity conversion.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Sets the length conversion.
    pub fn with_lengths(mut self, from: LengthUnit, to: LengthUnit) -> Self {
        self.length_from = from;
        self.length_to = to;
        self
    }

    /// Sets the weight conversion.
    pub fn with_weights(mut self, from: WeightUnit, to: WeightUnit) -> Self {
        self.weight_from = from;
        self.weight_to = to;
        self
    }

    /// Sets the currency multiplier.
    pub fn with_currency_rate(mut self, rate: f64) -> Self {
        self.currency_rate = rate;
        self
    }

    /// Returns true if every conversion is a no-op.
    pub fn is_identity(&self) -> bool {
        self.length_from == self.length_to
            && self.weight_from == self.weight_to
            && self.currency_rate == 1.0
    }

    /// Converts a length value.
    pub fn measurement(&self, value: f64) -> f64 {
        if self.length_from == self.length_to {
            return value;
        }
        value * self.length_from.to_inches() / self.length_to.to_inches()
    }

    /// Converts a weight value.
    pub fn weight(&self, value: f64) -> f64 {
        if self.weight_from == self.weight_to {
            return value;
        }
        value * self.weight_from.to_pounds() / self.weight_to.to_pounds()
    }

    /// Converts a currency value.
    pub fn currency(&self, value: f64) -> f64 {
        value * self.currency_rate
    }
}
