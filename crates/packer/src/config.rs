//! Packer configuration.

use parcel_core::{Error, Result, UnitConversion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default maximum package weight (pounds).
pub const DEFAULT_MAX_WEIGHT: f64 = 150.0;

/// Default maximum length of the longest side (inches).
pub const DEFAULT_MAX_LENGTH: f64 = 108.0;

/// Default maximum length plus girth (inches).
pub const DEFAULT_MAX_SIZE: f64 = 165.0;

/// Carrier limits and item handling settings shared by all packers.
///
/// Limits are given in the caller's units and pass through `units` before use,
/// exactly like item measurements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PackerConfig {
    /// Absolute maximum weight of one package.
    pub max_weight: f64,

    /// Absolute maximum length of the longest side.
    pub max_length: f64,

    /// Absolute maximum length plus girth.
    pub max_size: f64,

    /// True if item weights cover the whole line (unit weight * quantity).
    pub weight_combined: bool,

    /// Weight of packaging material added to every output package.
    pub packaging_weight: f64,

    /// Unit normalization applied to limits and items.
    pub units: UnitConversion,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_weight: DEFAULT_MAX_WEIGHT,
            max_length: DEFAULT_MAX_LENGTH,
            max_size: DEFAULT_MAX_SIZE,
            weight_combined: false,
            packaging_weight: 0.0,
            units: UnitConversion::default(),
        }
    }
}

impl PackerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum package weight.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = weight;
        self
    }

    /// Sets the maximum length.
    pub fn with_max_length(mut self, length: f64) -> Self {
        self.max_length = length;
        self
    }

    /// Sets the maximum length plus girth.
    pub fn with_max_size(mut self, size: f64) -> Self {
        self.max_size = size;
        self
    }

    /// Sets whether item weights cover the whole line.
    pub fn with_weight_combined(mut self, combined: bool) -> Self {
        self.weight_combined = combined;
        self
    }

    /// Sets the packaging material weight.
    pub fn with_packaging_weight(mut self, weight: f64) -> Self {
        self.packaging_weight = weight;
        self
    }

    /// Sets the unit conversion.
    pub fn with_units(mut self, units: UnitConversion) -> Self {
        self.units = units;
        self
    }

    /// Checks that every limit is usable.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_weight", self.max_weight),
            ("max_length", self.max_length),
            ("max_size", self.max_size),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if !self.packaging_weight.is_finite() || self.packaging_weight < 0.0 {
            return Err(Error::ConfigError(format!(
                "packaging_weight cannot be negative, got {}",
                self.packaging_weight
            )));
        }

        if !self.units.currency_rate.is_finite() || self.units.currency_rate <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Currency rate must be a positive number, got {}",
                self.units.currency_rate
            )));
        }

        Ok(())
    }
}
