//! The shippable package value type.

use crate::options::{OptionKey, OptionValue, PackageOptions};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numeric package fields that constraints can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PackageField {
    /// Package weight.
    Weight,
    /// Longest side.
    Length,
    /// Middle side.
    Width,
    /// Shortest side.
    Height,
    /// Length plus girth: `length + 2 * (width + height)`.
    Size,
}

impl PackageField {
    /// Returns the field name.
    pub fn name(self) -> &'static str {
        match self {
            PackageField::Weight => "weight",
            PackageField::Length => "length",
            PackageField::Width => "width",
            PackageField::Height => "height",
            PackageField::Size => "size",
        }
    }
}

impl FromStr for PackageField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weight" => Ok(PackageField::Weight),
            "length" => Ok(PackageField::Length),
            "width" => Ok(PackageField::Width),
            "height" => Ok(PackageField::Height),
            "size" => Ok(PackageField::Size),
            other => Err(Error::InvalidField(other.to_string())),
        }
    }
}

impl fmt::Display for PackageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorts three dimensions from longest to shortest.
pub fn sort_dimensions(dimensions: [f64; 3]) -> [f64; 3] {
    let mut sorted = dimensions;
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}

/// Carrier size (length plus girth) of sorted dimensions.
pub fn girth_size(dimensions: [f64; 3]) -> f64 {
    let [length, width, height] = dimensions;
    length + 2.0 * (width + height)
}

/// A package ready to be handed to a carrier.
///
/// Dimensions are always stored longest first, so `length` is the longest side
/// and `height` the shortest. Packages are never modified after construction;
/// merging or adding packaging material produces a new package.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Package {
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
    options: PackageOptions,
    unit_count: u32,
}

impl Package {
    /// Creates a package holding a single unit.
    ///
    /// Dimensions may be given in any order.
    pub fn new(weight: f64, dimensions: [f64; 3], options: PackageOptions) -> Result<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::Validation(format!(
                "Package weight must be a positive number, got {weight}"
            )));
        }
        if dimensions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(Error::Validation(format!(
                "Package dimensions must be positive numbers, got {dimensions:?}"
            )));
        }
        let [length, width, height] = sort_dimensions(dimensions);
        Ok(Self {
            weight,
            length,
            width,
            height,
            options,
            unit_count: 1,
        })
    }

    /// Sets the number of item units this package represents.
    pub fn with_unit_count(mut self, units: u32) -> Self {
        self.unit_count = units.max(1);
        self
    }

    /// Returns a copy of this package with extra weight (e.g. packaging material).
    pub fn with_added_weight(&self, extra: f64) -> Result<Self> {
        if !extra.is_finite() || extra < 0.0 {
            return Err(Error::Validation(format!(
                "Added weight must be non-negative, got {extra}"
            )));
        }
        let mut package = self.clone();
        package.weight += extra;
        Ok(package)
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the longest side.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the middle side.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the shortest side.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the dimensions, longest first.
    pub fn dimensions(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }

    /// Returns length plus girth.
    pub fn size(&self) -> f64 {
        girth_size(self.dimensions())
    }

    /// Returns the number of item units in this package.
    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// Returns the options.
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Reads a numeric field.
    pub fn get(&self, field: PackageField) -> f64 {
        match field {
            PackageField::Weight => self.weight,
            PackageField::Length => self.length,
            PackageField::Width => self.width,
            PackageField::Height => self.height,
            PackageField::Size => self.size(),
        }
    }

    /// Reads a numeric field by name.
    pub fn field(&self, name: &str) -> Result<f64> {
        Ok(self.get(name.parse()?))
    }

    /// Reads an option; unset options return `None`.
    pub fn get_option(&self, key: &OptionKey) -> Option<OptionValue> {
        self.options.get(key)
    }

    /// Unions this package's options with another package's options.
    pub fn merge_options(&self, other: &Package) -> Result<PackageOptions> {
        self.options.merged(&other.options)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {} @ {} (size {}, {} unit(s))",
            self.length,
            self.width,
            self.height,
            self.weight,
            self.size(),
            self.unit_count
        )
    }
}
