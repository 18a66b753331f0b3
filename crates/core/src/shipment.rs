//! Shipments and the carrier adapter boundary.
//!
//! Packing ends here: packages are handed to a [`Shipment`] and a [`Shipper`]
//! implementation turns them into rate quotes or labels. No carrier is
//! implemented in this crate.

use crate::package::Package;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    /// Person or company name.
    pub name: String,
    /// Street lines.
    pub street: Vec<String>,
    /// City.
    pub city: String,
    /// State or province code.
    pub region: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO country code.
    pub country: String,
}

impl Address {
    /// Creates an address from its city, region, postal code and country.
    pub fn new(
        city: impl Into<String>,
        region: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            ..Default::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a street line.
    pub fn with_street(mut self, line: impl Into<String>) -> Self {
        self.street.push(line.into());
        self
    }
}

/// Packages travelling between two addresses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shipment {
    /// Destination.
    pub ship_to: Address,
    /// Origin.
    pub ship_from: Address,
    packages: Vec<Package>,
}

impl Shipment {
    /// Creates a shipment.
    pub fn new(ship_to: Address, ship_from: Address, packages: Vec<Package>) -> Self {
        Self {
            ship_to,
            ship_from,
            packages,
        }
    }

    /// Appends a package.
    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// Returns the packages; a shipment without packages cannot be quoted.
    pub fn packages(&self) -> Result<&[Package]> {
        if self.packages.is_empty() {
            return Err(Error::Validation("Shipment has no packages".into()));
        }
        Ok(&self.packages)
    }

    /// Total weight of all packages.
    pub fn total_weight(&self) -> f64 {
        self.packages.iter().map(Package::weight).sum()
    }
}

/// Cost of one service for a shipment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceRate {
    /// Carrier service code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Total cost.
    pub cost: f64,
    /// Cost per package, in shipment order.
    pub package_costs: Vec<f64>,
}

/// Answer to a rate request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateQuote {
    /// Carrier status text.
    pub status: String,
    /// Available services.
    pub services: Vec<ServiceRate>,
}

impl RateQuote {
    /// Cheapest service, if any.
    pub fn cheapest(&self) -> Option<&ServiceRate> {
        self.services
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }
}

/// Label for one package.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackageLabel {
    /// Package tracking number.
    pub tracking_number: String,
    /// Label image, base64 or a URL depending on the carrier.
    pub image: String,
}

/// Answer to a label request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelResult {
    /// Master tracking number.
    pub tracking_number: String,
    /// One label per package.
    pub labels: Vec<PackageLabel>,
}

/// A carrier adapter.
pub trait Shipper {
    /// Carrier error type.
    type Error: std::error::Error;

    /// Requests rates for a shipment.
    fn rates(&self, shipment: &Shipment) -> std::result::Result<RateQuote, Self::Error>;

    /// Creates labels for a shipment with the given service code.
    fn create_label(
        &self,
        shipment: &Shipment,
        service: &str,
    ) -> std::result::Result<LabelResult, Self::Error>;
}
