//! FFI type definitions.

use parcel_core::{NotPacked, Package, PackageOptions, UnitConversion};
use parcel_packer::{PackerConfig, PackingResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::host::HostItem;

/// API version from Cargo.toml.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Packing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackerKind {
    /// One package per unit.
    Default,
    /// Merge into earlier packages, then split recursively.
    #[default]
    Recursive,
}

/// Request for a packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    /// API version.
    #[serde(default)]
    pub version: Option<String>,

    /// Packing algorithm.
    #[serde(default)]
    pub packer: PackerKind,

    /// Carrier limits and item handling.
    #[serde(default)]
    pub config: Option<ConfigRequest>,

    /// Preferred maximum package weight (optional constraint).
    #[serde(default)]
    pub preferred_weight: Option<f64>,

    /// Preferred maximum package size (optional constraint).
    #[serde(default)]
    pub preferred_size: Option<f64>,

    /// Additional handling thresholds for the two longest sides.
    #[serde(default)]
    pub handling_limits: Option<[f64; 2]>,

    /// Maximum insured amount per package.
    #[serde(default)]
    pub max_insurance: Option<f64>,

    /// Merge strategies by name: "vertical_stack", "side_by_side".
    #[serde(default)]
    pub merge_strategies: Vec<String>,

    /// Prefix of every item field name, e.g. "product_".
    #[serde(default)]
    pub field_prefix: String,

    /// Raw item rows.
    pub items: Vec<Map<String, Value>>,
}

/// Configuration request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigRequest {
    /// Maximum package weight.
    pub max_weight: Option<f64>,

    /// Maximum length of the longest side.
    pub max_length: Option<f64>,

    /// Maximum length plus girth.
    pub max_size: Option<f64>,

    /// True if item weights cover the whole line.
    pub weight_combined: Option<bool>,

    /// Packaging material weight added to every package.
    pub packaging_weight: Option<f64>,

    /// Unit conversion.
    pub units: Option<UnitConversion>,
}

impl ConfigRequest {
    /// Builds a packer configuration, starting from the defaults.
    pub fn to_config(&self) -> PackerConfig {
        let mut config = PackerConfig::default();
        if let Some(max_weight) = self.max_weight {
            config.max_weight = max_weight;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if let Some(max_size) = self.max_size {
            config.max_size = max_size;
        }
        if let Some(combined) = self.weight_combined {
            config.weight_combined = combined;
        }
        if let Some(packaging) = self.packaging_weight {
            config.packaging_weight = packaging;
        }
        if let Some(units) = self.units {
            config.units = units;
        }
        config
    }
}

/// Response for a packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResponse {
    /// API version.
    pub version: String,

    /// Whether the run completed (individual items may still be unpacked).
    pub success: bool,

    /// Error message if failed.
    pub error: Option<String>,

    /// Packages.
    #[serde(default)]
    pub packages: Vec<PackageResponse>,

    /// Items that could not be packed.
    #[serde(default)]
    pub not_packed: Vec<NotPackedResponse>,
}

impl PackResponse {
    /// Creates a failed response.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            success: false,
            error: Some(error.into()),
            packages: Vec::new(),
            not_packed: Vec::new(),
        }
    }
}

impl From<PackingResult<HostItem>> for PackResponse {
    fn from(result: PackingResult<HostItem>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            success: true,
            error: None,
            packages: result.packages.iter().map(Into::into).collect(),
            not_packed: result.not_packed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Package response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageResponse {
    /// Weight.
    pub weight: f64,

    /// Longest side.
    pub length: f64,

    /// Middle side.
    pub width: f64,

    /// Shortest side.
    pub height: f64,

    /// Length plus girth.
    pub size: f64,

    /// Number of item units in the package.
    pub unit_count: u32,

    /// Package options.
    #[serde(default)]
    pub options: PackageOptions,
}

impl From<&Package> for PackageResponse {
    fn from(p: &Package) -> Self {
        Self {
            weight: p.weight(),
            length: p.length(),
            width: p.width(),
            height: p.height(),
            size: p.size(),
            unit_count: p.unit_count(),
            options: p.options().clone(),
        }
    }
}

/// An item that could not be packed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotPackedResponse {
    /// The raw item row, as received.
    pub item: Map<String, Value>,

    /// Why it was not packed.
    pub error: String,
}

impl From<NotPacked<HostItem>> for NotPackedResponse {
    fn from(entry: NotPacked<HostItem>) -> Self {
        Self {
            error: entry.message(),
            item: entry.item.into_row(),
        }
    }
}
