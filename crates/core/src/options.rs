//! Package options (insurance, signature, packaging type, host extensions).

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    /// Numeric value; numbers sum when packages merge.
    Number(f64),
    /// Boolean flag; flags OR together when packages merge.
    Flag(bool),
    /// Text value; must be identical on both sides of a merge.
    Text(String),
}

impl OptionValue {
    /// Returns the numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag value, if any.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            OptionValue::Number(_) => "number",
            OptionValue::Flag(_) => "flag",
            OptionValue::Text(_) => "text",
        }
    }

    fn merge(&self, other: &OptionValue, key: &str) -> Result<OptionValue> {
        match (self, other) {
            (OptionValue::Number(a), OptionValue::Number(b)) => Ok(OptionValue::Number(a + b)),
            (OptionValue::Flag(a), OptionValue::Flag(b)) => Ok(OptionValue::Flag(*a || *b)),
            (OptionValue::Text(a), OptionValue::Text(b)) if a == b => {
                Ok(OptionValue::Text(a.clone()))
            }
            (OptionValue::Text(a), OptionValue::Text(b)) => Err(Error::MergeFailed(format!(
                "Option '{key}' conflicts: '{a}' vs '{b}'"
            ))),
            (a, b) => Err(Error::MergeFailed(format!(
                "Option '{key}' has mismatched kinds: {} vs {}",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Flag(b) => write!(f, "{b}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// Key addressing a package option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Declared (insured) value of the package contents.
    InsuredAmount,
    /// Whether delivery requires a signature.
    SignatureRequired,
    /// Carrier packaging type code.
    PackagingType,
    /// Host-specific extension key.
    Custom(String),
}

impl OptionKey {
    /// Returns the canonical host-facing name of the key.
    pub fn name(&self) -> &str {
        match self {
            OptionKey::InsuredAmount => "insured_amount",
            OptionKey::SignatureRequired => "signature_required",
            OptionKey::PackagingType => "type",
            OptionKey::Custom(name) => name,
        }
    }
}

impl From<&str> for OptionKey {
    fn from(name: &str) -> Self {
        match name {
            "insured_amount" => OptionKey::InsuredAmount,
            "signature_required" => OptionKey::SignatureRequired,
            "type" | "packaging_type" => OptionKey::PackagingType,
            other => OptionKey::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options attached to a package.
///
/// Well-known options are typed fields; anything else a host attaches lives in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackageOptions {
    /// Insured amount for the whole package.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub insured_amount: Option<f64>,

    /// Signature required on delivery.
    #[cfg_attr(feature = "serde", serde(default))]
    pub signature_required: bool,

    /// Carrier packaging type.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "type", skip_serializing_if = "Option::is_none")
    )]
    pub packaging_type: Option<String>,

    /// Host extension options.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub extra: BTreeMap<String, OptionValue>,
}

impl PackageOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the insured amount.
    pub fn with_insured_amount(mut self, amount: f64) -> Self {
        self.insured_amount = Some(amount);
        self
    }

    /// Sets the signature flag.
    pub fn with_signature_required(mut self, required: bool) -> Self {
        self.signature_required = required;
        self
    }

    /// Sets the packaging type.
    pub fn with_packaging_type(mut self, packaging_type: impl Into<String>) -> Self {
        self.packaging_type = Some(packaging_type.into());
        self
    }

    /// Sets a host extension option.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns true if no option is set.
    pub fn is_empty(&self) -> bool {
        self.insured_amount.is_none()
            && !self.signature_required
            && self.packaging_type.is_none()
            && self.extra.is_empty()
    }

    /// Looks up an option. Unset options return `None`.
    ///
    /// An unset signature flag reads as absent, matching hosts that simply omit it.
    pub fn get(&self, key: &OptionKey) -> Option<OptionValue> {
        match key {
            OptionKey::InsuredAmount => self.insured_amount.map(OptionValue::Number),
            OptionKey::SignatureRequired => {
                self.signature_required.then_some(OptionValue::Flag(true))
            }
            OptionKey::PackagingType => self.packaging_type.clone().map(OptionValue::Text),
            OptionKey::Custom(name) => self.extra.get(name).cloned(),
        }
    }

    /// Sets an option from an untyped value, checking the kind of well-known keys.
    pub fn set(&mut self, key: OptionKey, value: OptionValue) -> Result<()> {
        match (key, value) {
            (OptionKey::InsuredAmount, OptionValue::Number(n)) => {
                if !n.is_finite() || n < 0.0 {
                    return Err(Error::Validation(format!(
                        "insured_amount must be a non-negative number, got {n}"
                    )));
                }
                self.insured_amount = Some(n);
            }
            (OptionKey::SignatureRequired, OptionValue::Flag(b)) => self.signature_required = b,
            (OptionKey::PackagingType, OptionValue::Text(s)) => self.packaging_type = Some(s),
            (OptionKey::Custom(name), value) => {
                self.extra.insert(name, value);
            }
            (key, value) => {
                return Err(Error::Validation(format!(
                    "Option '{key}' cannot hold a {} value",
                    value.kind()
                )))
            }
        }
        Ok(())
    }

    /// Unions two option sets.
    ///
    /// Amounts sum, flags OR together, and text values (packaging type and text
    /// extensions) must match exactly.
    pub fn merged(&self, other: &PackageOptions) -> Result<PackageOptions> {
        let insured_amount = match (self.insured_amount, other.insured_amount) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };

        let packaging_type = match (&self.packaging_type, &other.packaging_type) {
            (Some(a), Some(b)) if a != b => {
                return Err(Error::MergeFailed(format!(
                    "Packaging types conflict: '{a}' vs '{b}'"
                )))
            }
            (a, b) => a.clone().or_else(|| b.clone()),
        };

        let mut extra = self.extra.clone();
        for (key, value) in &other.extra {
            let merged = match extra.get(key) {
                Some(existing) => existing.merge(value, key)?,
                None => value.clone(),
            };
            extra.insert(key.clone(), merged);
        }

        Ok(PackageOptions {
            insured_amount,
            signature_required: self.signature_required || other.signature_required,
            packaging_type,
            extra,
        })
    }

    /// Returns the options for `quantity` units, given per-unit options.
    pub fn scaled(&self, quantity: u32) -> PackageOptions {
        let mut options = self.clone();
        if let Some(amount) = options.insured_amount.as_mut() {
            *amount *= f64::from(quantity);
        }
        options
    }

    /// Returns per-unit options, given options for `quantity` units.
    pub fn per_unit(&self, quantity: u32) -> PackageOptions {
        let mut options = self.clone();
        if let Some(amount) = options.insured_amount.as_mut() {
            *amount /= f64::from(quantity.max(1));
        }
        options
    }
}
