//! Host item rows.
//!
//! Shop platforms hand over their cart rows as loosely typed JSON objects, often
//! with every field name behind a platform prefix (`product_weight`, ...) and
//! numbers encoded as strings. [`HostItem`] reads such a row through the prefix.

use parcel_core::{Error, PackageOptions, Result, ShippableItem};
use serde_json::{Map, Value};

/// A raw host row seen as a shippable item.
#[derive(Debug, Clone, PartialEq)]
pub struct HostItem {
    row: Map<String, Value>,
    prefix: String,
}

impl HostItem {
    /// Wraps a row; field names are looked up as `{prefix}{name}`.
    pub fn new(row: Map<String, Value>, prefix: impl Into<String>) -> Self {
        Self {
            row,
            prefix: prefix.into(),
        }
    }

    /// Returns the raw row.
    pub fn row(&self) -> &Map<String, Value> {
        &self.row
    }

    /// Consumes the item, returning the raw row.
    pub fn into_row(self) -> Map<String, Value> {
        self.row
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.row.get(&format!("{}{}", self.prefix, name))
    }

    fn number(&self, name: &str) -> Option<f64> {
        match self.field(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl ShippableItem for HostItem {
    fn weight(&self) -> Option<f64> {
        self.number("weight")
    }

    fn length(&self) -> Option<f64> {
        self.number("length")
    }

    fn width(&self) -> Option<f64> {
        self.number("width")
    }

    fn height(&self) -> Option<f64> {
        self.number("height")
    }

    /// Missing quantities count as 1; anything but a positive integer reads as 0
    /// and is rejected when the item is packed.
    fn quantity(&self) -> u32 {
        let Some(value) = self.field("quantity") else {
            return 1;
        };
        let quantity = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        quantity
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(0)
    }

    /// Reads the options object. A numeric-string insured amount is accepted;
    /// anything else unreadable rejects the item.
    fn options(&self) -> Result<PackageOptions> {
        let mut value = match self.field("options") {
            None | Some(Value::Null) => return Ok(PackageOptions::default()),
            Some(value) => value.clone(),
        };
        if let Some(Value::String(s)) = value.get("insured_amount") {
            let parsed = s.trim().parse::<f64>().map_err(|_| {
                Error::MalformedItem(format!(
                    "Item {} has an unreadable insured_amount '{}'",
                    self.label(),
                    s
                ))
            })?;
            value["insured_amount"] = Value::from(parsed);
        }
        serde_json::from_value(value).map_err(|e| {
            log::debug!("unreadable options of {}: {}", self.label(), e);
            Error::MalformedItem(format!("Item {} has unreadable options: {}", self.label(), e))
        })
    }

    fn label(&self) -> String {
        ["id", "name"]
            .iter()
            .find_map(|name| match self.field(name)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "item".to_string())
    }
}
