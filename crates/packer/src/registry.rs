//! Keyed constraint sets.
//!
//! A packer keeps two [`ConstraintSet`]s: required constraints (the carrier
//! refuses the package) and optional ones (the carrier charges extra). Entries
//! keep their insertion order, so the type check registered first always runs
//! before the constraints that assume a package.

use parcel_core::{Constraint, Error, Package, Result, Verdict};
use std::any::Any;

/// A registered constraint.
#[derive(Debug)]
pub struct ConstraintEntry {
    key: String,
    constraint: Box<dyn Constraint>,
    enabled: bool,
}

impl ConstraintEntry {
    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the constraint.
    pub fn constraint(&self) -> &dyn Constraint {
        self.constraint.as_ref()
    }

    /// Returns true if the constraint takes part in checks.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// An ordered key -> constraint map.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    entries: Vec<ConstraintEntry>,
    next_id: usize,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint and returns its key.
    ///
    /// Without a key, one is generated. An existing key is replaced in place when
    /// `overwrite` is set and rejected with [`Error::ConfigError`] otherwise.
    pub fn add(
        &mut self,
        constraint: Box<dyn Constraint>,
        key: Option<&str>,
        overwrite: bool,
    ) -> Result<String> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self.generate_key(),
        };

        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            if !overwrite {
                return Err(Error::ConfigError(format!(
                    "Constraint '{key}' already exists"
                )));
            }
            entry.constraint = constraint;
            entry.enabled = true;
            return Ok(key);
        }

        self.entries.push(ConstraintEntry {
            key: key.clone(),
            constraint,
            enabled: true,
        });
        Ok(key)
    }

    fn generate_key(&mut self) -> String {
        loop {
            let key = format!("constraint_{}", self.next_id);
            self.next_id += 1;
            if !self.contains(&key) {
                return key;
            }
        }
    }

    /// Removes a constraint, returning it if it was registered.
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Constraint>> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index).constraint)
    }

    /// Enables or disables a constraint without removing it.
    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.enabled = enabled;
                Ok(())
            }
            None => Err(Error::ConfigError(format!("Unknown constraint '{key}'"))),
        }
    }

    /// Returns true if a constraint is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Looks up an entry.
    pub fn get(&self, key: &str) -> Option<&ConstraintEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Returns the keys in check order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Returns the number of registered constraints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no constraint is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks a package against every enabled constraint; the first failure wins.
    pub fn check(&self, package: &Package) -> Result<Verdict> {
        let subject: &dyn Any = package;
        for entry in self.entries.iter().filter(|e| e.enabled) {
            let verdict = entry.constraint.check_value(subject)?;
            if let Verdict::Fail(reason) = &verdict {
                log::trace!("constraint '{}' failed: {}", entry.key, reason);
                return Ok(verdict);
            }
        }
        Ok(Verdict::Pass)
    }
}

/// Required and optional constraint sets.
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    required: ConstraintSet,
    optional: ConstraintSet,
}

impl ConstraintRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the required or the optional set.
    pub fn set(&self, required: bool) -> &ConstraintSet {
        if required {
            &self.required
        } else {
            &self.optional
        }
    }

    /// Returns the required or the optional set, mutably.
    pub fn set_mut(&mut self, required: bool) -> &mut ConstraintSet {
        if required {
            &mut self.required
        } else {
            &mut self.optional
        }
    }

    /// Adds a constraint to one of the sets.
    pub fn add(
        &mut self,
        constraint: Box<dyn Constraint>,
        key: Option<&str>,
        required: bool,
        overwrite: bool,
    ) -> Result<String> {
        self.set_mut(required).add(constraint, key, overwrite)
    }

    /// Returns the required set.
    pub fn required(&self) -> &ConstraintSet {
        &self.required
    }

    /// Returns the optional set.
    pub fn optional(&self) -> &ConstraintSet {
        &self.optional
    }
}
