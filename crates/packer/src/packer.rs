//! The packer interface and the state shared by every packer.

use crate::config::PackerConfig;
use crate::registry::ConstraintRegistry;
use std::borrow::Cow;

use parcel_core::{
    Constraint, Error, HandlingConstraint, ItemSpec, MergeStrategy, NotPacked, OptionConstraint,
    OptionKey, Operator, Package, PackageField, Result, ShippableItem, TypeConstraint,
    ValueConstraint, Verdict,
};

/// Registry key of the package type check.
pub const KEY_TYPE: &str = "type";
/// Registry key of the maximum weight constraint.
pub const KEY_MAX_WEIGHT: &str = "max_weight";
/// Registry key of the maximum length constraint.
pub const KEY_MAX_LENGTH: &str = "max_length";
/// Registry key of the maximum size constraint.
pub const KEY_MAX_SIZE: &str = "max_size";
/// Registry key of the preferred weight constraint.
pub const KEY_PREFERRED_WEIGHT: &str = "preferred_weight";
/// Registry key of the preferred size constraint.
pub const KEY_PREFERRED_SIZE: &str = "preferred_size";
/// Registry key of the insurance ceiling.
pub const KEY_MAX_INSURANCE: &str = "max_insurance";

/// Configuration, constraints and merge strategies of a packer.
///
/// Configured once through the builder methods on [`Packer`], then only read
/// while packing.
#[derive(Debug)]
pub struct PackerCore {
    config: PackerConfig,
    constraints: ConstraintRegistry,
    handling: Option<HandlingConstraint>,
    strategies: Vec<Box<dyn MergeStrategy>>,
}

impl PackerCore {
    /// Validates the configuration and registers the carrier limits as required
    /// constraints, behind the package type check.
    pub fn new(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        let units = config.units;

        let mut constraints = ConstraintRegistry::new();
        constraints.add(
            Box::new(TypeConstraint::package()),
            Some(KEY_TYPE),
            true,
            true,
        )?;
        constraints.add(
            Box::new(ValueConstraint::at_most(
                units.weight(config.max_weight),
                PackageField::Weight,
            )),
            Some(KEY_MAX_WEIGHT),
            true,
            true,
        )?;
        constraints.add(
            Box::new(ValueConstraint::at_most(
                units.measurement(config.max_length),
                PackageField::Length,
            )),
            Some(KEY_MAX_LENGTH),
            true,
            true,
        )?;
        constraints.add(
            Box::new(ValueConstraint::at_most(
                units.measurement(config.max_size),
                PackageField::Size,
            )),
            Some(KEY_MAX_SIZE),
            true,
            true,
        )?;

        Ok(Self {
            config,
            constraints,
            handling: None,
            strategies: Vec::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Returns the constraint registry.
    pub fn constraints(&self) -> &ConstraintRegistry {
        &self.constraints
    }

    /// Returns the constraint registry, mutably.
    pub fn constraints_mut(&mut self) -> &mut ConstraintRegistry {
        &mut self.constraints
    }

    /// Returns the additional handling constraint, if limits were set.
    pub fn handling(&self) -> Option<&HandlingConstraint> {
        self.handling.as_ref()
    }

    /// Returns the merge strategies.
    pub fn strategies(&self) -> &[Box<dyn MergeStrategy>] {
        &self.strategies
    }

    /// Packaging material weight added to every output package, converted.
    pub fn packaging_weight(&self) -> f64 {
        self.config.units.weight(self.config.packaging_weight)
    }

    /// Returns the package as it will ship, packaging material included.
    pub fn shipped<'a>(&self, package: &'a Package) -> Result<Cow<'a, Package>> {
        let extra = self.packaging_weight();
        if extra > 0.0 {
            Ok(Cow::Owned(package.with_added_weight(extra)?))
        } else {
            Ok(Cow::Borrowed(package))
        }
    }

    /// Checks a package, as shipped, against the required constraints.
    pub fn check_required(&self, package: &Package) -> Result<Verdict> {
        self.constraints.required().check(&*self.shipped(package)?)
    }

    /// Checks a package, as shipped, against the optional constraints, plus the
    /// additional handling constraint when it is armed for the current request.
    pub fn check_optional(&self, package: &Package, handling_armed: bool) -> Result<Verdict> {
        let shipped = self.shipped(package)?;
        let verdict = self.constraints.optional().check(&shipped)?;
        if !verdict.is_pass() {
            return Ok(verdict);
        }
        match (&self.handling, handling_armed) {
            (Some(handling), true) => handling.check(&shipped),
            _ => Ok(Verdict::Pass),
        }
    }

    fn positive(&self, name: &str, value: f64) -> Result<f64> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Error::ConfigError(format!(
                "{name} must be a positive number, got {value}"
            )))
        }
    }
}

/// Packages produced for one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPacking {
    /// Earlier packages that absorbed units, by index, in their merged form.
    pub merged: Vec<(usize, Package)>,
    /// New packages, in creation order.
    pub created: Vec<Package>,
}

impl ItemPacking {
    /// Creates a packing made only of new packages.
    pub fn new(created: Vec<Package>) -> Self {
        Self {
            merged: Vec::new(),
            created,
        }
    }
}

/// Outcome of a packing run.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingResult<I> {
    /// Packages ready to ship, in creation order.
    pub packages: Vec<Package>,
    /// Items that could not be packed, with the reason.
    pub not_packed: Vec<NotPacked<I>>,
}

impl<I> PackingResult<I> {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
            not_packed: Vec::new(),
        }
    }

    /// Total weight of all packages.
    pub fn total_weight(&self) -> f64 {
        self.packages.iter().map(Package::weight).sum()
    }

    /// Number of item units across all packages.
    pub fn total_units(&self) -> u32 {
        self.packages.iter().map(Package::unit_count).sum()
    }

    /// Returns true if every item was packed.
    pub fn is_complete(&self) -> bool {
        self.not_packed.is_empty()
    }
}

impl<I> Default for PackingResult<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts items into carrier-compliant packages.
///
/// Implementors supply [`Packer::pack_item`]; the builder methods and
/// [`Packer::make_packages`] are shared.
pub trait Packer {
    /// Returns the shared packer state.
    fn core(&self) -> &PackerCore;

    /// Returns the shared packer state, mutably.
    fn core_mut(&mut self) -> &mut PackerCore;

    /// Packs one item.
    ///
    /// `packages` holds the packages created so far in this run. Packages are
    /// checked without packaging material; [`PackerCore::check_required`] and
    /// [`PackerCore::check_optional`] account for it.
    fn pack_item(&self, item: &ItemSpec, packages: &[Package]) -> Result<ItemPacking>;

    /// Packs every item, in order.
    ///
    /// An item that fails is recorded in `not_packed` and leaves the packages of
    /// earlier items untouched; later items are still packed. Only configuration
    /// errors abort the run.
    fn make_packages<I, It>(&self, items: It) -> Result<PackingResult<I>>
    where
        I: ShippableItem,
        It: IntoIterator<Item = I>,
    {
        let core = self.core();
        let config = core.config();
        let mut result = PackingResult::new();

        for item in items {
            let packed = ItemSpec::from_item(&item, &config.units, config.weight_combined)
                .and_then(|spec| {
                    let packing = self.pack_item(&spec, &result.packages)?;
                    log::debug!(
                        "packed {} x{} into {} merged and {} new package(s)",
                        spec.label,
                        spec.quantity,
                        packing.merged.len(),
                        packing.created.len()
                    );
                    Ok(packing)
                });

            match packed {
                Ok(packing) => {
                    for (index, package) in packing.merged {
                        if let Some(slot) = result.packages.get_mut(index) {
                            *slot = package;
                        }
                    }
                    result.packages.extend(packing.created);
                }
                Err(error) if error.is_item_local() => {
                    log::warn!("item '{}' not packed: {}", item.label(), error);
                    result.not_packed.push(NotPacked::new(item, error));
                }
                Err(error) => return Err(error),
            }
        }

        if core.packaging_weight() > 0.0 {
            result.packages = result
                .packages
                .iter()
                .map(|package| core.shipped(package).map(Cow::into_owned))
                .collect::<Result<_>>()?;
        }

        Ok(result)
    }

    /// Adds a constraint to the required or optional set.
    ///
    /// Fails with [`Error::ConfigError`] if `key` is taken and `overwrite` is false.
    fn add_constraint(
        &mut self,
        constraint: Box<dyn Constraint>,
        key: Option<&str>,
        required: bool,
        overwrite: bool,
    ) -> Result<&mut Self> {
        self.core_mut()
            .constraints
            .add(constraint, key, required, overwrite)?;
        Ok(self)
    }

    /// Enables or disables a registered constraint.
    fn set_constraint_enabled(
        &mut self,
        key: &str,
        required: bool,
        enabled: bool,
    ) -> Result<&mut Self> {
        self.core_mut()
            .constraints
            .set_mut(required)
            .set_enabled(key, enabled)?;
        Ok(self)
    }

    /// Removes a constraint, returning it if it was registered.
    fn remove_constraint(&mut self, key: &str, required: bool) -> Option<Box<dyn Constraint>> {
        self.core_mut().constraints.set_mut(required).remove(key)
    }

    /// Adds a merge strategy used to fold units into existing packages.
    fn add_merge_strategy(&mut self, strategy: Box<dyn MergeStrategy>) -> &mut Self {
        self.core_mut().strategies.push(strategy);
        self
    }

    /// Prefers packages no heavier than `weight` (optional constraint).
    fn set_preferred_weight(&mut self, weight: f64) -> Result<&mut Self> {
        let core = self.core_mut();
        let weight = core.config.units.weight(core.positive("preferred weight", weight)?);
        core.constraints.add(
            Box::new(ValueConstraint::at_most(weight, PackageField::Weight)),
            Some(KEY_PREFERRED_WEIGHT),
            false,
            true,
        )?;
        Ok(self)
    }

    /// Prefers packages no larger than `size` (optional constraint).
    fn set_preferred_size(&mut self, size: f64) -> Result<&mut Self> {
        let core = self.core_mut();
        let size = core.config.units.measurement(core.positive("preferred size", size)?);
        core.constraints.add(
            Box::new(ValueConstraint::at_most(size, PackageField::Size)),
            Some(KEY_PREFERRED_SIZE),
            false,
            true,
        )?;
        Ok(self)
    }

    /// Sets the additional handling thresholds for the two longest sides.
    ///
    /// The constraint is not registered; packers arm it per request.
    fn set_additional_handling_limits(&mut self, first: f64, second: f64) -> Result<&mut Self> {
        let core = self.core_mut();
        let units = core.config.units;
        core.handling = Some(HandlingConstraint::new([
            units.measurement(first),
            units.measurement(second),
        ])?);
        Ok(self)
    }

    /// Caps the insured amount of any package (required constraint). Packages
    /// without insurance pass.
    fn set_max_insurance(&mut self, value: f64) -> Result<&mut Self> {
        let core = self.core_mut();
        let value = core.config.units.currency(core.positive("max insurance", value)?);
        core.constraints.add(
            Box::new(OptionConstraint::new(
                value,
                OptionKey::InsuredAmount,
                Operator::LessOrEqual,
                true,
            )),
            Some(KEY_MAX_INSURANCE),
            true,
            true,
        )?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::{Item, PackageOptions, UnitConversion, WeightUnit};

    /// Packs every item as a single package, ignoring quantity.
    struct SinglePacker {
        core: PackerCore,
    }

    impl Packer for SinglePacker {
        fn core(&self) -> &PackerCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PackerCore {
            &mut self.core
        }

        fn pack_item(&self, item: &ItemSpec, _packages: &[Package]) -> Result<ItemPacking> {
            let package = item.single_unit()?;
            match self.core.check_required(&package)? {
                Verdict::Pass => Ok(ItemPacking::new(vec![package])),
                Verdict::Fail(reason) => Err(Error::UnpackableItem(reason)),
            }
        }
    }

    fn packer(config: PackerConfig) -> SinglePacker {
        SinglePacker {
            core: PackerCore::new(config).unwrap(),
        }
    }

    #[test]
    fn test_default_constraints() {
        let packer = packer(PackerConfig::default());
        let keys: Vec<&str> = packer.core().constraints().required().keys().collect();
        assert_eq!(keys, [KEY_TYPE, KEY_MAX_WEIGHT, KEY_MAX_LENGTH, KEY_MAX_SIZE]);
        assert!(packer.core().constraints().optional().is_empty());
        assert!(packer.core().handling().is_none());
    }

    #[test]
    fn test_invalid_config() {
        let result = PackerCore::new(PackerConfig::new().with_max_size(-1.0));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_partial_failure() {
        let packer = packer(PackerConfig::default());
        let items = vec![
            Item::new("ok", 10.0, 10.0, 10.0, 10.0),
            Item::new("heavy", 200.0, 10.0, 10.0, 10.0),
            Item::new("also ok", 5.0, 4.0, 4.0, 4.0),
        ];
        let result = packer.make_packages(items).unwrap();

        assert_eq!(result.packages.len(), 2);
        assert_eq!(result.not_packed.len(), 1);
        assert_eq!(result.not_packed[0].item.id, "heavy");
        assert!(matches!(
            result.not_packed[0].error,
            Error::UnpackableItem(_)
        ));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_packaging_weight() {
        let packer = packer(PackerConfig::new().with_packaging_weight(0.5));
        let result = packer
            .make_packages(vec![Item::new("a", 2.0, 3.0, 2.0, 1.0)])
            .unwrap();
        assert_eq!(result.packages[0].weight(), 2.5);
        assert_eq!(result.total_weight(), 2.5);
    }

    #[test]
    fn test_packaging_counts_against_max_weight() {
        let packer = packer(PackerConfig::new().with_packaging_weight(2.0));
        let result = packer
            .make_packages(vec![
                Item::new("near limit", 149.5, 10.0, 10.0, 10.0),
                Item::new("fits", 148.0, 10.0, 10.0, 10.0),
            ])
            .unwrap();

        assert_eq!(result.packages.len(), 1);
        assert_eq!(result.packages[0].weight(), 150.0);
        assert_eq!(result.not_packed.len(), 1);
        assert_eq!(result.not_packed[0].item.id, "near limit");
        assert!(result.packages.iter().all(|p| p.weight() <= 150.0));
    }

    #[test]
    fn test_builders() {
        let mut packer = packer(PackerConfig::default());
        packer
            .set_preferred_weight(70.0)
            .unwrap()
            .set_preferred_size(130.0)
            .unwrap()
            .set_max_insurance(1000.0)
            .unwrap()
            .set_additional_handling_limits(30.0, 60.0)
            .unwrap();

        let optional: Vec<&str> = packer.core().constraints().optional().keys().collect();
        assert_eq!(optional, [KEY_PREFERRED_WEIGHT, KEY_PREFERRED_SIZE]);
        assert!(packer.core().constraints().required().contains(KEY_MAX_INSURANCE));
        assert_eq!(packer.core().handling().unwrap().thresholds(), [60.0, 30.0]);

        assert!(packer.set_preferred_weight(0.0).is_err());
        assert!(packer.set_max_insurance(f64::NAN).is_err());
    }

    #[test]
    fn test_duplicate_constraint() {
        let mut packer = packer(PackerConfig::default());
        let result = packer.add_constraint(
            Box::new(ValueConstraint::at_most(10.0, PackageField::Weight)),
            Some(KEY_MAX_WEIGHT),
            true,
            false,
        );
        assert!(matches!(result, Err(Error::ConfigError(_))));

        packer
            .set_constraint_enabled(KEY_MAX_WEIGHT, true, false)
            .unwrap();
        let result = packer
            .make_packages(vec![Item::new("heavy", 200.0, 1.0, 1.0, 1.0)])
            .unwrap();
        assert!(result.is_complete());

        assert!(packer.remove_constraint(KEY_MAX_WEIGHT, true).is_some());
        assert!(packer.set_constraint_enabled(KEY_MAX_WEIGHT, true, true).is_err());
    }

    #[test]
    fn test_insurance_cap() {
        let mut packer = packer(PackerConfig::default());
        packer.set_max_insurance(100.0).unwrap();
        let insured = |amount| {
            Item::new("x", 1.0, 1.0, 1.0, 1.0)
                .with_options(PackageOptions::new().with_insured_amount(amount))
        };
        let result = packer
            .make_packages(vec![insured(50.0), insured(150.0), Item::new("y", 1.0, 1.0, 1.0, 1.0)])
            .unwrap();
        assert_eq!(result.packages.len(), 2);
        assert_eq!(result.not_packed.len(), 1);
    }

    #[test]
    fn test_limits_converted() {
        // 150 lb expressed in ounces
        let units = UnitConversion::identity().with_weights(WeightUnit::Pound, WeightUnit::Ounce);
        let packer = packer(PackerConfig::new().with_units(units));
        let result = packer
            .make_packages(vec![Item::new("x", 100.0, 1.0, 1.0, 1.0)])
            .unwrap();
        assert!(result.is_complete());
        assert_eq!(result.packages[0].weight(), 1600.0);
    }
}
