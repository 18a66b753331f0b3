//! One package per unit.

use crate::config::PackerConfig;
use crate::packer::{ItemPacking, Packer, PackerCore};
use parcel_core::{Error, ItemSpec, Package, Result, Verdict};

/// Packs every unit of every item in its own package.
///
/// No merging or splitting happens; only required constraints are checked.
#[derive(Debug)]
pub struct DefaultPacker {
    core: PackerCore,
}

impl DefaultPacker {
    /// Creates a packer with the given configuration.
    pub fn new(config: PackerConfig) -> Result<Self> {
        Ok(Self {
            core: PackerCore::new(config)?,
        })
    }

    /// Creates a packer with the default carrier limits.
    pub fn default_config() -> Result<Self> {
        Self::new(PackerConfig::default())
    }
}

impl Packer for DefaultPacker {
    fn core(&self) -> &PackerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PackerCore {
        &mut self.core
    }

    fn pack_item(&self, item: &ItemSpec, _packages: &[Package]) -> Result<ItemPacking> {
        let package = item.single_unit()?;
        if let Verdict::Fail(reason) = self.core.check_required(&package)? {
            return Err(Error::UnpackableItem(reason));
        }
        Ok(ItemPacking::new(vec![package; item.quantity as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parcel_core::{Item, PackageOptions};

    #[test]
    fn test_one_package_per_unit() {
        let packer = DefaultPacker::default_config().unwrap();
        let item = Item::new("box", 24.0, 10.0, 6.0, 12.0).with_quantity(3);
        let result = packer.make_packages(vec![item]).unwrap();

        assert_eq!(result.packages.len(), 3);
        for package in &result.packages {
            assert_relative_eq!(package.weight(), 24.0);
            assert_eq!(package.dimensions(), [12.0, 10.0, 6.0]);
            assert_eq!(package.unit_count(), 1);
        }
    }

    #[test]
    fn test_combined_weight() {
        let packer = DefaultPacker::new(PackerConfig::new().with_weight_combined(true)).unwrap();
        let item = Item::new("box", 24.0, 10.0, 6.0, 12.0).with_quantity(3);
        let result = packer.make_packages(vec![item]).unwrap();

        assert_eq!(result.packages.len(), 3);
        for package in &result.packages {
            assert_relative_eq!(package.weight(), 8.0);
        }
        assert_relative_eq!(result.total_weight(), 24.0);
    }

    #[test]
    fn test_insurance_split_per_unit() {
        let packer = DefaultPacker::default_config().unwrap();
        let item = Item::new("box", 1.0, 1.0, 1.0, 1.0)
            .with_quantity(4)
            .with_options(PackageOptions::new().with_insured_amount(100.0));
        let result = packer.make_packages(vec![item]).unwrap();
        for package in &result.packages {
            assert_relative_eq!(package.options().insured_amount.unwrap(), 25.0);
        }
    }

    #[test]
    fn test_too_long() {
        let packer = DefaultPacker::default_config().unwrap();
        let item = Item::new("pole", 5.0, 120.0, 2.0, 2.0).with_quantity(2);
        let result = packer.make_packages(vec![item]).unwrap();

        assert!(result.packages.is_empty());
        assert_eq!(
            result.not_packed[0].message(),
            "Unpackable item: Package length must be <= 108: value = 120"
        );
    }
}
