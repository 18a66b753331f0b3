//! Merge-then-split packing.
//!
//! Units are first folded into packages created earlier in the run, using the
//! registered merge strategies. Whatever remains is packed as one batch in the
//! more compact of two stacking layouts; a batch that breaks a constraint is
//! halved until every part fits.

use crate::config::PackerConfig;
use crate::packer::{ItemPacking, Packer, PackerCore};
use parcel_core::{girth_size, sort_dimensions, Error, ItemSpec, Package, Result, Verdict};

/// Request-scoped packing state for one item.
#[derive(Debug, Clone)]
pub struct PackingContext {
    single_item: Package,
    handling_armed: bool,
}

impl PackingContext {
    fn new(single_item: Package) -> Self {
        Self {
            single_item,
            handling_armed: false,
        }
    }

    /// Package holding one unit of the current item.
    pub fn single_item(&self) -> &Package {
        &self.single_item
    }

    /// True while the additional handling constraint gates optional checks.
    pub fn handling_armed(&self) -> bool {
        self.handling_armed
    }
}

/// Dimensions of a batch of `quantity` identical units, sorted longest first.
///
/// Compares a square stack (units laid out in a near-square grid across width
/// and height) with a single vertical stack and returns the one with the
/// smaller length plus girth. Ties keep the square stack.
pub fn batch_layout(unit: [f64; 3], quantity: u32) -> [f64; 3] {
    let [length, width, height] = unit;
    let quantity = u64::from(quantity.max(1));

    let mut width_modifier = ((quantity as f64).sqrt().ceil() as u64).max(1);
    let mut height_modifier = width_modifier;
    if width_modifier * height_modifier > quantity {
        height_modifier -= 1;
        if width_modifier * height_modifier < quantity {
            width_modifier += 1;
        }
    }

    let square = sort_dimensions([
        length,
        width * width_modifier as f64,
        height * height_modifier as f64,
    ]);
    let vertical = sort_dimensions([length, width, height * quantity as f64]);

    if girth_size(vertical) < girth_size(square) {
        vertical
    } else {
        square
    }
}

/// Folds units into earlier packages, then packs the rest recursively.
#[derive(Debug)]
pub struct RecursivePacker {
    core: PackerCore,
}

impl RecursivePacker {
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

    /// Folds up to `quantity` units into `packages`. Returns the merged
    /// packages by index and how many units remain.
    fn merge(
        &self,
        ctx: &mut PackingContext,
        packages: &[Package],
        mut quantity: u32,
    ) -> Result<(Vec<(usize, Package)>, u32)> {
        let mut merged = Vec::new();
        for (index, existing) in packages.iter().enumerate() {
            if quantity == 0 {
                break;
            }
            let mut current: Option<Package> = None;
            while quantity > 0 {
                let base = current.as_ref().unwrap_or(existing);
                match self.merge_package(ctx, base)? {
                    Some(package) => {
                        current = Some(package);
                        quantity -= 1;
                    }
                    None => break,
                }
            }
            if let Some(package) = current {
                merged.push((index, package));
            }
        }
        Ok((merged, quantity))
    }

    /// Returns the smallest merge of one unit into `old` that passes every
    /// constraint, if any strategy produces one.
    fn merge_package(&self, ctx: &mut PackingContext, old: &Package) -> Result<Option<Package>> {
        // A package that already pays for handling gains nothing from avoiding it.
        if let Some(handling) = self.core.handling() {
            ctx.handling_armed = handling.within_limits(old);
        }

        let mut best: Option<Package> = None;
        for strategy in self.core.strategies() {
            let combined = match strategy.merge(old, &ctx.single_item) {
                Ok(combined) => combined,
                Err(error) => {
                    log::trace!("{} merge rejected: {}", strategy.name(), error);
                    continue;
                }
            };
            if !self.core.check_required(&combined)?.is_pass()
                || !self
                    .core
                    .check_optional(&combined, ctx.handling_armed)?
                    .is_pass()
            {
                continue;
            }
            if best.as_ref().map_or(true, |b| b.size() > combined.size()) {
                best = Some(combined);
            }
        }
        Ok(best)
    }

    /// Packs `quantity` units as one package, halving the batch until every
    /// part passes.
    fn pack_batch(
        &self,
        ctx: &PackingContext,
        item: &ItemSpec,
        quantity: u32,
    ) -> Result<Vec<Package>> {
        let single = &ctx.single_item;
        let package = Package::new(
            single.weight() * f64::from(quantity),
            batch_layout(single.dimensions(), quantity),
            item.batch_options(quantity),
        )?
        .with_unit_count(quantity);

        let verdict = match self.core.check_required(&package)? {
            Verdict::Pass if quantity > 1 => {
                self.core.check_optional(&package, ctx.handling_armed)?
            }
            verdict => verdict,
        };

        match verdict {
            Verdict::Pass => Ok(vec![package]),
            Verdict::Fail(reason) if quantity == 1 => Err(Error::UnpackableItem(reason)),
            Verdict::Fail(reason) => {
                let first = (quantity + 1) / 2;
                log::debug!(
                    "splitting {} x{} into {} + {}: {}",
                    item.label,
                    quantity,
                    first,
                    quantity - first,
                    reason
                );
                let mut packages = self.pack_batch(ctx, item, first)?;
                packages.extend(self.pack_batch(ctx, item, quantity - first)?);
                Ok(packages)
            }
        }
    }
}

impl Packer for RecursivePacker {
    fn core(&self) -> &PackerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PackerCore {
        &mut self.core
    }

    fn pack_item(&self, item: &ItemSpec, packages: &[Package]) -> Result<ItemPacking> {
        let mut ctx = PackingContext::new(item.single_unit()?);
        if let Verdict::Fail(reason) = self.core.check_required(&ctx.single_item)? {
            return Err(Error::UnpackableItem(reason));
        }

        let mut packing = ItemPacking::default();
        let mut remaining = item.quantity;
        if !self.core.strategies().is_empty() {
            (packing.merged, remaining) = self.merge(&mut ctx, packages, remaining)?;
            log::debug!(
                "merged {} of {} unit(s) of {}",
                item.quantity - remaining,
                item.quantity,
                item.label
            );
        }

        packing.created = match remaining {
            0 => Vec::new(),
            1 => vec![ctx.single_item],
            quantity => {
                // Only guard against handling fees a lone unit does not already incur.
                ctx.handling_armed = self
                    .core
                    .handling()
                    .map_or(false, |handling| handling.within_limits(&ctx.single_item));
                self.pack_batch(&ctx, item, quantity)?
            }
        };
        Ok(packing)
    }
}
