//! Integration tests for parcel-packer.

use approx::assert_relative_eq;
use parcel_core::{
    Error, FlexibleConstraint, Item, LengthUnit, OptionConstraint, OptionKey, Operator,
    PackageField, PackageOptions, ShippableItem, SideBySideMerge, UnitConversion,
    ValueConstraint, VerticalStackMerge,
};
use parcel_packer::{DefaultPacker, Packer, PackerConfig, RecursivePacker};

mod scenarios {
    use super::*;

    #[test]
    fn test_single_item_within_limits() {
        let item = Item::new("lamp", 11.34, 14.2, 16.8, 26.34);

        let default = DefaultPacker::default_config().unwrap();
        let recursive = RecursivePacker::default_config().unwrap();
        for result in [
            default.make_packages(vec![item.clone()]).unwrap(),
            recursive.make_packages(vec![item.clone()]).unwrap(),
        ] {
            assert!(result.is_complete());
            assert_eq!(result.packages.len(), 1);
            let package = &result.packages[0];
            assert_eq!(package.dimensions(), [26.34, 16.8, 14.2]);
            assert_relative_eq!(package.size(), 88.34, epsilon = 1e-9);
            assert_relative_eq!(package.weight(), 11.34);
        }
    }

    #[test]
    fn test_default_packer_quantity() {
        let item = Item::new("box", 24.0, 10.0, 6.0, 12.0).with_quantity(3);

        let separate = DefaultPacker::default_config().unwrap();
        let result = separate.make_packages(vec![item.clone()]).unwrap();
        assert_eq!(result.packages.len(), 3);
        assert!(result.packages.iter().all(|p| p.weight() == 24.0));

        let combined =
            DefaultPacker::new(PackerConfig::new().with_weight_combined(true)).unwrap();
        let result = combined.make_packages(vec![item]).unwrap();
        assert_eq!(result.packages.len(), 3);
        assert!(result.packages.iter().all(|p| p.weight() == 8.0));
    }

    #[test]
    fn test_recursive_split() {
        let packer = RecursivePacker::new(PackerConfig::new().with_max_size(100.0)).unwrap();
        let item = Item::new("crate", 10.0, 20.0, 10.0, 10.0).with_quantity(5);
        let result = packer.make_packages(vec![item]).unwrap();

        assert_eq!(result.packages.len(), 2);
        assert_eq!(result.total_units(), 5);
        assert!(result.packages.iter().all(|p| p.size() <= 100.0));
    }

    #[test]
    fn test_overweight_item() {
        let packer = RecursivePacker::default_config().unwrap();
        let items = vec![
            Item::new("safe", 180.0, 30.0, 30.0, 30.0),
            Item::new("book", 2.0, 9.0, 6.0, 1.0).with_quantity(10),
        ];
        let result = packer.make_packages(items).unwrap();

        assert_eq!(result.not_packed.len(), 1);
        assert_eq!(result.not_packed[0].item.label(), "safe");
        assert_eq!(
            result.not_packed[0].error,
            Error::UnpackableItem("Package weight must be <= 150: value = 180".into())
        );
        assert_eq!(result.total_units(), 10);
    }

    #[test]
    fn test_malformed_item() {
        let packer = RecursivePacker::default_config().unwrap();
        let mut item = Item::new("ghost", 1.0, 1.0, 1.0, 1.0);
        item.height = None;
        let result = packer.make_packages(vec![item]).unwrap();

        assert!(result.packages.is_empty());
        assert!(matches!(
            result.not_packed[0].error,
            Error::MalformedItem(_)
        ));
    }
}

mod merging {
    use super::*;

    #[test]
    fn test_smallest_strategy_wins() {
        let mut packer = RecursivePacker::default_config().unwrap();
        packer
            .add_merge_strategy(Box::new(VerticalStackMerge))
            .add_merge_strategy(Box::new(SideBySideMerge));

        // Flat boards: stacking keeps the girth far lower than laying them side by side.
        let items = vec![
            Item::new("board", 3.0, 40.0, 20.0, 1.0),
            Item::new("board", 3.0, 40.0, 20.0, 1.0),
        ];
        let result = packer.make_packages(items).unwrap();

        assert_eq!(result.packages.len(), 1);
        assert_eq!(result.packages[0].dimensions(), [40.0, 20.0, 2.0]);
    }

    #[test]
    fn test_merge_respects_preferred_size() {
        let mut packer = RecursivePacker::default_config().unwrap();
        packer.add_merge_strategy(Box::new(VerticalStackMerge));
        packer.set_preferred_size(60.0).unwrap();

        let items = vec![
            Item::new("cube", 2.0, 10.0, 10.0, 10.0),
            Item::new("cube", 2.0, 10.0, 10.0, 10.0),
        ];
        let result = packer.make_packages(items).unwrap();

        // Stacked: 20 + 2 * (10 + 10) = 60, exactly the preferred size.
        assert_eq!(result.packages.len(), 1);

        let items = vec![
            Item::new("cube", 2.0, 10.0, 10.0, 10.0),
            Item::new("cube", 2.0, 11.0, 10.0, 10.0),
        ];
        let result = packer.make_packages(items).unwrap();
        assert_eq!(result.packages.len(), 2);
    }

    #[test]
    fn test_conflicting_packaging_types_not_merged() {
        let mut packer = RecursivePacker::default_config().unwrap();
        packer.add_merge_strategy(Box::new(VerticalStackMerge));

        let items = vec![
            Item::new("letter", 0.5, 12.0, 9.0, 0.5)
                .with_options(PackageOptions::new().with_packaging_type("01")),
            Item::new("tube", 0.5, 12.0, 9.0, 0.5)
                .with_options(PackageOptions::new().with_packaging_type("03")),
        ];
        let result = packer.make_packages(items).unwrap();
        assert_eq!(result.packages.len(), 2);
        assert!(result.is_complete());
    }

    #[test]
    fn test_merged_insurance_capped() {
        let mut packer = RecursivePacker::default_config().unwrap();
        packer.add_merge_strategy(Box::new(VerticalStackMerge));
        packer.set_max_insurance(500.0).unwrap();

        let insured = |amount| {
            Item::new("watch", 0.5, 4.0, 4.0, 2.0)
                .with_options(PackageOptions::new().with_insured_amount(amount))
        };
        let result = packer
            .make_packages(vec![insured(300.0), insured(300.0)])
            .unwrap();

        assert_eq!(result.packages.len(), 2);
        for package in &result.packages {
            assert_eq!(package.options().insured_amount, Some(300.0));
        }
    }
}

mod configuration {
    use super::*;

    #[test]
    fn test_custom_constraints() {
        let mut packer = DefaultPacker::default_config().unwrap();
        let either = FlexibleConstraint::new(vec![
            Box::new(ValueConstraint::at_most(10.0, PackageField::Weight)),
            Box::new(OptionConstraint::new(
                true,
                OptionKey::SignatureRequired,
                Operator::Equal,
                false,
            )),
        ])
        .unwrap();
        packer
            .add_constraint(Box::new(either), Some("light_or_signed"), true, false)
            .unwrap();

        let items = vec![
            Item::new("light", 5.0, 5.0, 5.0, 5.0),
            Item::new("heavy", 50.0, 5.0, 5.0, 5.0),
            Item::new("signed", 50.0, 5.0, 5.0, 5.0)
                .with_options(PackageOptions::new().with_signature_required(true)),
        ];
        let result = packer.make_packages(items).unwrap();

        assert_eq!(result.packages.len(), 2);
        assert_eq!(result.not_packed[0].item.id, "heavy");
    }

    #[test]
    fn test_unit_conversion() {
        let units = UnitConversion::identity().with_lengths(LengthUnit::Centimeter, LengthUnit::Inch);
        let packer = DefaultPacker::new(PackerConfig::new().with_units(units)).unwrap();

        // Limits are converted too: 108 cm -> ~42.5 in.
        let item = Item::new("rug", 5.0, 127.0, 10.0, 10.0);
        let result = packer.make_packages(vec![item]).unwrap();
        assert_eq!(result.not_packed.len(), 1);

        let item = Item::new("mat", 5.0, 100.0, 10.0, 10.0);
        let result = packer.make_packages(vec![item]).unwrap();
        assert_relative_eq!(result.packages[0].length(), 100.0 / 2.54, epsilon = 1e-9);
    }

    #[test]
    fn test_packer_reuse() {
        let packer = RecursivePacker::default_config().unwrap();
        let items = || vec![Item::new("mug", 1.0, 5.0, 4.0, 4.0).with_quantity(12)];

        let first = packer.make_packages(items()).unwrap();
        let second = packer.make_packages(items()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_requests() {
        let mut packer = RecursivePacker::default_config().unwrap();
        packer.add_merge_strategy(Box::new(VerticalStackMerge));
        packer.set_additional_handling_limits(60.0, 30.0).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=4)
                .map(|quantity| {
                    let packer = &packer;
                    scope.spawn(move || {
                        packer
                            .make_packages(vec![
                                Item::new("tile", 2.0, 12.0, 12.0, 1.0).with_quantity(quantity * 5)
                            ])
                            .unwrap()
                    })
                })
                .collect();
            for (quantity, handle) in (1..=4).zip(handles) {
                let result = handle.join().unwrap();
                assert_eq!(result.total_units(), quantity * 5);
            }
        });
    }
}
