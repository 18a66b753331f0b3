//! Constraints that a package must satisfy.
//!
//! A constraint inspects a [`Package`] and returns a [`Verdict`]. Packers keep
//! two sets of constraints: required ones (a carrier would refuse the package)
//! and optional ones (the carrier accepts the package but charges extra).
//!
//! | Constraint | Passes when |
//! |------------|-------------|
//! | [`TypeConstraint`] | the checked value has the expected type |
//! | [`ValueConstraint`] | a package field compares true against a bound |
//! | [`OptionConstraint`] | a package option compares true, or is absent and allowed to be |
//! | [`HandlingConstraint`] | length and width stay below the additional handling thresholds |
//! | [`FlexibleConstraint`] | any one child constraint passes |

use crate::options::{OptionKey, OptionValue};
use crate::package::{Package, PackageField};
use crate::{Error, Result};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a constraint check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The package satisfies the constraint.
    Pass,
    /// The package violates the constraint; carries a human-readable reason.
    Fail(String),
}

impl Verdict {
    /// Creates a failing verdict.
    pub fn fail(reason: impl Into<String>) -> Self {
        Verdict::Fail(reason.into())
    }

    /// Creates a verdict from a boolean outcome and the reason used on failure.
    pub fn from_bool(passed: bool, reason: impl FnOnce() -> String) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail(reason())
        }
    }

    /// Returns true for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(reason) => Some(reason),
        }
    }
}

/// A predicate over packages.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Checks a package against this constraint.
    ///
    /// Returns an error only when the check itself is meaningless (for example
    /// comparing against an undefined value); a violated constraint is
    /// `Ok(Verdict::Fail(..))`.
    fn check(&self, package: &Package) -> Result<Verdict>;

    /// Checks an arbitrary value. Values that are not packages fail.
    fn check_value(&self, value: &dyn Any) -> Result<Verdict> {
        match value.downcast_ref::<Package>() {
            Some(package) => self.check(package),
            None => Ok(Verdict::fail("Value is not a Package")),
        }
    }
}

/// Comparison operator used by [`ValueConstraint`] and [`OptionConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// `value <= bound`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    LessOrEqual,
    /// `value < bound`
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Less,
    /// `value > bound`
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Greater,
    /// `value >= bound`
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    GreaterOrEqual,
    /// `value == bound`; numbers and flags compare loosely (a flag is 0 or 1).
    #[cfg_attr(feature = "serde", serde(rename = "=="))]
    Equal,
    /// `value != bound`, loose.
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    NotEqual,
    /// Same kind and exactly the same value.
    #[cfg_attr(feature = "serde", serde(rename = "==="))]
    Identical,
    /// Different kind or different value.
    #[cfg_attr(feature = "serde", serde(rename = "!=="))]
    NotIdentical,
}

impl Operator {
    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::LessOrEqual => "<=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Identical => "===",
            Operator::NotIdentical => "!==",
        }
    }

    /// Compares two numbers. NaN is an undefined value and cannot be compared.
    pub fn compare_numbers(self, value: f64, bound: f64) -> Result<bool> {
        if value.is_nan() || bound.is_nan() {
            return Err(Error::Validation(format!(
                "Cannot compare undefined value: {value} {} {bound}",
                self.symbol()
            )));
        }
        Ok(match self {
            Operator::LessOrEqual => value <= bound,
            Operator::Less => value < bound,
            Operator::Greater => value > bound,
            Operator::GreaterOrEqual => value >= bound,
            Operator::Equal => value == bound,
            Operator::NotEqual => value != bound,
            Operator::Identical => value.to_bits() == bound.to_bits(),
            Operator::NotIdentical => value.to_bits() != bound.to_bits(),
        })
    }

    /// Compares two option values.
    pub fn compare_values(self, value: &OptionValue, bound: &OptionValue) -> Result<bool> {
        use OptionValue::{Flag, Number, Text};

        match (self, value, bound) {
            (_, Number(a), Number(b)) => self.compare_numbers(*a, *b),
            (Operator::Identical, a, b) => Ok(a == b),
            (Operator::NotIdentical, a, b) => Ok(a != b),
            (_, Flag(a), Flag(b)) => self.compare_numbers(flag_number(*a), flag_number(*b)),
            (Operator::Equal | Operator::NotEqual, Flag(a), Number(b))
            | (Operator::Equal | Operator::NotEqual, Number(b), Flag(a)) => {
                self.compare_numbers(flag_number(*a), *b)
            }
            (_, Text(a), Text(b)) => Ok(match self {
                Operator::LessOrEqual => a <= b,
                Operator::Less => a < b,
                Operator::Greater => a > b,
                Operator::GreaterOrEqual => a >= b,
                Operator::Equal | Operator::Identical => a == b,
                Operator::NotEqual | Operator::NotIdentical => a != b,
            }),
            (Operator::Equal, _, _) => Ok(false),
            (Operator::NotEqual, _, _) => Ok(true),
            (op, a, b) => Err(Error::Validation(format!(
                "Cannot compare '{a}' {} '{b}'",
                op.symbol()
            ))),
        }
    }
}

fn flag_number(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<=" => Ok(Operator::LessOrEqual),
            "<" => Ok(Operator::Less),
            ">" => Ok(Operator::Greater),
            ">=" => Ok(Operator::GreaterOrEqual),
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            "===" => Ok(Operator::Identical),
            "!==" => Ok(Operator::NotIdentical),
            other => Err(Error::ConfigError(format!(
                "Invalid operator '{other}'; valid operators are '<=', '<', '>', '>=', '==', '!=', '===', and '!=='"
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Passes iff the checked value has the expected type.
///
/// Registered first in every required set so later constraints always receive
/// a [`Package`].
#[derive(Clone)]
pub struct TypeConstraint {
    type_name: &'static str,
    matches: fn(&dyn Any) -> bool,
}

impl TypeConstraint {
    /// Creates a constraint accepting values of type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            matches: |value| value.is::<T>(),
        }
    }

    /// Creates a constraint accepting [`Package`] values.
    pub fn package() -> Self {
        Self::of::<Package>()
    }

    /// Returns the expected type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConstraint")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl Constraint for TypeConstraint {
    fn check(&self, package: &Package) -> Result<Verdict> {
        self.check_value(package)
    }

    fn check_value(&self, value: &dyn Any) -> Result<Verdict> {
        Ok(Verdict::from_bool((self.matches)(value), || {
            format!("Expected value of type {}", self.type_name)
        }))
    }
}

/// Compares a numeric package field against a bound.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueConstraint {
    bound: f64,
    field: PackageField,
    operator: Operator,
}

impl ValueConstraint {
    /// Creates a constraint `package.field {operator} bound`.
    pub fn new(bound: f64, field: PackageField, operator: Operator) -> Self {
        Self {
            bound,
            field,
            operator,
        }
    }

    /// Creates a constraint from host-supplied field and operator names.
    pub fn parse(bound: f64, field: &str, operator: &str) -> Result<Self> {
        let field = field
            .parse()
            .map_err(|_| Error::ConfigError(format!("Unknown package field '{field}'")))?;
        Ok(Self::new(bound, field, operator.parse()?))
    }

    /// Shorthand for `field <= bound`.
    pub fn at_most(bound: f64, field: PackageField) -> Self {
        Self::new(bound, field, Operator::LessOrEqual)
    }

    /// Returns the bound.
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Returns the checked field.
    pub fn field(&self) -> PackageField {
        self.field
    }

    /// Returns the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }
}

impl Constraint for ValueConstraint {
    fn check(&self, package: &Package) -> Result<Verdict> {
        let value = package.get(self.field);
        let passed = self
            .operator
            .compare_numbers(value, self.bound)
            .map_err(|_| {
                Error::Validation(format!(
                    "Value for '{}' is undefined: invalid comparison",
                    self.field
                ))
            })?;
        Ok(Verdict::from_bool(passed, || {
            format!(
                "Package {} must be {} {}: value = {value}",
                self.field, self.operator, self.bound
            )
        }))
    }
}

/// Compares a package option against a bound.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionConstraint {
    bound: OptionValue,
    key: OptionKey,
    operator: Operator,
    allow_missing: bool,
}

impl OptionConstraint {
    /// Creates a constraint `option[key] {operator} bound`.
    ///
    /// When the option is absent the constraint passes iff `allow_missing`.
    pub fn new(
        bound: impl Into<OptionValue>,
        key: OptionKey,
        operator: Operator,
        allow_missing: bool,
    ) -> Self {
        Self {
            bound: bound.into(),
            key,
            operator,
            allow_missing,
        }
    }

    /// Returns the option key.
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    /// Returns whether absent options pass.
    pub fn allows_missing(&self) -> bool {
        self.allow_missing
    }
}

impl Constraint for OptionConstraint {
    fn check(&self, package: &Package) -> Result<Verdict> {
        match package.get_option(&self.key) {
            None => Ok(Verdict::from_bool(self.allow_missing, || {
                format!("Package option '{}' is required", self.key)
            })),
            Some(value) => {
                let passed = self.operator.compare_values(&value, &self.bound)?;
                Ok(Verdict::from_bool(passed, || {
                    format!(
                        "Package option '{}' must be {} {}: value = {value}",
                        self.key, self.operator, self.bound
                    )
                }))
            }
        }
    }
}

/// Passes iff a package stays under the carrier's additional handling thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandlingConstraint {
    /// Thresholds, largest first.
    bound: [f64; 2],
}

impl HandlingConstraint {
    /// Creates the constraint from two thresholds given in either order.
    pub fn new(thresholds: [f64; 2]) -> Result<Self> {
        if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(Error::ConfigError(format!(
                "Additional handling thresholds must be positive numbers, got {thresholds:?}"
            )));
        }
        let mut bound = thresholds;
        bound.sort_by(|a, b| b.total_cmp(a));
        Ok(Self { bound })
    }

    /// Returns the thresholds, largest first.
    pub fn thresholds(&self) -> [f64; 2] {
        self.bound
    }

    /// Returns true if the package stays under both thresholds.
    pub fn within_limits(&self, package: &Package) -> bool {
        package.length() <= self.bound[0] && package.width() <= self.bound[1]
    }
}

impl Constraint for HandlingConstraint {
    fn check(&self, package: &Package) -> Result<Verdict> {
        Ok(Verdict::from_bool(self.within_limits(package), || {
            "Package would require additional handling".to_string()
        }))
    }
}

/// Passes if any child constraint passes.
#[derive(Debug)]
pub struct FlexibleConstraint {
    children: Vec<Box<dyn Constraint>>,
}

impl FlexibleConstraint {
    /// Creates the constraint. At least one child is required.
    pub fn new(children: Vec<Box<dyn Constraint>>) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::ConfigError(
                "FlexibleConstraint requires at least one child constraint".into(),
            ));
        }
        Ok(Self { children })
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Always false; construction rejects empty child lists.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Constraint for FlexibleConstraint {
    fn check(&self, package: &Package) -> Result<Verdict> {
        let mut reasons = Vec::with_capacity(self.children.len());
        for child in &self.children {
            match child.check(package)? {
                Verdict::Pass => return Ok(Verdict::Pass),
                Verdict::Fail(reason) => reasons.push(reason),
            }
        }
        Ok(Verdict::Fail(reasons.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PackageOptions;

    fn package(weight: f64, dims: [f64; 3]) -> Package {
        Package::new(weight, dims, PackageOptions::new()).unwrap()
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("<=".parse::<Operator>().unwrap(), Operator::LessOrEqual);
        assert_eq!("!==".parse::<Operator>().unwrap(), Operator::NotIdentical);
        assert!(matches!(
            "=<".parse::<Operator>(),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_compare_numbers() {
        assert!(Operator::LessOrEqual.compare_numbers(150.0, 150.0).unwrap());
        assert!(!Operator::Less.compare_numbers(150.0, 150.0).unwrap());
        assert!(Operator::NotEqual.compare_numbers(1.0, 2.0).unwrap());
        assert!(!Operator::Identical.compare_numbers(0.0, -0.0).unwrap());
        assert!(Operator::Equal.compare_numbers(0.0, -0.0).unwrap());
        assert!(Operator::Greater.compare_numbers(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_compare_values() {
        let op = Operator::Equal;
        assert!(op
            .compare_values(&OptionValue::Flag(true), &OptionValue::Number(1.0))
            .unwrap());
        assert!(!Operator::Identical
            .compare_values(&OptionValue::Flag(true), &OptionValue::Number(1.0))
            .unwrap());
        assert!(Operator::Less
            .compare_values(&"a".into(), &"b".into())
            .unwrap());
        assert!(Operator::Less
            .compare_values(&"a".into(), &OptionValue::Number(1.0))
            .is_err());
        assert!(!Operator::Equal
            .compare_values(&"1".into(), &OptionValue::Number(1.0))
            .unwrap());
    }

    #[test]
    fn test_type_constraint() {
        let constraint = TypeConstraint::package();
        let p = package(1.0, [1.0, 1.0, 1.0]);
        assert!(constraint.check(&p).unwrap().is_pass());
        assert!(constraint.check_value(&p).unwrap().is_pass());
        assert!(!constraint.check_value(&"not a package").unwrap().is_pass());
    }

    #[test]
    fn test_value_constraint() {
        let max_weight = ValueConstraint::at_most(150.0, PackageField::Weight);
        assert!(max_weight.check(&package(150.0, [1.0, 1.0, 1.0])).unwrap().is_pass());

        let verdict = max_weight.check(&package(150.5, [1.0, 1.0, 1.0])).unwrap();
        assert_eq!(
            verdict.reason(),
            Some("Package weight must be <= 150: value = 150.5")
        );

        let max_size = ValueConstraint::parse(165.0, "size", "<=").unwrap();
        assert!(max_size
            .check(&package(11.34, [14.2, 16.8, 26.34]))
            .unwrap()
            .is_pass());

        assert!(ValueConstraint::parse(1.0, "volume", "<=").is_err());
        assert!(ValueConstraint::parse(1.0, "size", "<>").is_err());
    }

    #[test]
    fn test_value_constraint_undefined_bound() {
        let constraint = ValueConstraint::at_most(f64::NAN, PackageField::Length);
        assert!(matches!(
            constraint.check(&package(1.0, [1.0, 1.0, 1.0])),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_option_constraint_insurance() {
        let constraint = OptionConstraint::new(
            50000.0,
            OptionKey::InsuredAmount,
            Operator::LessOrEqual,
            true,
        );

        let uninsured = package(1.0, [1.0, 1.0, 1.0]);
        assert!(constraint.check(&uninsured).unwrap().is_pass());

        let insured = Package::new(
            1.0,
            [1.0, 1.0, 1.0],
            PackageOptions::new().with_insured_amount(60000.0),
        )
        .unwrap();
        assert!(!constraint.check(&insured).unwrap().is_pass());
    }

    #[test]
    fn test_option_constraint_missing_not_allowed() {
        let constraint =
            OptionConstraint::new("02", OptionKey::PackagingType, Operator::Equal, false);
        let verdict = constraint.check(&package(1.0, [1.0, 1.0, 1.0])).unwrap();
        assert_eq!(verdict.reason(), Some("Package option 'type' is required"));
    }

    #[test]
    fn test_handling_constraint() {
        let handling = HandlingConstraint::new([30.0, 60.0]).unwrap();
        assert_eq!(handling.thresholds(), [60.0, 30.0]);

        assert!(handling.check(&package(1.0, [60.0, 30.0, 5.0])).unwrap().is_pass());
        assert!(!handling.check(&package(1.0, [61.0, 10.0, 5.0])).unwrap().is_pass());
        assert!(!handling.check(&package(1.0, [40.0, 31.0, 5.0])).unwrap().is_pass());

        assert!(HandlingConstraint::new([0.0, 10.0]).is_err());
    }

    #[test]
    fn test_flexible_constraint() {
        let light = ValueConstraint::at_most(10.0, PackageField::Weight);
        let small = ValueConstraint::at_most(20.0, PackageField::Size);
        let either = FlexibleConstraint::new(vec![Box::new(light), Box::new(small)]).unwrap();
        assert_eq!(either.len(), 2);

        assert!(either.check(&package(50.0, [2.0, 2.0, 2.0])).unwrap().is_pass());
        assert!(either.check(&package(5.0, [50.0, 2.0, 2.0])).unwrap().is_pass());

        let verdict = either.check(&package(50.0, [50.0, 2.0, 2.0])).unwrap();
        assert!(!verdict.is_pass());
        assert!(verdict.reason().unwrap().contains("weight"));
        assert!(verdict.reason().unwrap().contains("size"));

        assert!(FlexibleConstraint::new(Vec::new()).is_err());
    }
}
