//! Declared, eagerly validated problem options.
//!
//! Every problem publishes an [`OptionSchema`]: one [`OptionSpec`] per option
//! with its type, default value and an optional validator. Resolving user
//! input against the schema rejects unknown names and wrong types, runs the
//! validators and fills in defaults, producing an immutable [`Options`].
//!
//! ```rust
//! use math_surrogate_problems::options::{OptionKind, OptionSchema, OptionSpec};
//!
//! let schema = OptionSchema::new("LpNorm")
//!     .declare(OptionSpec::new("ndim", OptionKind::Int, 1usize.into()))
//!     .declare(OptionSpec::new("order", OptionKind::Int, 2usize.into()));
//!
//! let options = schema.resolve(&[("ndim", 3usize.into())]).unwrap();
//! assert_eq!(options.usize("ndim").unwrap(), 3);
//! assert_eq!(options.usize("order").unwrap(), 2);
//! assert!(schema.resolve(&[("p", 3usize.into())]).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProblemError, Result};

/// Value of a single option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// String value
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Str(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<usize> for OptionValue {
    fn from(v: usize) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Integer
    Int,
    /// Float; integers are accepted and widened
    Float,
    /// Boolean
    Bool,
    /// String
    Str,
}

impl OptionKind {
    fn name(self) -> &'static str {
        match self {
            OptionKind::Int => "integer",
            OptionKind::Float => "float",
            OptionKind::Bool => "boolean",
            OptionKind::Str => "string",
        }
    }

    /// Converts `value` to this kind, `None` when the types are incompatible.
    fn coerce(self, value: &OptionValue) -> Option<OptionValue> {
        match (self, value) {
            (OptionKind::Int, OptionValue::Int(_))
            | (OptionKind::Float, OptionValue::Float(_))
            | (OptionKind::Bool, OptionValue::Bool(_))
            | (OptionKind::Str, OptionValue::Str(_)) => Some(value.clone()),
            (OptionKind::Float, OptionValue::Int(v)) => Some(OptionValue::Float(*v as f64)),
            _ => None,
        }
    }
}

/// Checks an already type-coerced option value; `Err` carries the reason.
pub type OptionValidator = fn(&OptionValue) -> std::result::Result<(), String>;

/// Declaration of one option: name, type, default and validator.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    name: &'static str,
    kind: OptionKind,
    default: OptionValue,
    validator: Option<OptionValidator>,
}

impl OptionSpec {
    /// Declares an option accepting any value of `kind`.
    pub fn new(name: &'static str, kind: OptionKind, default: OptionValue) -> Self {
        Self {
            name,
            kind,
            default,
            validator: None,
        }
    }

    /// Adds a validator run on supplied values.
    pub fn validator(mut self, v: OptionValidator) -> Self {
        self.validator = Some(v);
        self
    }

    /// Option name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Option type.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Default value.
    pub fn default_value(&self) -> &OptionValue {
        &self.default
    }

    fn check(&self, value: &OptionValue) -> Result<OptionValue> {
        let coerced = self
            .kind
            .coerce(value)
            .ok_or_else(|| ProblemError::OptionType {
                name: self.name.to_string(),
                expected: self.kind.name(),
                got: value.to_string(),
            })?;
        if let Some(validate) = self.validator {
            validate(&coerced).map_err(|reason| ProblemError::InvalidOption {
                name: self.name.to_string(),
                reason,
            })?;
        }
        Ok(coerced)
    }
}

/// Set of options a problem understands.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    problem: &'static str,
    specs: Vec<OptionSpec>,
}

impl OptionSchema {
    /// Empty schema for the named problem.
    pub fn new(problem: &'static str) -> Self {
        Self {
            problem,
            specs: Vec::new(),
        }
    }

    /// Adds an option declaration.
    pub fn declare(mut self, spec: OptionSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Problem this schema belongs to.
    pub fn problem(&self) -> &'static str {
        self.problem
    }

    /// Declared options.
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Merges `supplied` over the declared defaults.
    ///
    /// Fails on an unknown name, a type mismatch or a validator rejection.
    /// Later duplicates override earlier ones.
    pub fn resolve(&self, supplied: &[(&str, OptionValue)]) -> Result<Options> {
        let mut values: Vec<(&'static str, OptionValue)> = self
            .specs
            .iter()
            .map(|s| (s.name, s.default.clone()))
            .collect();
        for (name, value) in supplied {
            let Some(idx) = self.specs.iter().position(|s| s.name == *name) else {
                return Err(ProblemError::UnknownOption {
                    problem: self.problem.to_string(),
                    name: (*name).to_string(),
                });
            };
            values[idx].1 = self.specs[idx].check(value)?;
        }
        Ok(Options {
            problem: self.problem,
            values,
        })
    }
}

/// Resolved option values of one problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    problem: &'static str,
    values: Vec<(&'static str, OptionValue)>,
}

impl Options {
    /// Raw value of option `name`.
    pub fn get(&self, name: &str) -> Result<&OptionValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ProblemError::UnknownOption {
                problem: self.problem.to_string(),
                name: name.to_string(),
            })
    }

    /// Integer option as a non-negative count.
    pub fn usize(&self, name: &str) -> Result<usize> {
        match self.get(name)? {
            OptionValue::Int(v) => usize::try_from(*v).map_err(|_| ProblemError::InvalidOption {
                name: name.to_string(),
                reason: format!("{v} is negative"),
            }),
            other => Err(type_error(name, OptionKind::Int, other)),
        }
    }

    /// Float option.
    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            OptionValue::Float(v) => Ok(*v),
            OptionValue::Int(v) => Ok(*v as f64),
            other => Err(type_error(name, OptionKind::Float, other)),
        }
    }

    /// String option.
    pub fn string(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            OptionValue::Str(v) => Ok(v),
            other => Err(type_error(name, OptionKind::Str, other)),
        }
    }

    /// Boolean option.
    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            OptionValue::Bool(v) => Ok(*v),
            other => Err(type_error(name, OptionKind::Bool, other)),
        }
    }

    /// All resolved `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OptionValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }
}

fn type_error(name: &str, kind: OptionKind, got: &OptionValue) -> ProblemError {
    ProblemError::OptionType {
        name: name.to_string(),
        expected: kind.name(),
        got: got.to_string(),
    }
}

/// Declares the `ndim` option; admissible values are checked with [`Dimensionality`].
pub fn ndim_spec(default: usize) -> OptionSpec {
    OptionSpec::new("ndim", OptionKind::Int, default.into())
}

/// Admissible dimensionalities of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensionality {
    /// Exactly this many inputs.
    Fixed(usize),
    /// At least this many inputs.
    AtLeast(usize),
    /// A positive multiple of `step`.
    MultipleOf(usize),
}

impl Dimensionality {
    /// Returns `ndim` when admissible, an [`ProblemError::InvalidDimension`] otherwise.
    pub fn check(self, problem: &str, ndim: usize) -> Result<usize> {
        let (ok, reason) = match self {
            Dimensionality::Fixed(n) => (ndim == n, format!("ndim must be {n}")),
            Dimensionality::AtLeast(n) => (ndim >= n, format!("ndim must be >= {n}")),
            Dimensionality::MultipleOf(step) => (
                ndim >= step && ndim % step == 0,
                format!("ndim must be a positive multiple of {step}"),
            ),
        };
        if ok {
            Ok(ndim)
        } else {
            Err(ProblemError::InvalidDimension {
                problem: problem.to_string(),
                ndim,
                reason,
            })
        }
    }

    /// Smallest admissible dimensionality.
    pub fn minimum(self) -> usize {
        match self {
            Dimensionality::Fixed(n) | Dimensionality::AtLeast(n) | Dimensionality::MultipleOf(n) => n,
        }
    }
}

/// Validator: strictly positive number.
pub fn positive(value: &OptionValue) -> std::result::Result<(), String> {
    match value {
        OptionValue::Float(v) if *v > 0.0 && v.is_finite() => Ok(()),
        OptionValue::Int(v) if *v > 0 => Ok(()),
        other => Err(format!("{other} must be > 0")),
    }
}

/// Validator: number in `[0, 1]`.
pub fn unit_interval(value: &OptionValue) -> std::result::Result<(), String> {
    match value {
        OptionValue::Float(v) if (0.0..=1.0).contains(v) => Ok(()),
        other => Err(format!("{other} must lie in [0, 1]")),
    }
}
