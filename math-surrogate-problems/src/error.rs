//! Error types for problem construction and evaluation.
//!
//! Every failure of this crate is a [`ProblemError`]. Construction-time
//! errors (options, domain specification) abort construction; evaluation-time
//! errors (shape, axis, domain, derivative) abort a single call and leave the
//! problem untouched. The `is_*` helpers group variants into the categories
//! callers usually branch on.

use thiserror::Error;

/// Errors that can occur while building or evaluating a problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProblemError {
    /// An option name that the problem does not declare.
    #[error("unknown option '{name}' for problem {problem}")]
    UnknownOption {
        /// Problem being configured
        problem: String,
        /// The rejected option name
        name: String,
    },

    /// An option value of the wrong type.
    #[error("option '{name}' expects a {expected} value, got {got}")]
    OptionType {
        /// Option name
        name: String,
        /// Declared type
        expected: &'static str,
        /// Supplied value, formatted
        got: String,
    },

    /// An option value of the right type but outside its admissible range.
    #[error("invalid value for option '{name}': {reason}")]
    InvalidOption {
        /// Option name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A dimensionality the problem cannot be built with.
    #[error("problem {problem} cannot be built with ndim = {ndim}: {reason}")]
    InvalidDimension {
        /// Problem being configured
        problem: String,
        /// The rejected dimensionality
        ndim: usize,
        /// Admissible range, in words
        reason: String,
    },

    /// Continuous bounds are inverted, degenerate or non-finite.
    #[error("invalid bounds for dimension {dim}: lower ({lower}) must be finite and < upper ({upper})")]
    InvalidBounds {
        /// Dimension index
        dim: usize,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Ordinal values are too few, non-finite or not strictly increasing.
    #[error("invalid ordinal values for dimension {dim}: {reason}")]
    InvalidOrdinal {
        /// Dimension index
        dim: usize,
        /// What is wrong with the values
        reason: String,
    },

    /// A categorical variable with fewer than two levels.
    #[error("categorical dimension {dim} has {levels} level(s), at least 2 are required")]
    TooFewLevels {
        /// Dimension index
        dim: usize,
        /// Number of declared levels
        levels: usize,
    },

    /// A decreed variable in a domain without any meta variable.
    #[error("decreed dimension {dim} has no meta variable to govern it")]
    MissingMeta {
        /// The decreed dimension
        dim: usize,
    },

    /// A meta variable that is continuous and thus cannot key an activation table.
    #[error("meta dimension {dim} must be ordinal or categorical")]
    ContinuousMeta {
        /// The meta dimension
        dim: usize,
    },

    /// An activation rule that references a bad dimension or meta value.
    #[error("invalid activation rule: {reason}")]
    InvalidActivation {
        /// What is wrong with the rule
        reason: String,
    },

    /// A decreed dimension that no activation rule mentions.
    #[error("decreed dimension {dim} does not appear in any activation rule")]
    UngovernedDecreed {
        /// The decreed dimension
        dim: usize,
    },

    /// Input batch column count does not match the problem dimensionality.
    #[error("input has {got} column(s), problem expects {expected}")]
    ShapeMismatch {
        /// Problem dimensionality
        expected: usize,
        /// Column count supplied
        got: usize,
    },

    /// A row of a ragged input batch has the wrong length.
    #[error("input row {row} has {got} value(s), problem expects {expected}")]
    RaggedRows {
        /// Offending row
        row: usize,
        /// Problem dimensionality
        expected: usize,
        /// Row length supplied
        got: usize,
    },

    /// Derivative axis outside `[0, ndim)`.
    #[error("derivative axis {kx} out of range for ndim = {ndim}")]
    AxisOutOfRange {
        /// Requested axis
        kx: usize,
        /// Problem dimensionality
        ndim: usize,
    },

    /// The problem has no analytic derivative for the requested axis.
    #[error("problem {problem} has no analytic derivative with respect to x{kx}")]
    UnsupportedDerivative {
        /// Problem name
        problem: String,
        /// Requested axis
        kx: usize,
    },

    /// A discrete column holds a value that is not one of its levels.
    #[error("value {value} at row {row} is not an admissible level of dimension {dim}")]
    OutOfDomain {
        /// Offending row
        row: usize,
        /// Offending dimension
        dim: usize,
        /// The rejected value
        value: f64,
    },
}

/// A specialized `Result` type for problem operations.
pub type Result<T> = std::result::Result<T, ProblemError>;

impl ProblemError {
    /// Returns `true` if this is a configuration error raised while resolving options.
    pub fn is_option_error(&self) -> bool {
        matches!(
            self,
            ProblemError::UnknownOption { .. }
                | ProblemError::OptionType { .. }
                | ProblemError::InvalidOption { .. }
                | ProblemError::InvalidDimension { .. }
        )
    }

    /// Returns `true` if this is a malformed domain specification.
    pub fn is_spec_error(&self) -> bool {
        matches!(
            self,
            ProblemError::InvalidBounds { .. }
                | ProblemError::InvalidOrdinal { .. }
                | ProblemError::TooFewLevels { .. }
                | ProblemError::MissingMeta { .. }
                | ProblemError::ContinuousMeta { .. }
                | ProblemError::InvalidActivation { .. }
                | ProblemError::UngovernedDecreed { .. }
        )
    }

    /// Returns `true` if the input batch has the wrong shape.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            ProblemError::ShapeMismatch { .. } | ProblemError::RaggedRows { .. }
        )
    }

    /// Returns `true` if the derivative axis is out of range.
    pub fn is_axis_error(&self) -> bool {
        matches!(self, ProblemError::AxisOutOfRange { .. })
    }

    /// Returns `true` if the requested derivative is not available.
    pub fn is_unsupported_derivative(&self) -> bool {
        matches!(self, ProblemError::UnsupportedDerivative { .. })
    }

    /// Returns `true` if an input value lies outside a discrete domain.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, ProblemError::OutOfDomain { .. })
    }

    /// Returns `true` if the error can only happen while building a problem.
    pub fn is_construction_error(&self) -> bool {
        self.is_option_error() || self.is_spec_error()
    }
}
