//! Description of a single input dimension.
//!
//! A [`VariableDescriptor`] pairs the *kind* of a dimension (continuous,
//! ordinal or categorical) with its *role* in a hierarchical domain (neutral,
//! meta or decreed). Discrete dimensions are encoded in input batches as
//! plain `f64` values: ordinal dimensions by one of their admissible values,
//! categorical dimensions by the index of their level.

use serde::{Deserialize, Serialize};

use crate::error::{ProblemError, Result};

/// Relative tolerance used to match an ordinal value against its levels.
const LEVEL_TOLERANCE: f64 = 1e-9;

/// Kind of an input dimension together with its admissible values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableKind {
    /// Real-valued dimension in `[lower, upper]`.
    Continuous {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },
    /// Ordered discrete dimension taking one of `values` (strictly increasing).
    Ordinal {
        /// Admissible values
        values: Vec<f64>,
    },
    /// Unordered discrete dimension, encoded by level index.
    Categorical {
        /// Level labels, in encoding order
        levels: Vec<String>,
    },
}

/// Role of a dimension in a hierarchical domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableRole {
    /// Always participates.
    #[default]
    Neutral,
    /// Decides which decreed dimensions are active.
    Meta,
    /// Participates only when activated by its meta variable(s).
    Decreed,
}

/// One input dimension: its kind, bounds or levels, and its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    kind: VariableKind,
    role: VariableRole,
}

impl VariableDescriptor {
    /// Continuous neutral dimension in `[lower, upper]`.
    pub fn continuous(lower: f64, upper: f64) -> Self {
        Self {
            kind: VariableKind::Continuous { lower, upper },
            role: VariableRole::Neutral,
        }
    }

    /// Ordinal neutral dimension taking one of `values`.
    pub fn ordinal(values: impl Into<Vec<f64>>) -> Self {
        Self {
            kind: VariableKind::Ordinal {
                values: values.into(),
            },
            role: VariableRole::Neutral,
        }
    }

    /// Categorical neutral dimension with the given level labels.
    pub fn categorical<S: Into<String>>(levels: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: VariableKind::Categorical {
                levels: levels.into_iter().map(Into::into).collect(),
            },
            role: VariableRole::Neutral,
        }
    }

    /// Same descriptor with the meta role.
    pub fn meta(mut self) -> Self {
        self.role = VariableRole::Meta;
        self
    }

    /// Same descriptor with the decreed role.
    pub fn decreed(mut self) -> Self {
        self.role = VariableRole::Decreed;
        self
    }

    /// Kind of the dimension.
    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Role of the dimension.
    pub fn role(&self) -> VariableRole {
        self.role
    }

    /// `true` for continuous dimensions.
    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, VariableKind::Continuous { .. })
    }

    /// `true` for ordinal and categorical dimensions.
    pub fn is_discrete(&self) -> bool {
        !self.is_continuous()
    }

    /// Number of levels of a discrete dimension, `None` when continuous.
    pub fn level_count(&self) -> Option<usize> {
        match &self.kind {
            VariableKind::Continuous { .. } => None,
            VariableKind::Ordinal { values } => Some(values.len()),
            VariableKind::Categorical { levels } => Some(levels.len()),
        }
    }

    /// Numeric `(lower, upper)` pair used for the bounds table.
    ///
    /// Categorical dimensions map to the index range of their levels.
    pub fn bounds(&self) -> (f64, f64) {
        match &self.kind {
            VariableKind::Continuous { lower, upper } => (*lower, *upper),
            VariableKind::Ordinal { values } => (
                values.first().copied().unwrap_or(f64::NAN),
                values.last().copied().unwrap_or(f64::NAN),
            ),
            VariableKind::Categorical { levels } => (0.0, levels.len().saturating_sub(1) as f64),
        }
    }

    /// Level index encoded by `value`, `None` when `value` is not admissible
    /// or the dimension is continuous.
    pub fn level_index(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        match &self.kind {
            VariableKind::Continuous { .. } => None,
            VariableKind::Ordinal { values } => values
                .iter()
                .position(|&v| (v - value).abs() <= LEVEL_TOLERANCE * v.abs().max(1.0)),
            VariableKind::Categorical { levels } => {
                if value.fract() == 0.0 && value >= 0.0 && (value as usize) < levels.len() {
                    Some(value as usize)
                } else {
                    None
                }
            }
        }
    }

    /// Encoded value of level `index`, the inverse of [`level_index`](Self::level_index).
    pub fn level_value(&self, index: usize) -> Option<f64> {
        match &self.kind {
            VariableKind::Continuous { .. } => None,
            VariableKind::Ordinal { values } => values.get(index).copied(),
            VariableKind::Categorical { levels } => (index < levels.len()).then_some(index as f64),
        }
    }

    /// Checks the descriptor on its own; `dim` is only used for error reporting.
    pub fn validate(&self, dim: usize) -> Result<()> {
        match &self.kind {
            VariableKind::Continuous { lower, upper } => {
                if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                    return Err(ProblemError::InvalidBounds {
                        dim,
                        lower: *lower,
                        upper: *upper,
                    });
                }
            }
            VariableKind::Ordinal { values } => {
                if values.len() < 2 {
                    return Err(ProblemError::InvalidOrdinal {
                        dim,
                        reason: format!("{} value(s), at least 2 are required", values.len()),
                    });
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(ProblemError::InvalidOrdinal {
                        dim,
                        reason: "values must be finite".to_string(),
                    });
                }
                if values.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(ProblemError::InvalidOrdinal {
                        dim,
                        reason: "values must be strictly increasing".to_string(),
                    });
                }
            }
            VariableKind::Categorical { levels } => {
                if levels.len() < 2 {
                    return Err(ProblemError::TooFewLevels {
                        dim,
                        levels: levels.len(),
                    });
                }
            }
        }
        Ok(())
    }
}
