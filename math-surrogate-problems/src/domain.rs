//! Input space of a problem: variable kinds, roles and activation rules.
//!
//! A [`DomainSpec`] is built once when a problem is constructed and is
//! immutable afterwards. Besides the bounds table it owns the hierarchy
//! logic: given one input row, [`DomainSpec::active_mask`] tells which decreed
//! dimensions take part in the function for that row. Every hierarchical
//! problem consumes this mask instead of re-deriving meta/decreed logic.
//!
//! # Example
//!
//! ```rust
//! use math_surrogate_problems::{DomainSpec, VariableDescriptor};
//! use ndarray::array;
//!
//! let domain = DomainSpec::builder()
//!     .variable(VariableDescriptor::ordinal(vec![1.0, 2.0]).meta())
//!     .variable(VariableDescriptor::continuous(0.0, 1.0).decreed())
//!     .variable(VariableDescriptor::continuous(0.0, 1.0).decreed())
//!     .activate(0, 1.0, &[1])
//!     .activate(0, 2.0, &[1, 2])
//!     .build()
//!     .expect("valid domain");
//!
//! assert_eq!(domain.active_mask(array![1.0, 0.5, 0.5].view()), vec![true, true, false]);
//! assert_eq!(domain.active_mask(array![2.0, 0.5, 0.5].view()), vec![true, true, true]);
//! ```

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ProblemError, Result};
use crate::variable::{VariableDescriptor, VariableRole};

/// Decreed dimensions activated when a meta dimension takes one of its levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRule {
    /// Governing meta dimension
    pub meta: usize,
    /// Level index of the meta value this rule applies to
    pub level: usize,
    /// Decreed dimensions active under that value
    pub decreed: Vec<usize>,
}

/// Ordered collection of variable descriptors plus the activation table.
///
/// Deserialized domains go through the same checks as
/// [`DomainSpecBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomainSpec")]
pub struct DomainSpec {
    variables: Vec<VariableDescriptor>,
    rules: Vec<ActivationRule>,
}

/// Unchecked wire form of a [`DomainSpec`].
#[derive(Deserialize)]
struct RawDomainSpec {
    variables: Vec<VariableDescriptor>,
    rules: Vec<ActivationRule>,
}

impl TryFrom<RawDomainSpec> for DomainSpec {
    type Error = ProblemError;

    fn try_from(raw: RawDomainSpec) -> Result<Self> {
        let mut builder = DomainSpec::builder().variables(raw.variables.iter().cloned());
        for rule in &raw.rules {
            let value = raw
                .variables
                .get(rule.meta)
                .and_then(|v| v.level_value(rule.level))
                .ok_or_else(|| ProblemError::InvalidActivation {
                    reason: format!(
                        "level {} of dimension {} does not exist",
                        rule.level, rule.meta
                    ),
                })?;
            builder = builder.activate(rule.meta, value, &rule.decreed);
        }
        builder.build()
    }
}

impl DomainSpec {
    /// Starts a builder for a mixed or hierarchical domain.
    pub fn builder() -> DomainSpecBuilder {
        DomainSpecBuilder::default()
    }

    /// Degenerate domain: continuous neutral dimensions with the given bounds.
    pub fn continuous(bounds: &[(f64, f64)]) -> Result<Self> {
        bounds
            .iter()
            .fold(Self::builder(), |b, &(lo, hi)| {
                b.variable(VariableDescriptor::continuous(lo, hi))
            })
            .build()
    }

    /// Number of input dimensions.
    pub fn dimension_count(&self) -> usize {
        self.variables.len()
    }

    /// All descriptors in column order.
    pub fn variables(&self) -> &[VariableDescriptor] {
        &self.variables
    }

    /// Descriptor of dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= dimension_count()`.
    pub fn variable(&self, dim: usize) -> &VariableDescriptor {
        &self.variables[dim]
    }

    /// Activation table.
    pub fn rules(&self) -> &[ActivationRule] {
        &self.rules
    }

    /// `true` when the domain declares decreed dimensions.
    pub fn has_hierarchy(&self) -> bool {
        self.variables
            .iter()
            .any(|v| v.role() == VariableRole::Decreed)
    }

    /// `true` when every dimension is continuous.
    pub fn is_continuous(&self) -> bool {
        self.variables.iter().all(VariableDescriptor::is_continuous)
    }

    /// Indices of the meta dimensions.
    pub fn meta_dims(&self) -> Vec<usize> {
        self.dims_with_role(VariableRole::Meta)
    }

    /// Indices of the decreed dimensions.
    pub fn decreed_dims(&self) -> Vec<usize> {
        self.dims_with_role(VariableRole::Decreed)
    }

    /// Meta dimensions that govern decreed dimension `dim`.
    pub fn governing_metas(&self, dim: usize) -> Vec<usize> {
        let mut metas: Vec<usize> = self
            .rules
            .iter()
            .filter(|r| r.decreed.contains(&dim))
            .map(|r| r.meta)
            .collect();
        metas.sort_unstable();
        metas.dedup();
        metas
    }

    fn dims_with_role(&self, role: VariableRole) -> Vec<usize> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.role() == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// ndim x 2 table of numeric bounds, one `[lower, upper]` row per dimension.
    pub fn bounds_matrix(&self) -> Array2<f64> {
        let mut xlimits = Array2::zeros((self.variables.len(), 2));
        for (i, v) in self.variables.iter().enumerate() {
            let (lo, hi) = v.bounds();
            xlimits[[i, 0]] = lo;
            xlimits[[i, 1]] = hi;
        }
        xlimits
    }

    /// Which dimensions take part in the function for `row`.
    ///
    /// Neutral and meta dimensions are always active. A decreed dimension is
    /// active when every meta dimension governing it holds, in `row`, a value
    /// whose rule lists it. A meta value without a rule activates nothing.
    ///
    /// # Panics
    ///
    /// Panics if `row` is shorter than `dimension_count()`.
    pub fn active_mask(&self, row: ArrayView1<'_, f64>) -> Vec<bool> {
        let mut mask: Vec<bool> = self
            .variables
            .iter()
            .map(|v| v.role() != VariableRole::Decreed)
            .collect();
        if !self.has_hierarchy() {
            return mask;
        }
        for dim in self.decreed_dims() {
            mask[dim] = self.is_active(row, dim);
        }
        mask
    }

    /// Whether dimension `dim` takes part in the function for `row`.
    ///
    /// A `dim` outside the domain is never active.
    ///
    /// # Panics
    ///
    /// Panics if `row` is shorter than `dimension_count()`.
    pub fn is_active(&self, row: ArrayView1<'_, f64>, dim: usize) -> bool {
        match self.variables.get(dim) {
            None => return false,
            Some(v) if v.role() != VariableRole::Decreed => return true,
            Some(_) => {}
        }
        let metas = self.governing_metas(dim);
        !metas.is_empty()
            && metas.iter().all(|&meta| {
                let level = self.variables[meta].level_index(row[meta]);
                self.rules
                    .iter()
                    .any(|r| r.meta == meta && Some(r.level) == level && r.decreed.contains(&dim))
            })
    }

    /// Checks that every discrete column of `x` holds an admissible level.
    ///
    /// Continuous columns are not bounds-checked: evaluating slightly outside
    /// `xlimits` (e.g. for finite differences) is allowed.
    pub fn check_batch(&self, x: ArrayView2<'_, f64>) -> Result<()> {
        for (dim, v) in self.variables.iter().enumerate() {
            if v.is_continuous() {
                continue;
            }
            for (row, &value) in x.column(dim).iter().enumerate() {
                if v.level_index(value).is_none() {
                    return Err(ProblemError::OutOfDomain { row, dim, value });
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`DomainSpec`]; all checks run in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DomainSpecBuilder {
    variables: Vec<VariableDescriptor>,
    pending: Vec<(usize, f64, Vec<usize>)>,
}

impl DomainSpecBuilder {
    /// Appends one dimension.
    pub fn variable(mut self, v: VariableDescriptor) -> Self {
        self.variables.push(v);
        self
    }

    /// Appends several dimensions.
    pub fn variables(mut self, vs: impl IntoIterator<Item = VariableDescriptor>) -> Self {
        self.variables.extend(vs);
        self
    }

    /// Declares that `decreed` dimensions are active when dimension `meta`
    /// takes the value `value` (a level value for ordinals, a level index for
    /// categoricals). Repeated declarations for the same value are merged.
    pub fn activate(mut self, meta: usize, value: f64, decreed: &[usize]) -> Self {
        self.pending.push((meta, value, decreed.to_vec()));
        self
    }

    /// Validates everything and freezes the domain.
    pub fn build(self) -> Result<DomainSpec> {
        let variables = self.variables;
        for (dim, v) in variables.iter().enumerate() {
            v.validate(dim)?;
        }

        let has_meta = variables.iter().any(|v| v.role() == VariableRole::Meta);
        for (dim, v) in variables.iter().enumerate() {
            match v.role() {
                VariableRole::Decreed if !has_meta => {
                    return Err(ProblemError::MissingMeta { dim });
                }
                VariableRole::Meta if v.is_continuous() => {
                    return Err(ProblemError::ContinuousMeta { dim });
                }
                _ => {}
            }
        }

        let mut rules: Vec<ActivationRule> = Vec::new();
        for (meta, value, decreed) in self.pending {
            let Some(meta_var) = variables.get(meta) else {
                return Err(ProblemError::InvalidActivation {
                    reason: format!(
                        "meta dimension {meta} out of range for {} dimension(s)",
                        variables.len()
                    ),
                });
            };
            if meta_var.role() != VariableRole::Meta {
                return Err(ProblemError::InvalidActivation {
                    reason: format!("dimension {meta} is not a meta variable"),
                });
            }
            let Some(level) = meta_var.level_index(value) else {
                return Err(ProblemError::InvalidActivation {
                    reason: format!("{value} is not a level of meta dimension {meta}"),
                });
            };
            for &d in &decreed {
                match variables.get(d) {
                    None => {
                        return Err(ProblemError::InvalidActivation {
                            reason: format!(
                                "dimension {d} out of range for {} dimension(s)",
                                variables.len()
                            ),
                        });
                    }
                    Some(v) if v.role() != VariableRole::Decreed => {
                        return Err(ProblemError::InvalidActivation {
                            reason: format!("dimension {d} is not a decreed variable"),
                        });
                    }
                    Some(_) => {}
                }
            }
            match rules.iter_mut().find(|r| r.meta == meta && r.level == level) {
                Some(rule) => rule.decreed.extend(decreed),
                None => rules.push(ActivationRule {
                    meta,
                    level,
                    decreed,
                }),
            }
        }
        for rule in &mut rules {
            rule.decreed.sort_unstable();
            rule.decreed.dedup();
        }

        for (dim, v) in variables.iter().enumerate() {
            if v.role() == VariableRole::Decreed && !rules.iter().any(|r| r.decreed.contains(&dim))
            {
                return Err(ProblemError::UngovernedDecreed { dim });
            }
        }

        Ok(DomainSpec { variables, rules })
    }
}
