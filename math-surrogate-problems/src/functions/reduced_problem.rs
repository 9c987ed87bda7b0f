//! Reduced problem: a continuous problem restricted to a subset of its inputs
//!
//! The dimensions that are not exposed are pinned at `(1 - w) * lower + w * upper`.
//! Values and partial derivatives are those of the wrapped problem evaluated
//! at the expanded point.

use ndarray::{Array1, Array2, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};
use crate::functions::unsupported;
use crate::problem::Formula;

/// Wraps a continuous, non-hierarchical formula and exposes only `dims`.
#[derive(Debug)]
pub struct ReducedProblem {
    name: String,
    inner: Box<dyn Formula>,
    inner_domain: DomainSpec,
    dims: Vec<usize>,
    pinned: Vec<(usize, f64)>,
}

impl ReducedProblem {
    /// Exposes dimensions `dims` of `inner` (in that order), pinning the others
    /// at fraction `w` of their range.
    pub fn new<F: Formula + 'static>(inner: F, dims: Vec<usize>, w: f64) -> Result<Self> {
        Self::from_boxed(Box::new(inner), dims, w)
    }

    /// Same as [`new`](Self::new) for an already boxed formula.
    pub fn from_boxed(inner: Box<dyn Formula>, dims: Vec<usize>, w: f64) -> Result<Self> {
        let inner_domain = inner.domain()?;
        if !inner_domain.is_continuous() {
            return Err(ProblemError::InvalidOption {
                name: "inner".to_string(),
                reason: format!("{} has non-continuous inputs", inner.name()),
            });
        }
        let ndim = inner_domain.dimension_count();
        if dims.is_empty() {
            return Err(ProblemError::InvalidOption {
                name: "dims".to_string(),
                reason: "at least one dimension must be exposed".to_string(),
            });
        }
        for (i, &d) in dims.iter().enumerate() {
            if d >= ndim {
                return Err(ProblemError::InvalidOption {
                    name: "dims".to_string(),
                    reason: format!("dimension {d} out of range for {} ({ndim} inputs)", inner.name()),
                });
            }
            if dims[..i].contains(&d) {
                return Err(ProblemError::InvalidOption {
                    name: "dims".to_string(),
                    reason: format!("dimension {d} listed twice"),
                });
            }
        }
        if !(0.0..=1.0).contains(&w) {
            return Err(ProblemError::InvalidOption {
                name: "w".to_string(),
                reason: format!("{w} must lie in [0, 1]"),
            });
        }

        let pinned = (0..ndim)
            .filter(|d| !dims.contains(d))
            .map(|d| {
                let (lo, hi) = inner_domain.variable(d).bounds();
                (d, (1.0 - w) * lo + w * hi)
            })
            .collect();
        Ok(Self {
            name: format!("R_{}", inner.name()),
            inner,
            inner_domain,
            dims,
            pinned,
        })
    }

    /// Exposed dimensions of the wrapped problem.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Pinned `(dimension, value)` pairs.
    pub fn pinned(&self) -> &[(usize, f64)] {
        &self.pinned
    }

    fn expand(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut full = Array2::zeros((x.nrows(), self.inner_domain.dimension_count()));
        for (j, &d) in self.dims.iter().enumerate() {
            full.column_mut(d).assign(&x.column(j));
        }
        for &(d, v) in &self.pinned {
            full.column_mut(d).fill(v);
        }
        full
    }
}

impl Formula for ReducedProblem {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Result<DomainSpec> {
        let bounds: Vec<(f64, f64)> = self
            .dims
            .iter()
            .map(|&d| self.inner_domain.variable(d).bounds())
            .collect();
        DomainSpec::continuous(&bounds)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        self.inner.value(self.expand(x).view(), &self.inner_domain)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        let Some(&d) = self.dims.get(kx) else {
            return Err(unsupported(self.name(), kx));
        };
        self.inner.partial(self.expand(x).view(), d, &self.inner_domain)
    }
}
