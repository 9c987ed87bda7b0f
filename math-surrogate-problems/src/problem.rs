//! The problem contract.
//!
//! A leaf problem implements [`Formula`]: its name, its input domain, the
//! raw value and (where known) the analytic partial derivatives. Wrapping it
//! in a [`Problem`] validates the domain once, caches the bounds table and
//! exposes the uniform, vectorized evaluation entry point used by samplers,
//! surrogate trainers and optimizers.
//!
//! # Example
//!
//! ```rust
//! use math_surrogate_problems::{Problem, Sphere};
//! use ndarray::array;
//!
//! let problem = Problem::new(Sphere::new(2).unwrap()).unwrap();
//! let x = array![[0.0, 0.0], [3.0, 4.0]];
//!
//! let y = problem.evaluate(&x, None).unwrap();
//! assert_eq!(y, array![[0.0], [25.0]]);
//!
//! let dy = problem.evaluate(&x, Some(0)).unwrap();
//! assert_eq!(dy, array![[0.0], [6.0]]);
//! ```

use std::fmt;

use ndarray::{Array1, Array2, ArrayView2};

use crate::dispatch::dispatch;
use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};

/// Capabilities every analytic test function provides.
///
/// `value` and `partial` receive batches that have already been validated
/// against [`domain`](Formula::domain): the column count matches, discrete
/// columns hold admissible levels and, for `partial`, `kx` is a continuous
/// axis that is active on every row of the batch.
pub trait Formula: fmt::Debug + Send + Sync {
    /// Display name of the problem.
    fn name(&self) -> &str;

    /// Input domain. Called once, when the [`Problem`] is built.
    fn domain(&self) -> Result<DomainSpec>;

    /// Function value for each row of `x`.
    fn value(&self, x: ArrayView2<'_, f64>, domain: &DomainSpec) -> Array1<f64>;

    /// Partial derivative with respect to `x[kx]` for each row of `x`.
    ///
    /// The default implementation reports that no analytic derivative exists.
    fn partial(
        &self,
        _x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        Err(ProblemError::UnsupportedDerivative {
            problem: self.name().to_string(),
            kx,
        })
    }
}

/// A constructed problem: formula, validated domain and cached bounds.
///
/// Immutable after construction; `evaluate` is pure, so one instance can be
/// shared between threads.
#[derive(Debug)]
pub struct Problem {
    formula: Box<dyn Formula>,
    domain: DomainSpec,
    xlimits: Array2<f64>,
}

impl Problem {
    /// Builds a problem from a leaf formula.
    ///
    /// Fails when the formula's domain is malformed; no partially built
    /// problem is ever returned.
    pub fn new<F: Formula + 'static>(formula: F) -> Result<Self> {
        Self::from_boxed(Box::new(formula))
    }

    /// Builds a problem from an already boxed formula.
    pub fn from_boxed(formula: Box<dyn Formula>) -> Result<Self> {
        let domain = formula.domain()?;
        if domain.dimension_count() == 0 {
            return Err(ProblemError::InvalidDimension {
                problem: formula.name().to_string(),
                ndim: 0,
                reason: "ndim must be >= 1".to_string(),
            });
        }
        let xlimits = domain.bounds_matrix();
        log::debug!(
            "built problem {} (ndim = {}, hierarchical = {}, continuous = {})",
            formula.name(),
            domain.dimension_count(),
            domain.has_hierarchy(),
            domain.is_continuous()
        );
        Ok(Self {
            formula,
            domain,
            xlimits,
        })
    }

    /// Name of the underlying formula.
    pub fn name(&self) -> &str {
        self.formula.name()
    }

    /// Number of input dimensions.
    pub fn ndim(&self) -> usize {
        self.domain.dimension_count()
    }

    /// ndim x 2 bounds table: `[lower, upper]` per dimension.
    pub fn xlimits(&self) -> &Array2<f64> {
        &self.xlimits
    }

    /// Full description of the input space (kinds, roles, activation rules).
    pub fn xspecs(&self) -> &DomainSpec {
        &self.domain
    }

    /// Leaf formula.
    pub fn formula(&self) -> &dyn Formula {
        self.formula.as_ref()
    }

    /// Evaluates the function (`kx = None`) or its partial derivative with
    /// respect to `x[kx]` on every row of `x`.
    ///
    /// Returns an `(n_samples, 1)` array. Rows on which `kx` is an inactive
    /// decreed dimension are exactly zero.
    pub fn evaluate(&self, x: &Array2<f64>, kx: Option<usize>) -> Result<Array2<f64>> {
        dispatch(self.formula.as_ref(), &self.domain, x.view(), kx)
    }

    /// Same as [`evaluate`](Self::evaluate) for a batch given as rows.
    ///
    /// Every row must hold exactly `ndim` values.
    pub fn evaluate_rows(&self, rows: &[Vec<f64>], kx: Option<usize>) -> Result<Array2<f64>> {
        let x = to_batch(rows, self.ndim())?;
        self.evaluate(&x, kx)
    }

    /// `(n_samples, ndim)` matrix of all partial derivatives.
    ///
    /// Fails if any axis has no analytic derivative (e.g. a categorical axis).
    pub fn gradient(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut g = Array2::zeros((x.nrows(), self.ndim()));
        for kx in 0..self.ndim() {
            let dy = self.evaluate(x, Some(kx))?;
            g.column_mut(kx).assign(&dy.column(0));
        }
        Ok(g)
    }
}

/// Converts rows into the canonical `(n, ndim)` batch.
pub fn to_batch(rows: &[Vec<f64>], ndim: usize) -> Result<Array2<f64>> {
    let mut x = Array2::zeros((rows.len(), ndim));
    for (i, row) in rows.iter().enumerate() {
        if row.len() != ndim {
            return Err(ProblemError::RaggedRows {
                row: i,
                expected: ndim,
                got: row.len(),
            });
        }
        for (j, &v) in row.iter().enumerate() {
            x[[i, j]] = v;
        }
    }
    Ok(x)
}
