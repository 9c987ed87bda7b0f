//! Routing of an evaluation call to a leaf value or partial derivative.
//!
//! [`dispatch`] is stateless: it validates the batch and the axis, short-cuts
//! rows on which the requested axis is an inactive decreed dimension, and
//! calls the leaf formula once on the remaining rows.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};
use crate::problem::Formula;
use crate::variable::VariableRole;

/// Evaluates `formula` on `x`: the value when `kx` is `None`, otherwise the
/// partial derivative with respect to `x[kx]`.
///
/// Checks, in order: column count, axis range, admissible discrete levels,
/// continuity of the requested axis. Returns an `(n_samples, 1)` array.
pub fn dispatch(
    formula: &dyn Formula,
    domain: &DomainSpec,
    x: ArrayView2<'_, f64>,
    kx: Option<usize>,
) -> Result<Array2<f64>> {
    let ndim = domain.dimension_count();
    if x.ncols() != ndim {
        return Err(ProblemError::ShapeMismatch {
            expected: ndim,
            got: x.ncols(),
        });
    }
    if let Some(k) = kx {
        if k >= ndim {
            return Err(ProblemError::AxisOutOfRange { kx: k, ndim });
        }
    }
    domain.check_batch(x)?;

    let n = x.nrows();
    let y = match kx {
        None => {
            log::trace!("{}: value on {} row(s)", formula.name(), n);
            formula.value(x, domain)
        }
        Some(k) => {
            if !domain.variable(k).is_continuous() {
                return Err(ProblemError::UnsupportedDerivative {
                    problem: formula.name().to_string(),
                    kx: k,
                });
            }
            if domain.variable(k).role() == VariableRole::Decreed {
                partial_on_active_rows(formula, domain, x, k)?
            } else {
                log::trace!("{}: d/dx{} on {} row(s)", formula.name(), k, n);
                formula.partial(x, k, domain)?
            }
        }
    };
    debug_assert_eq!(y.len(), n, "{} returned a misaligned column", formula.name());
    Ok(y.insert_axis(Axis(1)))
}

/// Partial derivative along decreed axis `kx`: zero on rows where `kx` is
/// inactive, leaf derivative on the others.
fn partial_on_active_rows(
    formula: &dyn Formula,
    domain: &DomainSpec,
    x: ArrayView2<'_, f64>,
    kx: usize,
) -> Result<Array1<f64>> {
    let n = x.nrows();
    let active: Vec<usize> = (0..n).filter(|&i| domain.is_active(x.row(i), kx)).collect();
    log::trace!(
        "{}: d/dx{} on {} active row(s), {} inactive row(s) set to zero",
        formula.name(),
        kx,
        active.len(),
        n - active.len()
    );

    let mut y = Array1::zeros(n);
    if active.is_empty() {
        return Ok(y);
    }
    if active.len() == n {
        return formula.partial(x, kx, domain);
    }
    let sub = x.select(Axis(0), &active);
    let dy = formula.partial(sub.view(), kx, domain)?;
    for (&row, &v) in active.iter().zip(dy.iter()) {
        y[row] = v;
    }
    Ok(y)
}
