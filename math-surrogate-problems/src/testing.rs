//! Validation helpers for problems
//!
//! Tools to generate admissible input batches inside a problem's bounds and to
//! compare analytic partial derivatives against central finite differences.
//! Reports are serializable so they can be exported alongside benchmark
//! results.

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problem::Problem;
use crate::variable::{VariableDescriptor, VariableKind};

/// Relative step used for central finite differences, scaled by the axis range.
pub const FD_STEP: f64 = 1e-6;

/// Default tolerance of [`DerivativeReport::passes`].
pub const FD_TOLERANCE: f64 = 1e-4;

/// Comparison of one analytic partial derivative with its finite-difference estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisCheck {
    /// Derivative axis
    pub kx: usize,
    /// Row of the batch with the largest error
    pub worst_row: usize,
    /// Analytic value at the worst row
    pub analytic: f64,
    /// Finite-difference estimate at the worst row
    pub finite_difference: f64,
    /// Largest error, relative to the local scale of the function
    pub max_error: f64,
}

/// Derivative check of a whole problem on one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeReport {
    /// Problem name
    pub problem: String,
    /// Number of rows checked
    pub n_samples: usize,
    /// One entry per continuous axis
    pub axes: Vec<AxisCheck>,
}

impl DerivativeReport {
    /// Largest error over all axes.
    pub fn max_error(&self) -> f64 {
        self.axes.iter().map(|a| a.max_error).fold(0.0, f64::max)
    }

    /// `true` when every axis is within `tol`.
    pub fn passes(&self, tol: f64) -> bool {
        self.max_error() <= tol
    }
}

/// Deterministic, well-spread batch of `n` admissible points.
///
/// Continuous coordinates follow an additive recurrence kept away from the
/// bounds; discrete coordinates cycle through their levels.
pub fn midpoint_batch(problem: &Problem, n: usize) -> Array2<f64> {
    let vars = problem.xspecs().variables();
    let mut x = Array2::zeros((n, vars.len()));
    for (j, v) in vars.iter().enumerate() {
        // Distinct irrational stride per axis.
        let stride = ((j as f64 + 2.0) * 1.618_033_988_749_895).sqrt().fract();
        for i in 0..n {
            let t = 0.1 + 0.8 * (0.5 + (i as f64 + 1.0) * stride).fract();
            x[[i, j]] = coordinate(v, t, i);
        }
    }
    x
}

/// Uniformly random batch of `n` admissible points.
pub fn random_batch<R: Rng>(problem: &Problem, n: usize, rng: &mut R) -> Array2<f64> {
    let vars = problem.xspecs().variables();
    let mut x = Array2::zeros((n, vars.len()));
    for i in 0..n {
        for (j, v) in vars.iter().enumerate() {
            let t: f64 = rng.random();
            let level = v.level_count().map_or(0, |k| rng.random_range(0..k));
            x[[i, j]] = coordinate(v, t, level);
        }
    }
    x
}

fn coordinate(v: &VariableDescriptor, t: f64, level: usize) -> f64 {
    match v.kind() {
        VariableKind::Continuous { lower, upper } => lower + t * (upper - lower),
        VariableKind::Ordinal { values } => values[level % values.len()],
        VariableKind::Categorical { levels } => (level % levels.len()) as f64,
    }
}

/// Compares every continuous analytic partial with central finite differences.
///
/// The error on a row is `|analytic - fd| / (|analytic| + |f| / range)`,
/// i.e. relative to the derivative itself or, where it vanishes, to the
/// typical slope of the function over the axis range. Rows on which a
/// decreed axis is inactive compare the dispatcher's zero against the
/// finite difference of a function that ignores the axis.
pub fn check_partials(problem: &Problem, x: &Array2<f64>) -> Result<DerivativeReport> {
    let y = problem.evaluate(x, None)?;
    let mut axes = Vec::new();
    for (kx, v) in problem.xspecs().variables().iter().enumerate() {
        let VariableKind::Continuous { lower, upper } = *v.kind() else {
            continue;
        };
        let range = upper - lower;
        let h = FD_STEP * range;
        let analytic = problem.evaluate(x, Some(kx))?;

        let mut plus = x.clone();
        let mut minus = x.clone();
        plus.column_mut(kx).mapv_inplace(|v| v + h);
        minus.column_mut(kx).mapv_inplace(|v| v - h);
        let fd = (problem.evaluate(&plus, None)? - problem.evaluate(&minus, None)?) / (2.0 * h);

        let mut check = AxisCheck {
            kx,
            worst_row: 0,
            analytic: 0.0,
            finite_difference: 0.0,
            max_error: 0.0,
        };
        for i in 0..x.nrows() {
            let (a, f) = (analytic[[i, 0]], fd[[i, 0]]);
            let scale = a.abs() + y[[i, 0]].abs() / range + f64::MIN_POSITIVE;
            let err = (a - f).abs() / scale;
            if err > check.max_error || i == 0 {
                check = AxisCheck {
                    kx,
                    worst_row: i,
                    analytic: a,
                    finite_difference: f,
                    max_error: err,
                };
            }
        }
        axes.push(check);
    }
    log::debug!(
        "derivative check of {} on {} row(s): max error {:.3e}",
        problem.name(),
        x.nrows(),
        axes.iter().map(|a| a.max_error).fold(0.0, f64::max)
    );
    Ok(DerivativeReport {
        problem: problem.name().to_string(),
        n_samples: x.nrows(),
        axes,
    })
}

/// Panics unless every continuous partial matches finite differences within
/// [`FD_TOLERANCE`].
pub fn assert_partials_match(problem: &Problem, x: &Array2<f64>) {
    let report = match check_partials(problem, x) {
        Ok(report) => report,
        Err(e) => panic!("derivative check of {} failed: {e}", problem.name()),
    };
    for axis in &report.axes {
        assert!(
            axis.max_error <= FD_TOLERANCE,
            "{}: d/dx{} analytic {} vs finite difference {} at row {} (error {:.3e})",
            report.problem,
            axis.kx,
            axis.analytic,
            axis.finite_difference,
            axis.worst_row,
            axis.max_error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{HierarchicalNeuralNetwork, Sphere};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_midpoint_batch_inside_bounds() {
        let p = Problem::new(Sphere::new(4).unwrap()).unwrap();
        let x = midpoint_batch(&p, 20);
        assert_eq!(x.dim(), (20, 4));
        for row in x.rows() {
            for &v in row.iter() {
                assert!((-10.0..=10.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_batches_are_admissible_for_mixed_domains() {
        let p = Problem::new(HierarchicalNeuralNetwork::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for x in [midpoint_batch(&p, 12), random_batch(&p, 50, &mut rng)] {
            assert!(p.xspecs().check_batch(x.view()).is_ok());
            assert!(p.evaluate(&x, None).is_ok());
        }
    }

    #[test]
    fn test_report_serializes() {
        let p = Problem::new(Sphere::new(2).unwrap()).unwrap();
        let report = check_partials(&p, &midpoint_batch(&p, 4)).unwrap();
        assert_eq!(report.axes.len(), 2);
        assert!(report.passes(FD_TOLERANCE));
        let json = serde_json::to_string(&report).unwrap();
        let back: DerivativeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.problem, "Sphere");
    }
}
