//! Rosenbrock test function

use ndarray::{Array1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

/// Rosenbrock function - N-dimensional, narrow curved valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-2, 2]
#[derive(Debug, Clone)]
pub struct Rosenbrock {
    ndim: usize,
}

impl Rosenbrock {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(2);

    /// Rosenbrock in `ndim` dimensions.
    pub fn new(ndim: usize) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("Rosenbrock", ndim)?;
        Ok(Self { ndim })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("Rosenbrock").declare(ndim_spec(2))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?)
    }
}

impl Formula for Rosenbrock {
    fn name(&self) -> &str {
        "Rosenbrock"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&vec![(-2.0, 2.0); self.ndim])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| {
            row.windows(2)
                .into_iter()
                .map(|w| (1.0 - w[0]).powi(2) + 100.0 * (w[1] - w[0] * w[0]).powi(2))
                .sum::<f64>()
        })
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        let n = self.ndim;
        if kx >= n {
            return Err(unsupported(self.name(), kx));
        }
        Ok(x.map_axis(Axis(1), |row| {
            let xk = row[kx];
            let mut d = 0.0;
            // xk as the left member of pair (k, k+1)
            if kx + 1 < n {
                d += -2.0 * (1.0 - xk) - 400.0 * xk * (row[kx + 1] - xk * xk);
            }
            // xk as the right member of pair (k-1, k)
            if kx > 0 {
                let prev = row[kx - 1];
                d += 200.0 * (xk - prev * prev);
            }
            d
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use ndarray::{Array2, array};

    #[test]
    fn test_rosenbrock_global_minimum() {
        for ndim in [2, 5, 10] {
            let p = Problem::new(Rosenbrock::new(ndim).unwrap()).unwrap();
            let x = Array2::ones((1, ndim));
            assert_eq!(p.evaluate(&x, None).unwrap(), array![[0.0]]);
            let g = p.gradient(&x).unwrap();
            assert!(g.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_rosenbrock_known_value() {
        let p = Problem::new(Rosenbrock::new(2).unwrap()).unwrap();
        // (1 - 0)^2 + 100 (0 - 0)^2
        assert_eq!(p.evaluate(&array![[0.0, 0.0]], None).unwrap(), array![[1.0]]);
        // (1 + 1)^2 + 100 (1 - 1)^2
        assert_eq!(p.evaluate(&array![[-1.0, 1.0]], None).unwrap(), array![[4.0]]);
    }

    #[test]
    fn test_rosenbrock_partials() {
        let p = Problem::new(Rosenbrock::new(4).unwrap()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 10));
    }

    #[test]
    fn test_rosenbrock_needs_two_dims() {
        assert!(Rosenbrock::new(1).is_err());
    }
}
