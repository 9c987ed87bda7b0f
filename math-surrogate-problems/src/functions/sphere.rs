//! Sphere test function

use ndarray::{Array1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

/// Sphere function - unimodal, convex, N-dimensional
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-10, 10]
#[derive(Debug, Clone)]
pub struct Sphere {
    ndim: usize,
}

impl Sphere {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Sphere in `ndim` dimensions.
    pub fn new(ndim: usize) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("Sphere", ndim)?;
        Ok(Self { ndim })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("Sphere").declare(ndim_spec(1))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?)
    }
}

impl Formula for Sphere {
    fn name(&self) -> &str {
        "Sphere"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&vec![(-10.0, 10.0); self.ndim])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| row.dot(&row))
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        if kx >= self.ndim {
            return Err(unsupported(self.name(), kx));
        }
        Ok(x.column(kx).mapv(|v| 2.0 * v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use ndarray::array;

    #[test]
    fn test_sphere_values() {
        let p = Problem::new(Sphere::new(2).unwrap()).unwrap();
        let y = p.evaluate(&array![[0.0, 0.0], [1.0, 1.0], [3.0, 4.0]], None).unwrap();
        assert_eq!(y, array![[0.0], [2.0], [25.0]]);
    }

    #[test]
    fn test_sphere_partials() {
        let p = Problem::new(Sphere::new(2).unwrap()).unwrap();
        let dy = p.evaluate(&array![[1.0, 2.0]], Some(1)).unwrap();
        assert_eq!(dy, array![[4.0]]);

        let p = Problem::new(Sphere::new(6).unwrap()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 8));
    }

    #[test]
    fn test_sphere_bounds() {
        let p = Problem::new(Sphere::new(3).unwrap()).unwrap();
        assert_eq!(p.xlimits(), &array![[-10.0, 10.0], [-10.0, 10.0], [-10.0, 10.0]]);
        assert!(Sphere::new(0).unwrap_err().is_option_error());
    }
}
