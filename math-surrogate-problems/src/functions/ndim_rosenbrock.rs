//! Rosenbrock function with one pinned leading input

use ndarray::{Array1, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::{ReducedProblem, Rosenbrock};
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, Options, ndim_spec, unit_interval,
};
use crate::problem::Formula;

/// Rosenbrock in `ndim + 1` dimensions with x0 pinned at `(1 - w) * -2 + w * 2`;
/// inputs x1..=x_ndim are exposed.
/// Bounds: x_i in [-2, 2]
#[derive(Debug)]
pub struct NdimRosenbrock {
    reduced: ReducedProblem,
}

impl NdimRosenbrock {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(2);

    /// Reduced Rosenbrock exposing `ndim` inputs.
    pub fn new(ndim: usize, w: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("NdimRosenbrock", ndim)?;
        let reduced = ReducedProblem::new(Rosenbrock::new(ndim + 1)?, (1..=ndim).collect(), w)?;
        Ok(Self { reduced })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("NdimRosenbrock")
            .declare(ndim_spec(2))
            .declare(OptionSpec::new("w", OptionKind::Float, 0.2.into()).validator(unit_interval))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?, options.float("w")?)
    }
}

impl Formula for NdimRosenbrock {
    fn name(&self) -> &str {
        "NdimRosenbrock"
    }

    fn domain(&self) -> Result<DomainSpec> {
        self.reduced.domain()
    }

    fn value(&self, x: ArrayView2<'_, f64>, domain: &DomainSpec) -> Array1<f64> {
        self.reduced.value(x, domain)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        self.reduced.partial(x, kx, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use ndarray::array;

    #[test]
    fn test_ndim_rosenbrock_pins_first_input() {
        // w = 0.75 pins x0 at 1, so f(1, .., 1) = 0
        let p = Problem::new(NdimRosenbrock::new(3, 0.75).unwrap()).unwrap();
        assert_eq!(p.ndim(), 3);
        assert_eq!(p.evaluate(&array![[1.0, 1.0, 1.0]], None).unwrap(), array![[0.0]]);
    }

    #[test]
    fn test_ndim_rosenbrock_partials() {
        let p = Problem::new(NdimRosenbrock::new(4, 0.2).unwrap()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 8));
    }

    #[test]
    fn test_ndim_rosenbrock_options() {
        let opts = NdimRosenbrock::options().resolve(&[]).unwrap();
        let f = NdimRosenbrock::from_options(&opts).unwrap();
        assert_eq!(f.domain().unwrap().dimension_count(), 2);
        assert!(NdimRosenbrock::options().resolve(&[("w", 2.0.into())]).is_err());
        assert!(NdimRosenbrock::new(1, 0.2).is_err());
    }
}
