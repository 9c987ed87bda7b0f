//! Smooth N-dimensional step function

use ndarray::{Array1, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::{TensorFunction, TensorProduct};
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, Options, ndim_spec, positive,
};
use crate::problem::Formula;

/// Product of steep tanh steps: f(x) = Π_i tanh(width x_i)
/// Bounds: x_i in [-1, 1]
#[derive(Debug, Clone)]
pub struct NdimStepFunction {
    tensor: TensorProduct,
}

impl NdimStepFunction {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Step function in `ndim` dimensions; larger `width` gives a sharper step.
    pub fn new(ndim: usize, width: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("NdimStepFunction", ndim)?;
        Ok(Self {
            tensor: TensorProduct::new(ndim, TensorFunction::Tanh, width)?,
        })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("NdimStepFunction")
            .declare(ndim_spec(1))
            .declare(OptionSpec::new("width", OptionKind::Float, 10.0.into()).validator(positive))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?, options.float("width")?)
    }
}

impl Formula for NdimStepFunction {
    fn name(&self) -> &str {
        "NdimStepFunction"
    }

    fn domain(&self) -> Result<DomainSpec> {
        self.tensor.domain()
    }

    fn value(&self, x: ArrayView2<'_, f64>, domain: &DomainSpec) -> Array1<f64> {
        self.tensor.value(x, domain)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        self.tensor.partial(x, kx, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use ndarray::array;

    #[test]
    fn test_step_shape() {
        let p = Problem::new(NdimStepFunction::new(1, 10.0).unwrap()).unwrap();
        let y = p.evaluate(&array![[-1.0], [0.0], [1.0]], None).unwrap();
        assert!(y[[0, 0]] < -0.9999);
        assert_eq!(y[[1, 0]], 0.0);
        assert!(y[[2, 0]] > 0.9999);
    }

    #[test]
    fn test_step_partials() {
        let p = Problem::new(NdimStepFunction::new(3, 10.0).unwrap()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 8));
    }

    #[test]
    fn test_step_default_width() {
        let opts = NdimStepFunction::options().resolve(&[]).unwrap();
        let f = NdimStepFunction::from_options(&opts).unwrap();
        assert_eq!(f.name(), "NdimStepFunction");
        assert!(NdimStepFunction::new(0, 10.0).is_err());
    }
}
