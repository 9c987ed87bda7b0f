//! Low-fidelity water flow (borehole) test function

use ndarray::{Array1, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::functions::water_flow::{BOREHOLE_BOUNDS, Borehole};
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

/// Cheap approximation of [`WaterFlow`](crate::functions::WaterFlow):
/// 2π becomes 5 and the leading 1 of the denominator becomes 1.5.
/// Variables: rw, r, Tu, Hu, Tl, Hl, L, Kw
#[derive(Debug, Clone, Default)]
pub struct WaterFlowLFidelity;

impl WaterFlowLFidelity {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(8);

    const MODEL: Borehole = Borehole { k: 5.0, c: 1.5 };

    /// Low-fidelity water flow in its standard 8D form.
    pub fn new() -> Self {
        WaterFlowLFidelity
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("WaterFlowLFidelity").declare(ndim_spec(8))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("WaterFlowLFidelity", options.usize("ndim")?)?;
        Ok(WaterFlowLFidelity)
    }
}

impl Formula for WaterFlowLFidelity {
    fn name(&self) -> &str {
        "WaterFlowLFidelity"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&BOREHOLE_BOUNDS)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        Self::MODEL.value(x)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        Self::MODEL
            .partial(x, kx)
            .ok_or_else(|| unsupported(self.name(), kx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::WaterFlow;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};

    #[test]
    fn test_low_fidelity_tracks_high_fidelity() {
        let lo = Problem::new(WaterFlowLFidelity::new()).unwrap();
        let hi = Problem::new(WaterFlow::new()).unwrap();
        let x = midpoint_batch(&hi, 20);
        let (ylo, yhi) = (lo.evaluate(&x, None).unwrap(), hi.evaluate(&x, None).unwrap());
        for (a, b) in ylo.iter().zip(yhi.iter()) {
            assert!(*a > 0.0 && *b > 0.0);
            // Same order of magnitude, but not the same model.
            assert!(a / b > 0.3 && a / b < 1.5);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_low_fidelity_partials() {
        let p = Problem::new(WaterFlowLFidelity::new()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 10));
    }
}
