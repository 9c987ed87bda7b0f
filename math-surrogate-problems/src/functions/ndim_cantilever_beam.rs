//! Cantilever beam where only the section heights vary

use ndarray::{Array1, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::{CantileverBeam, ReducedProblem};
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, Options, ndim_spec, unit_interval,
};
use crate::problem::Formula;

/// CantileverBeam with `ndim` segments exposing the section heights;
/// widths and lengths are pinned at fraction `w` of their range.
/// Bounds: h_i in [0.3, 0.65]
#[derive(Debug)]
pub struct NdimCantileverBeam {
    reduced: ReducedProblem,
}

impl NdimCantileverBeam {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Reduced beam exposing `ndim` section heights.
    pub fn new(ndim: usize, w: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("NdimCantileverBeam", ndim)?;
        let dims = (0..ndim).map(|i| 3 * i + 1).collect();
        let beam = CantileverBeam::new(3 * ndim, 50e3, 200e9)?;
        let reduced = ReducedProblem::new(beam, dims, w)?;
        Ok(Self { reduced })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("NdimCantileverBeam")
            .declare(ndim_spec(1))
            .declare(OptionSpec::new("w", OptionKind::Float, 0.2.into()).validator(unit_interval))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?, options.float("w")?)
    }
}

impl Formula for NdimCantileverBeam {
    fn name(&self) -> &str {
        "NdimCantileverBeam"
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
