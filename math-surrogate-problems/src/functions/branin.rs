//! Branin test function

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView2, Zip};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

const B: f64 = 5.1 / (4.0 * PI * PI);
const C: f64 = 5.0 / PI;
const R: f64 = 6.0;
const S: f64 = 10.0;
const T: f64 = 1.0 / (8.0 * PI);

/// Branin function - multimodal, 2D only
/// Global minimum: f(x) = 0.397887 at x = (-π, 12.275), (π, 2.275), (9.42478, 2.475)
/// Bounds: x1 in [-5, 10], x2 in [0, 15]
#[derive(Debug, Clone, Default)]
pub struct Branin;

impl Branin {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(2);

    /// Branin in its standard 2D form.
    pub fn new() -> Self {
        Branin
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("Branin").declare(ndim_spec(2))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("Branin", options.usize("ndim")?)?;
        Ok(Branin)
    }
}

impl Formula for Branin {
    fn name(&self) -> &str {
        "Branin"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&[(-5.0, 10.0), (0.0, 15.0)])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        Zip::from(x.column(0))
            .and(x.column(1))
            .map_collect(|&x1, &x2| {
                let u = x2 - B * x1 * x1 + C * x1 - R;
                u * u + S * (1.0 - T) * x1.cos() + S
            })
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        let (x1, x2) = (x.column(0), x.column(1));
        match kx {
            0 => Ok(Zip::from(x1).and(x2).map_collect(|&x1, &x2| {
                let u = x2 - B * x1 * x1 + C * x1 - R;
                2.0 * u * (C - 2.0 * B * x1) - S * (1.0 - T) * x1.sin()
            })),
            1 => Ok(Zip::from(x1)
                .and(x2)
                .map_collect(|&x1, &x2| 2.0 * (x2 - B * x1 * x1 + C * x1 - R))),
            _ => Err(unsupported(self.name(), kx)),
        }
    }
}
