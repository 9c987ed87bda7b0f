//! Wing weight test function

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

const BOUNDS: [(f64, f64); 10] = [
    (150.0, 200.0),
    (220.0, 300.0),
    (6.0, 10.0),
    (-10.0, 10.0),
    (16.0, 45.0),
    (0.5, 1.0),
    (0.08, 0.18),
    (2.5, 6.0),
    (1700.0, 2500.0),
    (0.025, 0.08),
];

/// Power-law exponents of Sw, Wfw, A, q, λ, tc, Nz, Wdg in the structural term.
const EXPONENTS: [(usize, f64); 8] = [
    (0, 0.758),
    (1, 0.0035),
    (2, 0.6),
    (4, 0.006),
    (5, 0.04),
    (6, -0.3),
    (7, 0.49),
    (8, 0.49),
];

/// Structural weight term, without the paint weight Sw * Wp.
fn structural(x: ArrayView1<'_, f64>) -> f64 {
    let (sw, wfw, a, sweep, q, taper, tc, nz, wdg) =
        (x[0], x[1], x[2], x[3].to_radians(), x[4], x[5], x[6], x[7], x[8]);
    let cos = sweep.cos();
    0.036
        * sw.powf(0.758)
        * wfw.powf(0.0035)
        * (a / (cos * cos)).powf(0.6)
        * q.powf(0.006)
        * taper.powf(0.04)
        * (100.0 * tc / cos).powf(-0.3)
        * (nz * wdg).powf(0.49)
}

/// Wing weight function - 10D light aircraft wing model
/// Variables: Sw, Wfw, A, Λ (degrees), q, λ, tc, Nz, Wdg, Wp
#[derive(Debug, Clone, Default)]
pub struct WingWeight;

impl WingWeight {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(10);

    /// Wing weight in its standard 10D form.
    pub fn new() -> Self {
        WingWeight
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("WingWeight").declare(ndim_spec(10))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("WingWeight", options.usize("ndim")?)?;
        Ok(WingWeight)
    }
}

impl Formula for WingWeight {
    fn name(&self) -> &str {
        "WingWeight"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&BOUNDS)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| structural(row) + row[0] * row[9])
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        match kx {
            // cos Λ enters as cos^-1.2 * cos^0.3 = cos^-0.9
            3 => Ok(x.map_axis(Axis(1), |row| {
                0.9 * structural(row) * row[3].to_radians().tan() * PI / 180.0
            })),
            9 => Ok(x.column(0).to_owned()),
            _ => {
                let Some(&(_, e)) = EXPONENTS.iter().find(|(d, _)| *d == kx) else {
                    return Err(unsupported(self.name(), kx));
                };
                let paint = if kx == 0 { 1.0 } else { 0.0 };
                Ok(x.map_axis(Axis(1), |row| e * structural(row) / row[kx] + paint * row[9]))
            }
        }
    }
}
