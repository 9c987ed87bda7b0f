//! Welded beam test function
//!
//! Maximum shear stress in the weld of a cantilever beam carrying a 6000 lb
//! load at 14 in. Inputs are the weld thickness offset `t`, the weld height
//! `h` and the weld length `l`.

use std::f64::consts::SQRT_2;

use ndarray::{Array1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

const LOAD: f64 = 6000.0;
const ARM: f64 = 14.0;

/// Shear stress and its directional derivative along `(dt, dh, dl)`.
fn shear_stress(t: f64, h: f64, l: f64, seed: [f64; 3]) -> (f64, f64) {
    let [dt, dh, dl] = seed;
    let s = t + h;
    let ds = dt + dh;

    let tau1 = LOAD / (SQRT_2 * h * l);
    let dtau1 = -tau1 * (dh / h + dl / l);

    let m = LOAD * (ARM + 0.5 * l);
    let dm = 0.5 * LOAD * dl;

    let r = (0.25 * (l * l + s * s)).sqrt();
    let dr = 0.25 * (l * dl + s * ds) / r;

    let g = l * l / 12.0 + s * s / 4.0;
    let dg = l * dl / 6.0 + s * ds / 2.0;
    let j = 1.414 * h * l * g;
    let dj = 1.414 * (dh * l * g + h * dl * g + h * l * dg);

    let tau2 = m * r / j;
    let dtau2 = (dm * r + m * dr) / j - tau2 * dj / j;

    let q = tau1 * tau1 + tau2 * tau2 + l * tau1 * tau2 / r;
    let dq = 2.0 * tau1 * dtau1
        + 2.0 * tau2 * dtau2
        + (dl * tau1 * tau2 + l * dtau1 * tau2 + l * tau1 * dtau2) / r
        - l * tau1 * tau2 * dr / (r * r);

    let tau = q.sqrt();
    (tau, dq / (2.0 * tau))
}

/// Welded beam function - 3D
/// Variables: t in [5, 10], h in [0.1, 10], l in [0.1, 10]
#[derive(Debug, Clone, Default)]
pub struct WeldedBeam;

impl WeldedBeam {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(3);

    /// Welded beam in its standard 3D form.
    pub fn new() -> Self {
        WeldedBeam
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("WeldedBeam").declare(ndim_spec(3))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("WeldedBeam", options.usize("ndim")?)?;
        Ok(WeldedBeam)
    }
}

impl Formula for WeldedBeam {
    fn name(&self) -> &str {
        "WeldedBeam"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&[(5.0, 10.0), (0.1, 10.0), (0.1, 10.0)])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| shear_stress(row[0], row[1], row[2], [0.0; 3]).0)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        if kx >= 3 {
            return Err(unsupported(self.name(), kx));
        }
        let mut seed = [0.0; 3];
        seed[kx] = 1.0;
        Ok(x.map_axis(Axis(1), |row| shear_stress(row[0], row[1], row[2], seed).1))
    }
}
