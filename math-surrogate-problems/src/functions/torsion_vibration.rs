//! Torsion vibration test function
//!
//! Lowest natural frequency of a shaft carrying two disks, modelled as two
//! inertias J1, J2 coupled by three torsional springs K1, K2, K3.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

const LOWER: [f64; 15] = [
    1.8, 9.0, 1.053e7, 7.2, 10.8, 2.1, 9.0, 7.92e7, 0.9, 10.8, 1.62, 7.2, 9.0, 1.053e7, 7.2,
];
const UPPER: [f64; 15] = [
    2.2, 11.0, 1.287e7, 8.8, 13.2, 2.9, 11.0, 9.68e7, 1.1, 13.2, 1.98, 8.8, 11.0, 1.287e7, 8.8,
];

#[derive(Debug, Clone, Copy)]
enum Part {
    K1,
    K2,
    K3,
    J1,
    J2,
}

/// Every stiffness and inertia is a monomial; each input enters exactly one
/// of them with the given exponent.
const ENTERS: [(Part, i32); 15] = [
    (Part::K1, 1),
    (Part::K1, -1),
    (Part::K1, 1),
    (Part::J1, 1),
    (Part::J1, 4),
    (Part::J1, 1),
    (Part::K2, -1),
    (Part::K2, 1),
    (Part::K2, 1),
    (Part::J2, 4),
    (Part::J2, 1),
    (Part::J2, 1),
    (Part::K3, -1),
    (Part::K3, 1),
    (Part::K3, 1),
];

/// `[K1, K2, K3, J1, J2]`
fn parts(x: ArrayView1<'_, f64>) -> [f64; 5] {
    [
        PI * x[2] * x[0] / (32.0 * x[1]),
        PI * x[7] * x[8] / (32.0 * x[6]),
        PI * x[13] * x[14] / (32.0 * x[12]),
        x[5] * PI * x[3] * x[4].powi(4) / 32.0,
        x[10] * PI * x[11] * x[9].powi(4) / 32.0,
    ]
}

fn frequency(x: ArrayView1<'_, f64>) -> f64 {
    let [k1, k2, k3, j1, j2] = parts(x);
    let s = (k1 + k2) / j1 + (k2 + k3) / j2;
    let c = (k1 * k2 + k2 * k3 + k3 * k1) / (j1 * j2);
    let lambda = (s - (s * s - 4.0 * c).sqrt()) / 2.0;
    lambda.sqrt() / (2.0 * PI)
}

fn frequency_partial(x: ArrayView1<'_, f64>, kx: usize) -> f64 {
    let p = parts(x);
    let [k1, k2, k3, j1, j2] = p;
    let (part, exponent) = ENTERS[kx];
    let mut d = [0.0; 5];
    d[part as usize] = exponent as f64 * p[part as usize] / x[kx];
    let [dk1, dk2, dk3, dj1, dj2] = d;

    let s = (k1 + k2) / j1 + (k2 + k3) / j2;
    let ds = (dk1 + dk2) / j1 - (k1 + k2) * dj1 / (j1 * j1) + (dk2 + dk3) / j2
        - (k2 + k3) * dj2 / (j2 * j2);
    let c = (k1 * k2 + k2 * k3 + k3 * k1) / (j1 * j2);
    let dp = dk1 * (k2 + k3) + dk2 * (k1 + k3) + dk3 * (k1 + k2);
    let dc = dp / (j1 * j2) - c * (dj1 / j1 + dj2 / j2);

    let root = (s * s - 4.0 * c).sqrt();
    let droot = (2.0 * s * ds - 4.0 * dc) / (2.0 * root);
    let lambda = (s - root) / 2.0;
    let dlambda = (ds - droot) / 2.0;
    dlambda / (4.0 * PI * lambda.sqrt())
}

/// Torsion vibration function - 15D
/// Variables: shaft 1 (d, L, G), disk 1 (ρ, D, t), shaft 2 (L, G, d),
/// disk 2 (D, t, ρ), shaft 3 (L, G, d)
#[derive(Debug, Clone, Default)]
pub struct TorsionVibration;

impl TorsionVibration {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(15);

    /// Torsion vibration in its standard 15D form.
    pub fn new() -> Self {
        TorsionVibration
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("TorsionVibration").declare(ndim_spec(15))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("TorsionVibration", options.usize("ndim")?)?;
        Ok(TorsionVibration)
    }
}

impl Formula for TorsionVibration {
    fn name(&self) -> &str {
        "TorsionVibration"
    }

    fn domain(&self) -> Result<DomainSpec> {
        let bounds: Vec<(f64, f64)> = LOWER.into_iter().zip(UPPER).collect();
        DomainSpec::continuous(&bounds)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), frequency)
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        _domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        if kx >= ENTERS.len() {
            return Err(unsupported(self.name(), kx));
        }
        Ok(x.map_axis(Axis(1), |row| frequency_partial(row, kx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use ndarray::Array2;

    #[test]
    fn test_torsion_vibration_positive_frequency() {
        let p = Problem::new(TorsionVibration::new()).unwrap();
        let mid = Array2::from_shape_fn((1, 15), |(_, j)| 0.5 * (LOWER[j] + UPPER[j]));
        let y = p.evaluate(&mid, None).unwrap();
        assert!(y[[0, 0]].is_finite() && y[[0, 0]] > 0.0);
    }

    #[test]
    fn test_stiffer_shaft_raises_frequency() {
        let p = Problem::new(TorsionVibration::new()).unwrap();
        let mid = Array2::from_shape_fn((1, 15), |(_, j)| 0.5 * (LOWER[j] + UPPER[j]));
        let g = p.gradient(&mid).unwrap();
        // Shear moduli raise the frequency, shaft lengths lower it.
        assert!(g[[0, 2]] > 0.0 && g[[0, 7]] > 0.0 && g[[0, 13]] > 0.0);
        assert!(g[[0, 1]] < 0.0 && g[[0, 6]] < 0.0 && g[[0, 12]] < 0.0);
    }

    #[test]
    fn test_torsion_vibration_partials() {
        let p = Problem::new(TorsionVibration::new()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 10));
    }
}
