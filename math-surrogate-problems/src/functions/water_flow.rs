//! Water flow (borehole) test function

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

/// Bounds of rw, r, Tu, Hu, Tl, Hl, L, Kw.
pub(crate) const BOREHOLE_BOUNDS: [(f64, f64); 8] = [
    (0.05, 0.15),
    (100.0, 50000.0),
    (63070.0, 115600.0),
    (990.0, 1110.0),
    (63.1, 116.0),
    (700.0, 820.0),
    (1120.0, 1680.0),
    (9855.0, 12045.0),
];

/// Flow rate through a borehole, f = k Tu (Hu - Hl) / (ln(r/rw) (c + Tu/Tl) + 2 L Tu / (rw² Kw)).
///
/// The high-fidelity model uses `k = 2π`, `c = 1`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Borehole {
    pub(crate) k: f64,
    pub(crate) c: f64,
}

impl Borehole {
    fn terms(&self, x: ArrayView1<'_, f64>) -> (f64, f64, f64) {
        let (rw, r, tu, hu, tl, hl, l, kw) = (x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7]);
        let lnr = (r / rw).ln();
        let num = self.k * tu * (hu - hl);
        let den = lnr * (self.c + tu / tl) + 2.0 * l * tu / (rw * rw * kw);
        (lnr, num, den)
    }

    pub(crate) fn value(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.map_axis(Axis(1), |row| {
            let (_, num, den) = self.terms(row);
            num / den
        })
    }

    /// None when `kx` is not one of the eight inputs.
    pub(crate) fn partial(&self, x: ArrayView2<'_, f64>, kx: usize) -> Option<Array1<f64>> {
        if kx >= 8 {
            return None;
        }
        let (k, c) = (self.k, self.c);
        Some(x.map_axis(Axis(1), |row| {
            let (rw, r, tu, hu, tl, hl, l, kw) =
                (row[0], row[1], row[2], row[3], row[4], row[5], row[6], row[7]);
            let (lnr, num, den) = self.terms(row);
            let a = c + tu / tl;
            let b = 2.0 * l * tu / (rw * rw * kw);
            // (dN, dD) for the requested input
            let (dn, dd) = match kx {
                0 => (0.0, -a / rw - 2.0 * b / rw),
                1 => (0.0, a / r),
                2 => (k * (hu - hl), lnr / tl + b / tu),
                3 => (k * tu, 0.0),
                4 => (0.0, -lnr * tu / (tl * tl)),
                5 => (-k * tu, 0.0),
                6 => (0.0, b / l),
                _ => (0.0, -b / kw),
            };
            dn / den - num * dd / (den * den)
        }))
    }
}

/// Water flow function - 8D borehole model
/// Variables: rw, r, Tu, Hu, Tl, Hl, L, Kw
#[derive(Debug, Clone, Default)]
pub struct WaterFlow;

impl WaterFlow {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(8);

    const MODEL: Borehole = Borehole { k: 2.0 * PI, c: 1.0 };

    /// Water flow in its standard 8D form.
    pub fn new() -> Self {
        WaterFlow
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("WaterFlow").declare(ndim_spec(8))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("WaterFlow", options.usize("ndim")?)?;
        Ok(WaterFlow)
    }
}

impl Formula for WaterFlow {
    fn name(&self) -> &str {
        "WaterFlow"
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
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_water_flow_reference_point() {
        let p = Problem::new(WaterFlow::new()).unwrap();
        let x = array![[0.1, 25050.0, 89335.0, 1050.0, 89.55, 760.0, 1400.0, 10950.0]];
        let (rw, r, tu, hu, tl, hl, l, kw) = (0.1f64, 25050.0, 89335.0, 1050.0, 89.55, 760.0, 1400.0, 10950.0);
        let expected = 2.0 * PI * tu * (hu - hl)
            / ((r / rw).ln() * (1.0 + 2.0 * l * tu / ((r / rw).ln() * rw * rw * kw) + tu / tl));
        let y = p.evaluate(&x, None).unwrap();
        assert_relative_eq!(y[[0, 0]], expected, max_relative = 1e-12);
        assert!(y[[0, 0]] > 0.0);
    }

    #[test]
    fn test_water_flow_partials() {
        let p = Problem::new(WaterFlow::new()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 10));
    }

    #[test]
    fn test_water_flow_bounds() {
        let p = Problem::new(WaterFlow::new()).unwrap();
        assert_eq!(p.ndim(), 8);
        assert_eq!(p.xlimits()[[1, 1]], 50000.0);
        assert_eq!(p.xlimits()[[7, 0]], 9855.0);
    }
}
