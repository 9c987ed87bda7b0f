//! Cantilever beam test function

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};
use crate::functions::unsupported;
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, Options, ndim_spec, positive,
};
use crate::problem::Formula;

/// Tip deflection of a stepped cantilever beam under a tip load.
///
/// Inputs come in `(b, h, l)` triples, one per segment from the clamped end:
/// section width, section height and segment length.
/// Bounds: b in [0.01, 0.05], h in [0.3, 0.65], l in [0.5, 1]
#[derive(Debug, Clone)]
pub struct CantileverBeam {
    ndim: usize,
    load: f64,
    modulus: f64,
}

impl CantileverBeam {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::MultipleOf(3);

    /// Beam with `ndim / 3` segments, tip load `load` (N) and Young's modulus
    /// `modulus` (Pa).
    pub fn new(ndim: usize, load: f64, modulus: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("CantileverBeam", ndim)?;
        for (name, v) in [("P", load), ("E", modulus)] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(ProblemError::InvalidOption {
                    name: name.to_string(),
                    reason: format!("{v} must be > 0"),
                });
            }
        }
        Ok(Self {
            ndim,
            load,
            modulus,
        })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("CantileverBeam")
            .declare(ndim_spec(3))
            .declare(OptionSpec::new("P", OptionKind::Float, 50e3.into()).validator(positive))
            .declare(OptionSpec::new("E", OptionKind::Float, 200e9.into()).validator(positive))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(
            options.usize("ndim")?,
            options.float("P")?,
            options.float("E")?,
        )
    }

    /// Per segment `j`: `(c_j, S_j)` where `c_j = P / (3E) * 12 / (b_j h_j³)`
    /// and `S_j` is the distance from the start of segment `j` to the tip.
    fn segments(&self, row: ArrayView1<'_, f64>) -> Vec<(f64, f64)> {
        let scale = self.load / (3.0 * self.modulus);
        let mut out = vec![(0.0, 0.0); self.ndim / 3];
        let mut to_tip = 0.0;
        for j in (0..out.len()).rev() {
            let (b, h, l) = (row[3 * j], row[3 * j + 1], row[3 * j + 2]);
            to_tip += l;
            out[j] = (scale * 12.0 / (b * h.powi(3)), to_tip);
        }
        out
    }
}

/// Distance from the end of segment `j` to the tip.
fn next_to_tip(segments: &[(f64, f64)], j: usize) -> f64 {
    segments.get(j + 1).map_or(0.0, |s| s.1)
}

impl Formula for CantileverBeam {
    fn name(&self) -> &str {
        "CantileverBeam"
    }

    fn domain(&self) -> Result<DomainSpec> {
        let bounds: Vec<(f64, f64)> = (0..self.ndim)
            .map(|i| match i % 3 {
                0 => (0.01, 0.05),
                1 => (0.3, 0.65),
                _ => (0.5, 1.0),
            })
            .collect();
        DomainSpec::continuous(&bounds)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| {
            let segs = self.segments(row);
            segs.iter()
                .enumerate()
                .map(|(j, &(c, s))| c * (s.powi(3) - next_to_tip(&segs, j).powi(3)))
                .sum::<f64>()
        })
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
        let k = kx / 3;
        Ok(x.map_axis(Axis(1), |row| {
            let segs = self.segments(row);
            let term = |j: usize| segs[j].1.powi(3) - next_to_tip(&segs, j).powi(3);
            match kx % 3 {
                0 => -segs[k].0 * term(k) / row[kx],
                1 => -3.0 * segs[k].0 * term(k) / row[kx],
                // l_k moves S_j for every j <= k and S_{j+1} for every j < k
                _ => (0..=k)
                    .map(|j| {
                        let (c, s) = segs[j];
                        let inner = if j < k { next_to_tip(&segs, j).powi(2) } else { 0.0 };
                        3.0 * c * (s * s - inner)
                    })
                    .sum::<f64>(),
            }
        }))
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
    fn test_single_segment_matches_beam_theory() {
        // delta = P L^3 / (3 E I), I = b h^3 / 12
        let p = Problem::new(CantileverBeam::new(3, 50e3, 200e9).unwrap()).unwrap();
        let (b, h, l) = (0.03, 0.5, 0.8f64);
        let y = p.evaluate(&array![[b, h, l]], None).unwrap();
        let inertia = b * h.powi(3) / 12.0;
        assert_relative_eq!(y[[0, 0]], 50e3 * l.powi(3) / (3.0 * 200e9 * inertia), max_relative = 1e-12);
    }

    #[test]
    fn test_identical_segments_equal_one_long_segment() {
        let one = Problem::new(CantileverBeam::new(3, 50e3, 200e9).unwrap()).unwrap();
        let two = Problem::new(CantileverBeam::new(6, 50e3, 200e9).unwrap()).unwrap();
        let y1 = one.evaluate(&array![[0.02, 0.4, 1.6]], None).unwrap();
        let y2 = two.evaluate(&array![[0.02, 0.4, 0.8, 0.02, 0.4, 0.8]], None).unwrap();
        assert_relative_eq!(y1[[0, 0]], y2[[0, 0]], max_relative = 1e-12);
    }

    #[test]
    fn test_cantilever_partials() {
        for ndim in [3, 9] {
            let p = Problem::new(CantileverBeam::new(ndim, 50e3, 200e9).unwrap()).unwrap();
            assert_partials_match(&p, &midpoint_batch(&p, 8));
        }
    }

    #[test]
    fn test_cantilever_options() {
        let opts = CantileverBeam::options()
            .resolve(&[("ndim", 6usize.into()), ("P", 1e3.into())])
            .unwrap();
        assert!(CantileverBeam::from_options(&opts).is_ok());
        assert!(CantileverBeam::options().resolve(&[("E", (-1.0).into())]).is_err());
        assert!(CantileverBeam::new(4, 50e3, 200e9).unwrap_err().is_option_error());
    }
}
