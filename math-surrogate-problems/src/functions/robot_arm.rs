//! Robot arm test function

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;

/// Distance of the end of a planar arm from its shoulder.
///
/// Inputs come in `(length, angle)` pairs, one per segment; each angle is
/// relative to the previous segment.
/// Bounds: lengths in [0, 1], angles in [0, 2π]
#[derive(Debug, Clone)]
pub struct RobotArm {
    ndim: usize,
}

/// End position and cumulative angles of every segment.
fn end_position(row: ArrayView1<'_, f64>) -> (f64, f64, Vec<f64>) {
    let mut angle = 0.0;
    let (mut px, mut py) = (0.0, 0.0);
    let mut cumulative = Vec::with_capacity(row.len() / 2);
    for pair in row.exact_chunks(2) {
        angle += pair[1];
        px += pair[0] * angle.cos();
        py += pair[0] * angle.sin();
        cumulative.push(angle);
    }
    (px, py, cumulative)
}

impl RobotArm {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::MultipleOf(2);

    /// Arm with `ndim / 2` segments.
    pub fn new(ndim: usize) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("RobotArm", ndim)?;
        Ok(Self { ndim })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("RobotArm").declare(ndim_spec(2))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?)
    }
}

impl Formula for RobotArm {
    fn name(&self) -> &str {
        "RobotArm"
    }

    fn domain(&self) -> Result<DomainSpec> {
        let bounds: Vec<(f64, f64)> = (0..self.ndim)
            .map(|i| if i % 2 == 0 { (0.0, 1.0) } else { (0.0, 2.0 * PI) })
            .collect();
        DomainSpec::continuous(&bounds)
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| {
            let (px, py, _) = end_position(row);
            px.hypot(py)
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
        let segment = kx / 2;
        Ok(x.map_axis(Axis(1), |row| {
            let (px, py, cumulative) = end_position(row);
            let f = px.hypot(py);
            if f == 0.0 {
                return 0.0;
            }
            let (dpx, dpy) = if kx % 2 == 0 {
                (cumulative[segment].cos(), cumulative[segment].sin())
            } else {
                // Turning joint k rotates every segment from k on.
                (segment..cumulative.len()).fold((0.0, 0.0), |(dx, dy), j| {
                    let l = row[2 * j];
                    (dx - l * cumulative[j].sin(), dy + l * cumulative[j].cos())
                })
            };
            (px * dpx + py * dpy) / f
        }))
    }
}
