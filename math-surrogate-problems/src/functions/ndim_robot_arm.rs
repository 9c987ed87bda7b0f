//! Robot arm with pinned segment lengths and base angle

use ndarray::{Array1, ArrayView2};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::{ReducedProblem, RobotArm};
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, Options, ndim_spec, unit_interval,
};
use crate::problem::Formula;

/// RobotArm with `ndim + 1` segments where only the relative angles of
/// segments 1..=ndim vary; lengths and the base angle are pinned at
/// fraction `w` of their range.
/// Bounds: angles in [0, 2π]
#[derive(Debug)]
pub struct NdimRobotArm {
    reduced: ReducedProblem,
}

impl NdimRobotArm {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Reduced robot arm exposing `ndim` joint angles.
    pub fn new(ndim: usize, w: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("NdimRobotArm", ndim)?;
        let dims = (1..=ndim).map(|i| 2 * i + 1).collect();
        let reduced = ReducedProblem::new(RobotArm::new(2 * (ndim + 1))?, dims, w)?;
        Ok(Self { reduced })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("NdimRobotArm")
            .declare(ndim_spec(1))
            .declare(OptionSpec::new("w", OptionKind::Float, 0.2.into()).validator(unit_interval))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.usize("ndim")?, options.float("w")?)
    }
}

impl Formula for NdimRobotArm {
    fn name(&self) -> &str {
        "NdimRobotArm"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_ndim_robot_arm_exposes_angles() {
        let arm = NdimRobotArm::new(2, 0.2).unwrap();
        assert_eq!(arm.reduced.dims(), &[3, 5]);
        let p = Problem::new(arm).unwrap();
        assert_eq!(p.ndim(), 2);
        // Three segments of length 0.2, all aligned.
        let y = p.evaluate(&array![[0.0, 0.0]], None).unwrap();
        assert_abs_diff_eq!(y[[0, 0]], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_ndim_robot_arm_partials() {
        let p = Problem::new(NdimRobotArm::new(3, 0.2).unwrap()).unwrap();
        assert_partials_match(&p, &midpoint_batch(&p, 8));
    }
}
