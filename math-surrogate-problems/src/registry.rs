//! Closed set of named problems.
//!
//! Maps registry names (`"branin"`, `"tensor_product"`, ...) to problem
//! constructors so that benchmarks can build problems from configuration.
//!
//! ```rust
//! use math_surrogate_problems::ProblemKind;
//!
//! let kind: ProblemKind = "tensor-product".parse().unwrap();
//! let problem = kind
//!     .build(&[("ndim", 3usize.into()), ("func", "exp".into())])
//!     .unwrap();
//! assert_eq!(problem.ndim(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::functions::*;
use crate::options::{OptionSchema, OptionValue};
use crate::problem::Problem;

/// Every named problem of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// [`Branin`]
    Branin,
    /// [`Rosenbrock`]
    Rosenbrock,
    /// [`NdimRosenbrock`]
    NdimRosenbrock,
    /// [`Sphere`]
    Sphere,
    /// [`WaterFlow`]
    WaterFlow,
    /// [`WaterFlowLFidelity`]
    WaterFlowLFidelity,
    /// [`WeldedBeam`]
    WeldedBeam,
    /// [`TorsionVibration`]
    TorsionVibration,
    /// [`WingWeight`]
    WingWeight,
    /// [`RobotArm`]
    RobotArm,
    /// [`NdimRobotArm`]
    NdimRobotArm,
    /// [`CantileverBeam`]
    CantileverBeam,
    /// [`NdimCantileverBeam`]
    NdimCantileverBeam,
    /// [`MixedCantileverBeam`]
    MixedCantileverBeam,
    /// [`HierarchicalNeuralNetwork`]
    HierarchicalNeuralNetwork,
    /// [`TensorProduct`]
    TensorProduct,
    /// [`LpNorm`]
    LpNorm,
    /// [`NdimStepFunction`]
    NdimStepFunction,
}

impl ProblemKind {
    /// All named problems, in registry order.
    pub const ALL: [ProblemKind; 18] = [
        ProblemKind::Branin,
        ProblemKind::Rosenbrock,
        ProblemKind::NdimRosenbrock,
        ProblemKind::Sphere,
        ProblemKind::WaterFlow,
        ProblemKind::WaterFlowLFidelity,
        ProblemKind::WeldedBeam,
        ProblemKind::TorsionVibration,
        ProblemKind::WingWeight,
        ProblemKind::RobotArm,
        ProblemKind::NdimRobotArm,
        ProblemKind::CantileverBeam,
        ProblemKind::NdimCantileverBeam,
        ProblemKind::MixedCantileverBeam,
        ProblemKind::HierarchicalNeuralNetwork,
        ProblemKind::TensorProduct,
        ProblemKind::LpNorm,
        ProblemKind::NdimStepFunction,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            ProblemKind::Branin => "branin",
            ProblemKind::Rosenbrock => "rosenbrock",
            ProblemKind::NdimRosenbrock => "ndim_rosenbrock",
            ProblemKind::Sphere => "sphere",
            ProblemKind::WaterFlow => "water_flow",
            ProblemKind::WaterFlowLFidelity => "water_flow_lfidelity",
            ProblemKind::WeldedBeam => "welded_beam",
            ProblemKind::TorsionVibration => "torsion_vibration",
            ProblemKind::WingWeight => "wing_weight",
            ProblemKind::RobotArm => "robot_arm",
            ProblemKind::NdimRobotArm => "ndim_robot_arm",
            ProblemKind::CantileverBeam => "cantilever_beam",
            ProblemKind::NdimCantileverBeam => "ndim_cantilever_beam",
            ProblemKind::MixedCantileverBeam => "mixed_cantilever_beam",
            ProblemKind::HierarchicalNeuralNetwork => "hierarchical_neural_network",
            ProblemKind::TensorProduct => "tensor_product",
            ProblemKind::LpNorm => "lp_norm",
            ProblemKind::NdimStepFunction => "ndim_step_function",
        }
    }

    /// Options the problem understands.
    pub fn options(self) -> OptionSchema {
        match self {
            ProblemKind::Branin => Branin::options(),
            ProblemKind::Rosenbrock => Rosenbrock::options(),
            ProblemKind::NdimRosenbrock => NdimRosenbrock::options(),
            ProblemKind::Sphere => Sphere::options(),
            ProblemKind::WaterFlow => WaterFlow::options(),
            ProblemKind::WaterFlowLFidelity => WaterFlowLFidelity::options(),
            ProblemKind::WeldedBeam => WeldedBeam::options(),
            ProblemKind::TorsionVibration => TorsionVibration::options(),
            ProblemKind::WingWeight => WingWeight::options(),
            ProblemKind::RobotArm => RobotArm::options(),
            ProblemKind::NdimRobotArm => NdimRobotArm::options(),
            ProblemKind::CantileverBeam => CantileverBeam::options(),
            ProblemKind::NdimCantileverBeam => NdimCantileverBeam::options(),
            ProblemKind::MixedCantileverBeam => MixedCantileverBeam::options(),
            ProblemKind::HierarchicalNeuralNetwork => HierarchicalNeuralNetwork::options(),
            ProblemKind::TensorProduct => TensorProduct::options(),
            ProblemKind::LpNorm => LpNorm::options(),
            ProblemKind::NdimStepFunction => NdimStepFunction::options(),
        }
    }

    /// Resolves `supplied` against the problem's options and builds it.
    pub fn build(self, supplied: &[(&str, OptionValue)]) -> Result<Problem> {
        let opts = self.options().resolve(supplied)?;
        log::debug!("building {} with {:?}", self.name(), opts);
        match self {
            ProblemKind::Branin => Problem::new(Branin::from_options(&opts)?),
            ProblemKind::Rosenbrock => Problem::new(Rosenbrock::from_options(&opts)?),
            ProblemKind::NdimRosenbrock => Problem::new(NdimRosenbrock::from_options(&opts)?),
            ProblemKind::Sphere => Problem::new(Sphere::from_options(&opts)?),
            ProblemKind::WaterFlow => Problem::new(WaterFlow::from_options(&opts)?),
            ProblemKind::WaterFlowLFidelity => {
                Problem::new(WaterFlowLFidelity::from_options(&opts)?)
            }
            ProblemKind::WeldedBeam => Problem::new(WeldedBeam::from_options(&opts)?),
            ProblemKind::TorsionVibration => Problem::new(TorsionVibration::from_options(&opts)?),
            ProblemKind::WingWeight => Problem::new(WingWeight::from_options(&opts)?),
            ProblemKind::RobotArm => Problem::new(RobotArm::from_options(&opts)?),
            ProblemKind::NdimRobotArm => Problem::new(NdimRobotArm::from_options(&opts)?),
            ProblemKind::CantileverBeam => Problem::new(CantileverBeam::from_options(&opts)?),
            ProblemKind::NdimCantileverBeam => {
                Problem::new(NdimCantileverBeam::from_options(&opts)?)
            }
            ProblemKind::MixedCantileverBeam => {
                Problem::new(MixedCantileverBeam::from_options(&opts)?)
            }
            ProblemKind::HierarchicalNeuralNetwork => {
                Problem::new(HierarchicalNeuralNetwork::from_options(&opts)?)
            }
            ProblemKind::TensorProduct => Problem::new(TensorProduct::from_options(&opts)?),
            ProblemKind::LpNorm => Problem::new(LpNorm::from_options(&opts)?),
            ProblemKind::NdimStepFunction => Problem::new(NdimStepFunction::from_options(&opts)?),
        }
    }

    /// Builds the problem with every option at its default.
    pub fn build_default(self) -> Result<Problem> {
        self.build(&[])
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase with `-` and `_` removed.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for ProblemKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = normalize(s);
        ProblemKind::ALL
            .into_iter()
            .find(|k| normalize(k.name()) == t)
            .ok_or_else(|| format!("unknown problem: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ProblemKind::ALL {
            assert_eq!(kind.name().parse::<ProblemKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!("Water-Flow".parse::<ProblemKind>().unwrap(), ProblemKind::WaterFlow);
        assert_eq!("LPNORM".parse::<ProblemKind>().unwrap(), ProblemKind::LpNorm);
        assert_eq!(
            "WaterFlowLFidelity".parse::<ProblemKind>().unwrap(),
            ProblemKind::WaterFlowLFidelity
        );
        assert!("rastrigin".parse::<ProblemKind>().is_err());
    }

    #[test]
    fn test_every_problem_builds_with_defaults() {
        for kind in ProblemKind::ALL {
            let p = kind.build_default().unwrap();
            let ndim = kind.options().resolve(&[]).unwrap().usize("ndim").unwrap();
            assert_eq!(p.ndim(), ndim, "{kind}");
        }
    }

    #[test]
    fn test_build_with_options() {
        let p = ProblemKind::CantileverBeam
            .build(&[("ndim", 9usize.into()), ("E", 100e9.into())])
            .unwrap();
        assert_eq!(p.ndim(), 9);

        let err = ProblemKind::Branin.build(&[("order", 2usize.into())]).unwrap_err();
        assert!(err.is_option_error());
        let err = ProblemKind::Rosenbrock.build(&[("ndim", 1usize.into())]).unwrap_err();
        assert!(err.is_option_error());
    }
}
