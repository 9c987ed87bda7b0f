//! Leaf problems, one module each.

pub mod branin;
pub mod cantilever_beam;
pub mod lp_norm;
pub mod mixed_cantilever_beam;
pub mod ndim_cantilever_beam;
pub mod ndim_robot_arm;
pub mod ndim_rosenbrock;
pub mod ndim_step_function;
pub mod neural_network;
pub mod reduced_problem;
pub mod robot_arm;
pub mod rosenbrock;
pub mod sphere;
pub mod tensor_product;
pub mod torsion_vibration;
pub mod water_flow;
pub mod water_flow_lfidelity;
pub mod welded_beam;
pub mod wing_weight;

pub use branin::Branin;
pub use cantilever_beam::CantileverBeam;
pub use lp_norm::LpNorm;
pub use mixed_cantilever_beam::MixedCantileverBeam;
pub use ndim_cantilever_beam::NdimCantileverBeam;
pub use ndim_robot_arm::NdimRobotArm;
pub use ndim_rosenbrock::NdimRosenbrock;
pub use ndim_step_function::NdimStepFunction;
pub use neural_network::HierarchicalNeuralNetwork;
pub use reduced_problem::ReducedProblem;
pub use robot_arm::RobotArm;
pub use rosenbrock::Rosenbrock;
pub use sphere::Sphere;
pub use tensor_product::{TensorFunction, TensorProduct};
pub use torsion_vibration::TorsionVibration;
pub use water_flow::WaterFlow;
pub use water_flow_lfidelity::WaterFlowLFidelity;
pub use welded_beam::WeldedBeam;
pub use wing_weight::WingWeight;

use crate::error::ProblemError;

/// Error for an axis a leaf has no analytic derivative for.
pub(crate) fn unsupported(problem: &str, kx: usize) -> ProblemError {
    ProblemError::UnsupportedDerivative {
        problem: problem.to_string(),
        kx,
    }
}
