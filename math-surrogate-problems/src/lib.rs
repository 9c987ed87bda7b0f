#![doc = include_str!("../README.md")]

pub mod dispatch;
pub mod domain;
pub mod error;
pub mod functions;
pub mod options;
pub mod problem;
pub mod registry;
pub mod testing;
pub mod variable;

pub use domain::{ActivationRule, DomainSpec, DomainSpecBuilder};
pub use error::{ProblemError, Result};
pub use functions::*;
pub use options::{OptionSchema, OptionValue, Options};
pub use problem::{Formula, Problem};
pub use registry::ProblemKind;
pub use variable::{VariableDescriptor, VariableKind, VariableRole};
