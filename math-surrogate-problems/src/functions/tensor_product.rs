//! Tensor-product test function

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};
use crate::functions::unsupported;
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, OptionValue, Options, ndim_spec,
    positive,
};
use crate::problem::Formula;

/// One-dimensional factor of a [`TensorProduct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensorFunction {
    /// cos(a π x)
    Cos,
    /// exp(a x)
    Exp,
    /// tanh(a x)
    Tanh,
    /// exp(-2 a x²)
    Gaussian,
}

impl TensorFunction {
    /// All factors, in declaration order.
    pub const ALL: [TensorFunction; 4] = [
        TensorFunction::Cos,
        TensorFunction::Exp,
        TensorFunction::Tanh,
        TensorFunction::Gaussian,
    ];

    /// Option spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            TensorFunction::Cos => "cos",
            TensorFunction::Exp => "exp",
            TensorFunction::Tanh => "tanh",
            TensorFunction::Gaussian => "gaussian",
        }
    }

    fn eval(self, a: f64, v: f64) -> f64 {
        match self {
            TensorFunction::Cos => (a * PI * v).cos(),
            TensorFunction::Exp => (a * v).exp(),
            TensorFunction::Tanh => (a * v).tanh(),
            TensorFunction::Gaussian => (-2.0 * a * v * v).exp(),
        }
    }

    fn derivative(self, a: f64, v: f64) -> f64 {
        match self {
            TensorFunction::Cos => -a * PI * (a * PI * v).sin(),
            TensorFunction::Exp => a * (a * v).exp(),
            TensorFunction::Tanh => a / (a * v).cosh().powi(2),
            TensorFunction::Gaussian => -4.0 * a * v * (-2.0 * a * v * v).exp(),
        }
    }
}

impl fmt::Display for TensorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TensorFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "cos" => Ok(TensorFunction::Cos),
            "exp" => Ok(TensorFunction::Exp),
            "tanh" => Ok(TensorFunction::Tanh),
            "gaussian" | "gauss" => Ok(TensorFunction::Gaussian),
            _ => Err(format!("unknown tensor function: {s}")),
        }
    }
}

fn tensor_function(value: &OptionValue) -> std::result::Result<(), String> {
    match value {
        OptionValue::Str(s) => s.parse::<TensorFunction>().map(|_| ()),
        other => Err(format!("{other} is not a tensor function")),
    }
}

/// Tensor product of one-dimensional factors: f(x) = Π_i g(a x_i)
/// Bounds: x_i in [-1, 1]
#[derive(Debug, Clone)]
pub struct TensorProduct {
    ndim: usize,
    func: TensorFunction,
    width: f64,
}

impl TensorProduct {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Tensor product of `func` with width `width` in `ndim` dimensions.
    pub fn new(ndim: usize, func: TensorFunction, width: f64) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("TensorProduct", ndim)?;
        if !(width > 0.0 && width.is_finite()) {
            return Err(ProblemError::InvalidOption {
                name: "width".to_string(),
                reason: format!("{width} must be > 0"),
            });
        }
        Ok(Self { ndim, func, width })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("TensorProduct")
            .declare(ndim_spec(1))
            .declare(OptionSpec::new("func", OptionKind::Str, "cos".into()).validator(tensor_function))
            .declare(OptionSpec::new("width", OptionKind::Float, 1.0.into()).validator(positive))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        let func = options
            .string("func")?
            .parse()
            .map_err(|reason| ProblemError::InvalidOption {
                name: "func".to_string(),
                reason,
            })?;
        Self::new(options.usize("ndim")?, func, options.float("width")?)
    }

    /// Factor function.
    pub fn func(&self) -> TensorFunction {
        self.func
    }

    /// Width parameter `a`.
    pub fn width(&self) -> f64 {
        self.width
    }
}

impl Formula for TensorProduct {
    fn name(&self) -> &str {
        "TensorProduct"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&vec![(-1.0, 1.0); self.ndim])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        let (func, a) = (self.func, self.width);
        x.map_axis(Axis(1), |row| row.iter().map(|&v| func.eval(a, v)).product::<f64>())
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
        let (func, a) = (self.func, self.width);
        Ok(x.map_axis(Axis(1), |row| {
            row.iter()
                .enumerate()
                .map(|(i, &v)| if i == kx { func.derivative(a, v) } else { func.eval(a, v) })
                .product::<f64>()
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
    fn test_tensor_product_values() {
        let p = Problem::new(TensorProduct::new(2, TensorFunction::Cos, 1.0).unwrap()).unwrap();
        let y = p.evaluate(&array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.3]], None).unwrap();
        assert_relative_eq!(y[[0, 0]], 1.0);
        assert_relative_eq!(y[[1, 0]], -1.0);
        assert!(y[[2, 0]].abs() < 1e-15);

        let p = Problem::new(TensorProduct::new(3, TensorFunction::Exp, 2.0).unwrap()).unwrap();
        let y = p.evaluate(&array![[0.1, 0.2, 0.3]], None).unwrap();
        assert_relative_eq!(y[[0, 0]], (1.2f64).exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_tensor_product_partials_every_factor() {
        for func in TensorFunction::ALL {
            for width in [0.5, 1.0, 3.0] {
                let p = Problem::new(TensorProduct::new(3, func, width).unwrap()).unwrap();
                assert_partials_match(&p, &midpoint_batch(&p, 6));
            }
        }
    }

    #[test]
    fn test_tensor_product_options() {
        let opts = TensorProduct::options()
            .resolve(&[("ndim", 4usize.into()), ("func", "gaussian".into())])
            .unwrap();
        let f = TensorProduct::from_options(&opts).unwrap();
        assert_eq!(f.func(), TensorFunction::Gaussian);
        assert_eq!(f.width(), 1.0);

        let err = TensorProduct::options()
            .resolve(&[("func", "sin".into())])
            .unwrap_err();
        assert!(err.is_option_error());
        assert!(TensorProduct::options().resolve(&[("width", 0.0.into())]).is_err());
        assert!(TensorProduct::new(2, TensorFunction::Tanh, -1.0).is_err());
    }

    #[test]
    fn test_tensor_function_from_str() {
        for func in TensorFunction::ALL {
            assert_eq!(func.as_str().parse::<TensorFunction>().unwrap(), func);
        }
        assert_eq!("TANH".parse::<TensorFunction>().unwrap(), TensorFunction::Tanh);
        assert!("sin".parse::<TensorFunction>().is_err());
    }
}
