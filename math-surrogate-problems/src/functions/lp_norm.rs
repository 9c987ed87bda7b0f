//! Lp norm test function

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::{ProblemError, Result};
use crate::functions::unsupported;
use crate::options::{
    Dimensionality, OptionKind, OptionSchema, OptionSpec, OptionValue, Options, ndim_spec,
};
use crate::problem::Formula;

/// Lp norm: f(x) = (Σ |x_i|^p)^(1/p)
/// Global minimum: f(x) = 0 at x = 0
/// Bounds: x_i in [-1, 1]
#[derive(Debug, Clone)]
pub struct LpNorm {
    ndim: usize,
    order: u32,
    exponent: i32,
}

/// Largest order whose `powi` exponent is representable.
const MAX_ORDER: i64 = i32::MAX as i64;

fn order_in_range(value: &OptionValue) -> std::result::Result<(), String> {
    match value {
        OptionValue::Int(v) if (1..=MAX_ORDER).contains(v) => Ok(()),
        other => Err(format!("{other} must be in [1, {MAX_ORDER}]")),
    }
}

/// sign(0) = 0, so the subgradient at a zero coordinate is 0.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl LpNorm {
    /// Admissible dimensionalities.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::AtLeast(1);

    /// Lp norm of order `order` in `ndim` dimensions.
    pub fn new(ndim: usize, order: u32) -> Result<Self> {
        let ndim = Self::DIMENSIONALITY.check("LpNorm", ndim)?;
        let exponent = i32::try_from(order)
            .ok()
            .filter(|&p| p >= 1)
            .ok_or_else(|| ProblemError::InvalidOption {
                name: "order".to_string(),
                reason: format!("{order} must be in [1, {MAX_ORDER}]"),
            })?;
        Ok(Self {
            ndim,
            order,
            exponent,
        })
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("LpNorm")
            .declare(ndim_spec(1))
            .declare(OptionSpec::new("order", OptionKind::Int, 2usize.into()).validator(order_in_range))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        let order = options.usize("order")?;
        let order = u32::try_from(order).map_err(|_| ProblemError::InvalidOption {
            name: "order".to_string(),
            reason: format!("{order} must be in [1, {MAX_ORDER}]"),
        })?;
        Self::new(options.usize("ndim")?, order)
    }

    /// Norm order `p`.
    pub fn order(&self) -> u32 {
        self.order
    }

    fn norm(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self.exponent {
            1 => row.iter().map(|v| v.abs()).sum(),
            2 => row.dot(&row).sqrt(),
            p => row
                .iter()
                .map(|v| v.abs().powi(p))
                .sum::<f64>()
                .powf(1.0 / f64::from(p)),
        }
    }
}

impl Formula for LpNorm {
    fn name(&self) -> &str {
        "LpNorm"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::continuous(&vec![(-1.0, 1.0); self.ndim])
    }

    fn value(&self, x: ArrayView2<'_, f64>, _domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| self.norm(row))
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
        let p = self.exponent;
        Ok(x.map_axis(Axis(1), |row| {
            let norm = self.norm(row);
            if norm == 0.0 {
                return 0.0;
            }
            let v = row[kx];
            // d/dx_k ||x||_p = sign(x_k) (|x_k| / ||x||_p)^(p - 1)
            sign(v) * (v.abs() / norm).powi(p - 1)
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
    fn test_lp_norm_values() {
        let p = Problem::new(LpNorm::new(2, 2).unwrap()).unwrap();
        assert_eq!(p.evaluate(&array![[3.0, 4.0]], None).unwrap(), array![[5.0]]);

        let p = Problem::new(LpNorm::new(3, 1).unwrap()).unwrap();
        assert_eq!(p.evaluate(&array![[0.5, -0.25, 0.0]], None).unwrap(), array![[0.75]]);

        let p = Problem::new(LpNorm::new(2, 3).unwrap()).unwrap();
        let y = p.evaluate(&array![[1.0, -1.0]], None).unwrap();
        assert_relative_eq!(y[[0, 0]], 2f64.powf(1.0 / 3.0), max_relative = 1e-14);
    }

    #[test]
    fn test_lp_norm_partials() {
        for order in [1, 2, 3, 5] {
            let p = Problem::new(LpNorm::new(4, order).unwrap()).unwrap();
            assert_partials_match(&p, &midpoint_batch(&p, 8));
        }
    }

    #[test]
    fn test_lp_norm_gradient_at_origin_is_zero() {
        let p = Problem::new(LpNorm::new(3, 2).unwrap()).unwrap();
        let g = p.gradient(&array![[0.0, 0.0, 0.0]]).unwrap();
        assert_eq!(g, array![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_lp_norm_order_option() {
        let opts = LpNorm::options().resolve(&[("order", 4i64.into())]).unwrap();
        assert_eq!(LpNorm::from_options(&opts).unwrap().order(), 4);
        assert!(LpNorm::options().resolve(&[("order", 0i64.into())]).is_err());
        assert!(LpNorm::new(2, 0).is_err());
    }

    #[test]
    fn test_lp_norm_order_beyond_i32_rejected() {
        let too_large = 1i64 << 31;
        let err = LpNorm::options()
            .resolve(&[("order", too_large.into())])
            .unwrap_err();
        assert!(err.is_option_error(), "{err}");
        assert!(LpNorm::new(2, 1 << 31).unwrap_err().is_option_error());
        assert!(LpNorm::new(2, u32::MAX).unwrap_err().is_option_error());

        let largest = Problem::new(LpNorm::new(2, i32::MAX as u32).unwrap()).unwrap();
        let x = array![[0.5, 0.25]];
        assert!(largest.evaluate(&x, None).unwrap()[[0, 0]].is_finite());
        assert!(largest.evaluate(&x, Some(0)).unwrap()[[0, 0]].is_finite());
    }
}
