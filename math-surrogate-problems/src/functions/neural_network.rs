//! Hierarchical neural-network test function
//!
//! Mimics the validation error of a multilayer perceptron as a function of
//! its hyperparameters. The number of hidden layers is a meta variable: it
//! decides how many of the per-layer inputs x5, x6, x7 take part.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;
use crate::variable::VariableDescriptor;

const LAYERS: usize = 0;
const LEARNING_RATE: usize = 1;
const DECAY: usize = 2;
const BATCH: usize = 3;
const ACTIVATION: usize = 4;

/// Activation function levels of x4.
pub const ACTIVATIONS: [&str; 3] = ["ReLU", "SELU", "ISRLU"];

/// Coefficients of (x1, x2, log2(x3) - 3) per activation level.
const NEUTRAL_COEFFS: [[f64; 3]; 3] = [[2.0, 1.0, -0.5], [-1.0, 2.0, -0.5], [-1.0, 1.0, 0.5]];

/// Hierarchical neural network function - 8D, mixed and hierarchical
/// Variables: layers in {1, 2, 3} (meta), x1 in [-5, -2], x2 in [-5, -1],
/// batch size in {8, .., 256}, activation in {ReLU, SELU, ISRLU},
/// per-layer x5, x6, x7 in [0, 5] (active up to the number of layers)
#[derive(Debug, Clone, Default)]
pub struct HierarchicalNeuralNetwork;

impl HierarchicalNeuralNetwork {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(8);

    /// Hierarchical neural network in its standard form.
    pub fn new() -> Self {
        HierarchicalNeuralNetwork
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("HierarchicalNeuralNetwork").declare(ndim_spec(8))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("HierarchicalNeuralNetwork", options.usize("ndim")?)?;
        Ok(HierarchicalNeuralNetwork)
    }
}

/// All NaN when the activation column does not hold a level of `domain`.
fn coeffs(row: ArrayView1<'_, f64>, domain: &DomainSpec) -> [f64; 3] {
    domain
        .variables()
        .get(ACTIVATION)
        .and_then(|v| v.level_index(row[ACTIVATION]))
        .and_then(|i| NEUTRAL_COEFFS.get(i))
        .copied()
        .unwrap_or([f64::NAN; 3])
}

fn layer_term(dim: usize, v: f64) -> f64 {
    match dim {
        5 => v * v,
        6 => 0.3 * v,
        _ => -0.1 * v.powi(3),
    }
}

impl Formula for HierarchicalNeuralNetwork {
    fn name(&self) -> &str {
        "HierarchicalNeuralNetwork"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::builder()
            .variable(VariableDescriptor::ordinal(vec![1.0, 2.0, 3.0]).meta())
            .variable(VariableDescriptor::continuous(-5.0, -2.0))
            .variable(VariableDescriptor::continuous(-5.0, -1.0))
            .variable(VariableDescriptor::ordinal(vec![8.0, 16.0, 32.0, 64.0, 128.0, 256.0]))
            .variable(VariableDescriptor::categorical(ACTIVATIONS))
            .variables((5..8).map(|_| VariableDescriptor::continuous(0.0, 5.0).decreed()))
            .activate(LAYERS, 1.0, &[5])
            .activate(LAYERS, 2.0, &[5, 6])
            .activate(LAYERS, 3.0, &[5, 6, 7])
            .build()
    }

    fn value(&self, x: ArrayView2<'_, f64>, domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| {
            let [a, b, c] = coeffs(row, domain);
            let z = row[BATCH].log2() - 3.0;
            let neutral = a * row[LEARNING_RATE] + b * row[DECAY] + c * z;
            let layers: f64 = (5..8)
                .filter(|&d| domain.is_active(row, d))
                .map(|d| layer_term(d, row[d]))
                .sum();
            neutral + layers
        })
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        match kx {
            LEARNING_RATE | DECAY => Ok(x.map_axis(Axis(1), |row| coeffs(row, domain)[kx - 1])),
            5 => Ok(x.column(5).mapv(|v| 2.0 * v)),
            6 => Ok(Array1::from_elem(x.nrows(), 0.3)),
            7 => Ok(x.column(7).mapv(|v| -0.3 * v * v)),
            _ => Err(unsupported(self.name(), kx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::testing::{assert_partials_match, midpoint_batch};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn problem() -> Problem {
        Problem::new(HierarchicalNeuralNetwork::new()).unwrap()
    }

    #[test]
    fn test_layer_count_drives_active_terms() {
        let p = problem();
        // ReLU, batch 8 (z = 0): 2 x1 + x2
        let x = array![
            [1.0, -3.0, -2.0, 8.0, 0.0, 2.0, 1.0, 1.0],
            [2.0, -3.0, -2.0, 8.0, 0.0, 2.0, 1.0, 1.0],
            [3.0, -3.0, -2.0, 8.0, 0.0, 2.0, 1.0, 1.0]
        ];
        let y = p.evaluate(&x, None).unwrap();
        assert_relative_eq!(y[[0, 0]], -8.0 + 4.0, epsilon = 1e-12);
        assert_relative_eq!(y[[1, 0]], -8.0 + 4.0 + 0.3, epsilon = 1e-12);
        assert_relative_eq!(y[[2, 0]], -8.0 + 4.0 + 0.3 - 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_inactive_input_does_not_change_value() {
        let p = problem();
        let x = array![
            [1.0, -3.0, -2.0, 64.0, 1.0, 2.0, 0.5, 0.5],
            [1.0, -3.0, -2.0, 64.0, 1.0, 2.0, 4.5, 3.0]
        ];
        let y = p.evaluate(&x, None).unwrap();
        assert_eq!(y[[0, 0]], y[[1, 0]]);
        for kx in [6, 7] {
            assert_eq!(p.evaluate(&x, Some(kx)).unwrap(), array![[0.0], [0.0]]);
        }
        assert_eq!(p.evaluate(&x, Some(5)).unwrap(), array![[4.0], [4.0]]);
    }

    #[test]
    fn test_activation_changes_neutral_slope() {
        let p = problem();
        let x = array![
            [2.0, -3.0, -2.0, 16.0, 0.0, 1.0, 1.0, 1.0],
            [2.0, -3.0, -2.0, 16.0, 1.0, 1.0, 1.0, 1.0],
            [2.0, -3.0, -2.0, 16.0, 2.0, 1.0, 1.0, 1.0]
        ];
        assert_eq!(p.evaluate(&x, Some(1)).unwrap(), array![[2.0], [-1.0], [-1.0]]);
        assert_eq!(p.evaluate(&x, Some(2)).unwrap(), array![[1.0], [2.0], [1.0]]);
    }

    #[test]
    fn test_discrete_axes_have_no_derivative() {
        let p = problem();
        let x = array![[2.0, -3.0, -2.0, 16.0, 0.0, 1.0, 1.0, 1.0]];
        for kx in [0, 3, 4] {
            assert!(p.evaluate(&x, Some(kx)).unwrap_err().is_unsupported_derivative());
        }
    }

    #[test]
    fn test_direct_value_with_bad_activation_is_nan() {
        let f = HierarchicalNeuralNetwork::new();
        let domain = f.domain().unwrap();
        let x = array![
            [2.0, -3.0, -2.0, 16.0, 3.0, 1.0, 1.0, 1.0],
            [2.0, -3.0, -2.0, 16.0, -1.0, 1.0, 1.0, 1.0],
            [2.0, -3.0, -2.0, 16.0, 1.0, 1.0, 1.0, 1.0]
        ];
        let y = f.value(x.view(), &domain);
        assert!(y[0].is_nan() && y[1].is_nan());
        assert!(y[2].is_finite());
        assert!(f.partial(x.view(), 1, &domain).unwrap()[0].is_nan());
    }

    #[test]
    fn test_hierarchical_partials() {
        let p = problem();
        assert_partials_match(&p, &midpoint_batch(&p, 30));
    }

    #[test]
    fn test_domain_structure() {
        let d = problem().xspecs().clone();
        assert_eq!(d.meta_dims(), vec![0]);
        assert_eq!(d.decreed_dims(), vec![5, 6, 7]);
        assert_eq!(d.governing_metas(7), vec![0]);
        assert_eq!(
            d.active_mask(array![2.0, -3.0, -2.0, 16.0, 0.0, 1.0, 1.0, 1.0].view()),
            vec![true, true, true, true, true, true, true, false]
        );
    }
}
