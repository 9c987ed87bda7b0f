//! Integration tests for the evaluation contract shared by every problem.

use approx::assert_abs_diff_eq;
use math_surrogate_problems::testing::{FD_TOLERANCE, check_partials, midpoint_batch, random_batch};
use math_surrogate_problems::{
    HierarchicalNeuralNetwork, LpNorm, OptionValue, Problem, ProblemError, ProblemKind, Sphere,
    VariableRole,
};
use ndarray::{Array2, Axis, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Every named problem with its defaults plus a few non-default option sets.
fn configurations() -> Vec<(ProblemKind, Vec<(&'static str, OptionValue)>)> {
    let mut configs: Vec<_> = ProblemKind::ALL.iter().map(|&k| (k, vec![])).collect();
    configs.extend([
        (ProblemKind::Rosenbrock, vec![("ndim", 6usize.into())]),
        (ProblemKind::NdimRosenbrock, vec![("ndim", 5usize.into()), ("w", 0.9.into())]),
        (ProblemKind::Sphere, vec![("ndim", 7usize.into())]),
        (ProblemKind::RobotArm, vec![("ndim", 8usize.into())]),
        (ProblemKind::NdimRobotArm, vec![("ndim", 4usize.into()), ("w", 0.5.into())]),
        (ProblemKind::CantileverBeam, vec![("ndim", 6usize.into()), ("P", 1e4.into())]),
        (ProblemKind::NdimCantileverBeam, vec![("ndim", 3usize.into())]),
        (ProblemKind::LpNorm, vec![("ndim", 3usize.into()), ("order", 1usize.into())]),
        (ProblemKind::LpNorm, vec![("ndim", 3usize.into()), ("order", 4usize.into())]),
        (ProblemKind::NdimStepFunction, vec![("ndim", 2usize.into()), ("width", 3.0.into())]),
    ]);
    for func in ["cos", "exp", "tanh", "gaussian"] {
        configs.push((
            ProblemKind::TensorProduct,
            vec![("ndim", 2usize.into()), ("func", func.into()), ("width", 2.0.into())],
        ));
    }
    configs
}

fn build(kind: ProblemKind, options: &[(&'static str, OptionValue)]) -> Problem {
    kind.build(options)
        .unwrap_or_else(|e| panic!("{kind} with {options:?}: {e}"))
}

#[test]
fn test_values_are_finite_columns() {
    let mut rng = StdRng::seed_from_u64(42);
    for (kind, options) in configurations() {
        let p = build(kind, &options);
        let x = random_batch(&p, 25, &mut rng);
        let y = p.evaluate(&x, None).unwrap();
        assert_eq!(y.dim(), (25, 1), "{kind}");
        assert!(y.iter().all(|v| v.is_finite()), "{kind} produced non-finite values");

        for (kx, v) in p.xspecs().variables().iter().enumerate() {
            if v.is_continuous() {
                let dy = p.evaluate(&x, Some(kx)).unwrap();
                assert_eq!(dy.dim(), (25, 1), "{kind} d/dx{kx}");
                assert!(dy.iter().all(|v| v.is_finite()), "{kind} d/dx{kx}");
            }
        }
    }
}

#[test]
fn test_partials_match_finite_differences() {
    for (kind, options) in configurations() {
        let p = build(kind, &options);
        let report = check_partials(&p, &midpoint_batch(&p, 12)).unwrap();
        assert!(
            report.passes(FD_TOLERANCE),
            "{kind} with {options:?}: {}",
            serde_json::to_string_pretty(&report).unwrap()
        );
    }
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let mut rng = StdRng::seed_from_u64(3);
    for kind in ProblemKind::ALL {
        let p = kind.build_default().unwrap();
        let x = random_batch(&p, 10, &mut rng);
        let first = p.evaluate(&x, None).unwrap();
        let second = p.evaluate(&x, None).unwrap();
        assert!(
            first.iter().zip(second.iter()).all(|(a, b)| a.to_bits() == b.to_bits()),
            "{kind}"
        );
    }
}

#[test]
fn test_empty_batch() {
    for kind in ProblemKind::ALL {
        let p = kind.build_default().unwrap();
        let x = Array2::<f64>::zeros((0, p.ndim()));
        assert_eq!(p.evaluate(&x, None).unwrap().dim(), (0, 1), "{kind}");
    }
}

#[test]
fn test_shape_and_axis_errors() {
    for kind in ProblemKind::ALL {
        let p = kind.build_default().unwrap();
        let ndim = p.ndim();

        let wide = Array2::<f64>::zeros((2, ndim + 1));
        let err = p.evaluate(&wide, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::ShapeMismatch {
                expected: ndim,
                got: ndim + 1
            }
        );

        let x = midpoint_batch(&p, 2);
        let err = p.evaluate(&x, Some(ndim)).unwrap_err();
        assert!(err.is_axis_error(), "{kind}: {err}");
        // The problem is still usable after a failed call.
        assert!(p.evaluate(&x, None).is_ok());
    }
}

#[test]
fn test_dimension_below_minimum_is_rejected() {
    let cases = [
        (ProblemKind::Rosenbrock, 1),
        (ProblemKind::NdimRosenbrock, 1),
        (ProblemKind::Sphere, 0),
        (ProblemKind::RobotArm, 0),
        (ProblemKind::CantileverBeam, 2),
        (ProblemKind::LpNorm, 0),
        (ProblemKind::Branin, 3),
        (ProblemKind::WingWeight, 9),
    ];
    for (kind, ndim) in cases {
        let err = kind.build(&[("ndim", ndim.into())]).unwrap_err();
        assert!(err.is_option_error(), "{kind} accepted ndim = {ndim}");
    }
}

#[test]
fn test_known_values() {
    let branin = ProblemKind::Branin.build_default().unwrap();
    let y = branin.evaluate(&array![[-std::f64::consts::PI, 12.275]], None).unwrap();
    assert_abs_diff_eq!(y[[0, 0]], 0.397887, epsilon = 1e-3);

    let sphere = Problem::new(Sphere::new(2).unwrap()).unwrap();
    assert_eq!(sphere.evaluate(&array![[0.0, 0.0]], None).unwrap(), array![[0.0]]);
    assert_eq!(sphere.evaluate(&array![[3.0, 4.0]], Some(0)).unwrap(), array![[6.0]]);

    let lp = Problem::new(LpNorm::new(2, 2).unwrap()).unwrap();
    assert_eq!(lp.evaluate(&array![[3.0, 4.0]], None).unwrap(), array![[5.0]]);
}

#[test]
fn test_inactive_decreed_derivatives_are_zero() {
    let p = Problem::new(HierarchicalNeuralNetwork::new()).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let x = random_batch(&p, 60, &mut rng);
    let decreed: Vec<usize> = p
        .xspecs()
        .variables()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.role() == VariableRole::Decreed)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(decreed, vec![5, 6, 7]);

    for &kx in &decreed {
        let dy = p.evaluate(&x, Some(kx)).unwrap();
        for (i, row) in x.rows().into_iter().enumerate() {
            if !p.xspecs().is_active(row, kx) {
                assert_eq!(dy[[i, 0]], 0.0);

                // Moving the inactive input leaves the value untouched.
                let single = row.to_owned().insert_axis(Axis(0));
                let mut moved = single.clone();
                moved[[0, kx]] = 5.0 - moved[[0, kx]];
                assert_eq!(
                    p.evaluate(&moved, None).unwrap(),
                    p.evaluate(&single, None).unwrap()
                );
            }
        }
    }
}

#[test]
fn test_problems_share_across_threads() {
    let p = std::sync::Arc::new(ProblemKind::WingWeight.build_default().unwrap());
    let x = midpoint_batch(&p, 16);
    let expected = p.evaluate(&x, None).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let (p, x) = (p.clone(), x.clone());
            std::thread::spawn(move || p.evaluate(&x, None).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
