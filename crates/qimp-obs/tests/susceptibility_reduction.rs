use num_complex::Complex64;
use qimp_core::{BlockStructure, FrequencyTimeGrid};
use qimp_gf::TwoParticleCorrelator;
use qimp_obs::dynamic_susceptibility;

const BETA: f64 = 10.0;

fn structure() -> BlockStructure {
    BlockStructure::spin_orbitals(&["up", "dn"], 1).unwrap()
}

fn grid() -> FrequencyTimeGrid {
    FrequencyTimeGrid::new(BETA, 32, 16, 8).unwrap()
}

fn constant_correlator(
    pairs: &[(&str, &str)],
    n_freq: usize,
    value: Complex64,
) -> TwoParticleCorrelator {
    let structure = structure();
    let mut corr = TwoParticleCorrelator::new(&structure, &grid(), n_freq, pairs).unwrap();
    for &(left, right) in pairs {
        corr.pair_data_mut(left, right).unwrap().fill(value);
    }
    corr
}

#[test]
fn identical_correlators_reduce_to_zero() {
    let value = Complex64::new(0.7, -0.3);
    let corr = constant_correlator(&[("up", "up"), ("up", "dn")], 4, value);

    let result = dynamic_susceptibility(&corr, &corr.clone(), BETA).unwrap();
    assert_eq!(result.chi, Complex64::new(0.0, 0.0));
    for pair in result.chi_m.pairs() {
        let tensor = result.chi_m.pair_data(&pair.left, &pair.right).unwrap();
        assert!(tensor.iter().all(|v| v.norm() == 0.0));
    }
}

#[test]
fn constant_difference_sums_to_the_closed_form() {
    // one 1x1 pair, N points per axis: chi = c * N^3 / beta^2
    let c = Complex64::new(2.0, 0.5);
    let n = 3;
    let up_up = constant_correlator(&[("up", "up")], n, c);
    let up_dn = constant_correlator(&[("up", "up")], n, Complex64::new(0.0, 0.0));

    let result = dynamic_susceptibility(&up_up, &up_dn, BETA).unwrap();
    let expected = c * (n * n * n) as f64 / (BETA * BETA);
    assert!((result.chi - expected).norm() < 1e-12);

    let tensor = result.chi_m.pair_data("up", "up").unwrap();
    assert!(tensor.iter().all(|v| (*v - c).norm() < 1e-12));
}

#[test]
fn swapping_inputs_negates_the_result() {
    let a = constant_correlator(&[("up", "up")], 3, Complex64::new(1.25, -0.5));
    let b = constant_correlator(&[("up", "up")], 3, Complex64::new(-0.75, 0.25));

    let forward = dynamic_susceptibility(&a, &b, BETA).unwrap();
    let reversed = dynamic_susceptibility(&b, &a, BETA).unwrap();
    assert!((forward.chi + reversed.chi).norm() < 1e-12);
}

#[test]
fn mismatched_layouts_are_rejected() {
    let a = constant_correlator(&[("up", "up")], 3, Complex64::new(1.0, 0.0));
    let b = constant_correlator(&[("up", "up")], 4, Complex64::new(1.0, 0.0));
    let err = dynamic_susceptibility(&a, &b, BETA).unwrap_err();
    assert_eq!(err.info().code, "shape-mismatch");

    let c = constant_correlator(&[("up", "dn")], 3, Complex64::new(1.0, 0.0));
    let err = dynamic_susceptibility(&a, &c, BETA).unwrap_err();
    assert_eq!(err.info().code, "shape-mismatch");
}

#[test]
fn beta_must_match_the_correlator_grid() {
    let a = constant_correlator(&[("up", "up")], 3, Complex64::new(1.0, 0.0));
    let err = dynamic_susceptibility(&a, &a.clone(), 5.0).unwrap_err();
    assert_eq!(err.info().code, "shape-mismatch");
}
