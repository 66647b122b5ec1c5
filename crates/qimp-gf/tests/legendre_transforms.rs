use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use qimp_core::{BlockStructure, FrequencyTimeGrid};
use qimp_gf::{transform_matrix, GfContainer, Representation};

fn structure() -> BlockStructure {
    BlockStructure::spin_orbitals(&["up"], 1).unwrap()
}

#[test]
fn matrix_l0_column_is_analytic() {
    // T_{n,0} = 2i/((2n+1)π)
    let n_iw = 16;
    let matrix = transform_matrix(n_iw, 4);
    for n in 0..4usize {
        let expected = Complex64::new(0.0, 2.0 / ((2 * n + 1) as f64 * PI));
        let got = matrix[[n_iw + n, 0]];
        assert!(
            (got - expected).norm() < 1e-12,
            "n={n}: got {got}, expected {expected}"
        );
    }
}

#[test]
fn matrix_negative_rows_are_conjugates() {
    let n_iw = 16;
    let n_l = 6;
    let matrix = transform_matrix(n_iw, n_l);
    for n in 0..n_iw {
        for l in 0..n_l {
            let positive = matrix[[n_iw + n, l]];
            let negative = matrix[[n_iw - 1 - n, l]];
            assert!((negative - positive.conj()).norm() < 1e-15);
        }
    }
}

#[test]
fn matrix_is_cached_per_grid_size_pair() {
    let a = transform_matrix(32, 8);
    let b = transform_matrix(32, 8);
    assert!(Arc::ptr_eq(&a, &b));
    let c = transform_matrix(32, 9);
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn synthesis_then_projection_recovers_coefficients() {
    let structure = structure();
    let grid = FrequencyTimeGrid::new(10.0, 64, 2048, 8).unwrap();
    let coefficients = [1.0, -0.6, 0.3, -0.15, 0.05];

    let mut g_l = GfContainer::new(&structure, &grid, Representation::Legendre);
    for (l, &value) in coefficients.iter().enumerate() {
        g_l.set_value("up", 0, 0, l, Complex64::new(value, 0.0))
            .unwrap();
    }

    let g_iw = g_l.to_matsubara().unwrap();
    assert_eq!(g_iw.representation(), Representation::MatsubaraFrequency);

    let back = g_iw.to_legendre().unwrap();
    assert_eq!(back.representation(), Representation::Legendre);
    for (l, &value) in coefficients.iter().enumerate() {
        let got = back.value("up", 0, 0, l).unwrap();
        assert!(
            (got - value).norm() < 5e-3,
            "l={l}: got {got}, expected {value}"
        );
    }
    // orders absent from the synthesis stay near zero
    for l in coefficients.len()..grid.n_l() {
        assert!(back.value("up", 0, 0, l).unwrap().norm() < 5e-3);
    }
}

#[test]
fn projection_is_linear() {
    let structure = structure();
    let grid = FrequencyTimeGrid::new(4.0, 64, 64, 4).unwrap();
    let a = GfContainer::diagonal_from_matsubara(&structure, &grid, |_, _, iw| 1.0 / (iw - 0.5));
    let b = GfContainer::diagonal_from_matsubara(&structure, &grid, |_, _, iw| 1.0 / (iw + 1.5));

    let sum_first = a.add(&b).unwrap().to_legendre().unwrap();
    let project_first = a
        .to_legendre()
        .unwrap()
        .add(&b.to_legendre().unwrap())
        .unwrap();
    for l in 0..grid.n_l() {
        let lhs = sum_first.value("up", 0, 0, l).unwrap();
        let rhs = project_first.value("up", 0, 0, l).unwrap();
        assert!((lhs - rhs).norm() < 1e-12);
    }
}
