use num_complex::Complex64;
use qimp_core::{BlockStructure, FrequencyTimeGrid, QimpError, Statistics};
use qimp_solver::{BathPole, HybridizationBuilder};

const BETA: f64 = 10.0;
const V: f64 = 0.5;
const EPS: f64 = 2.3;
const MU: f64 = 1.0;
const H: f64 = 0.2;

fn structure() -> BlockStructure {
    BlockStructure::spin_orbitals(&["up", "dn"], 1).unwrap()
}

fn grid() -> FrequencyTimeGrid {
    FrequencyTimeGrid::new(BETA, 64, 128, 8).unwrap()
}

fn builder() -> HybridizationBuilder {
    let poles = [BathPole {
        coupling: V,
        energy: EPS,
    }];
    HybridizationBuilder::new(&structure(), &grid())
        .chemical_potential(MU)
        .field("up", H)
        .field("dn", -H)
        .bath("up", 0, &poles)
        .bath("dn", 0, &poles)
}

fn delta_analytic(iw: Complex64) -> Complex64 {
    V * V / (iw - EPS) + V * V / (iw + EPS)
}

#[test]
fn delta_matches_symmetric_two_pole_form() {
    let grid = grid();
    let delta = builder().delta_iw().unwrap();
    for k in 0..2 * grid.n_iw() {
        let omega = grid.matsubara_frequency(Statistics::Fermionic, grid.frequency_index(k));
        let iw = Complex64::new(0.0, omega);
        let got = delta.value("up", 0, 0, k).unwrap();
        assert!((got - delta_analytic(iw)).norm() < 1e-14);
    }
}

#[test]
fn inverting_g0_recovers_the_input_hybridization() {
    let grid = grid();
    let g0 = builder().g0_iw().unwrap();
    for (block, field) in [("up", H), ("dn", -H)] {
        for k in 0..2 * grid.n_iw() {
            let omega = grid.matsubara_frequency(Statistics::Fermionic, grid.frequency_index(k));
            let iw = Complex64::new(0.0, omega);
            let g0_value = g0.value(block, 0, 0, k).unwrap();
            let recovered = iw + MU - field - 1.0 / g0_value;
            assert!(
                (recovered - delta_analytic(iw)).norm() < 1e-12,
                "{block} k={k}"
            );
        }
    }
}

#[test]
fn empty_pole_list_is_rejected() {
    let err = HybridizationBuilder::new(&structure(), &grid())
        .bath("up", 0, &[])
        .bath(
            "dn",
            0,
            &[BathPole {
                coupling: V,
                energy: EPS,
            }],
        )
        .delta_iw()
        .unwrap_err();
    assert!(matches!(err, QimpError::Spec(_)));
    assert_eq!(err.info().code, "malformed-spec");
}

#[test]
fn undeclared_orbital_labels_are_rejected() {
    let poles = [BathPole {
        coupling: V,
        energy: EPS,
    }];
    let err = builder().bath("tot", 0, &poles).delta_iw().unwrap_err();
    assert_eq!(err.info().code, "malformed-spec");

    let err = builder().field("tot", 0.1).g0_iw().unwrap_err();
    assert_eq!(err.info().code, "malformed-spec");
}

#[test]
fn missing_bath_assignment_is_rejected() {
    let poles = [BathPole {
        coupling: V,
        energy: EPS,
    }];
    let err = HybridizationBuilder::new(&structure(), &grid())
        .bath("up", 0, &poles)
        .g0_iw()
        .unwrap_err();
    assert_eq!(err.info().code, "malformed-spec");
    assert_eq!(err.info().context.get("block").map(String::as_str), Some("dn"));
}
