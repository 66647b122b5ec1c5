//! Matsubara ↔ Legendre transforms.
//!
//! Convention: G(τ) = Σₗ √(2l+1)/β · Pₗ(2τ/β − 1) · Gₗ, which gives the
//! exact synthesis G(iωₙ) = Σₗ Tₙₗ Gₗ with
//!
//! Tₙₗ = (−1)ⁿ i^{l+1} √(2l+1) jₗ((2n+1)π/2),
//!
//! jₗ the spherical Bessel function. The rows satisfy
//! Σₙ conj(Tₙₗ)·Tₙₗ' = δₗₗ' over the full frequency set, so the projection
//! Gₗ = Σₙ conj(Tₙₗ)·G(iωₙ) is exact in the n_iw → ∞ limit and approximate
//! on a truncated grid. The `[2·n_iw × n_l]` matrix depends only on the
//! grid sizes and is cached process-wide per (n_iw, n_l).

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, OnceLock};

use ndarray::Array2;
use num_complex::Complex64;

use qimp_core::QimpError;

use crate::container::{GfContainer, Representation};

type MatrixCache = Mutex<BTreeMap<(usize, usize), Arc<Array2<Complex64>>>>;

fn cache() -> &'static MatrixCache {
    static CACHE: OnceLock<MatrixCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// Returns the cached Matsubara↔Legendre coefficient matrix for the given
/// grid sizes; rows are indexed by frequency storage index `k` (signed
/// index n = k − n_iw), columns by the Legendre order l.
pub fn transform_matrix(n_iw: usize, n_l: usize) -> Arc<Array2<Complex64>> {
    // the cache holds immutable matrices, so a poisoned lock is recoverable
    let mut guard = match cache().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard
        .entry((n_iw, n_l))
        .or_insert_with(|| Arc::new(build_matrix(n_iw, n_l)))
        .clone()
}

fn build_matrix(n_iw: usize, n_l: usize) -> Array2<Complex64> {
    // i^{l+1} for l = 0, 1, 2, 3 (mod 4)
    let phases = [
        Complex64::new(0.0, 1.0),
        Complex64::new(-1.0, 0.0),
        Complex64::new(0.0, -1.0),
        Complex64::new(1.0, 0.0),
    ];
    let mut matrix = Array2::zeros((2 * n_iw, n_l));
    for m in 0..n_iw {
        let x = (2 * m + 1) as f64 * PI / 2.0;
        let bessel = spherical_bessel_row(x, n_l);
        let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
        for l in 0..n_l {
            let magnitude = sign * ((2 * l + 1) as f64).sqrt() * bessel[l];
            let t = phases[(l + 1) % 4] * magnitude;
            // storage: positive n at n_iw + m, the mirror −m−1 at n_iw − 1 − m
            matrix[[n_iw + m, l]] = t;
            matrix[[n_iw - 1 - m, l]] = t.conj();
        }
    }
    matrix
}

/// Spherical Bessel functions j₀(x) … j_{n_l−1}(x) by Miller downward
/// recurrence, normalised against j₀ = sin(x)/x. Valid for x ≥ π/2, which
/// is the smallest argument appearing in the transform.
fn spherical_bessel_row(x: f64, n_l: usize) -> Vec<f64> {
    let top = n_l + 20;
    let mut values = vec![0.0_f64; top + 2];
    values[top + 1] = 0.0;
    values[top] = 1e-280;
    for m in (1..=top).rev() {
        values[m - 1] = (2 * m + 1) as f64 / x * values[m] - values[m + 1];
        if values[m - 1].abs() > 1e250 {
            for value in values[m - 1..].iter_mut() {
                *value *= 1e-250;
            }
        }
    }
    let scale = (x.sin() / x) / values[0];
    values[..n_l].iter().map(|v| v * scale).collect()
}

impl GfContainer {
    /// Projects a Matsubara container onto Legendre coefficients:
    /// Gₗ = Σₙ conj(Tₙₗ)·G(iωₙ).
    pub fn to_legendre(&self) -> Result<GfContainer, QimpError> {
        if self.representation != Representation::MatsubaraFrequency {
            return Err(QimpError::shape_mismatch(
                "Legendre projection requires Matsubara input",
            ));
        }
        let n_iw = self.grid.n_iw();
        let n_l = self.grid.n_l();
        let matrix = transform_matrix(n_iw, n_l);

        let mut result = GfContainer::new(&self.structure, &self.grid, Representation::Legendre);
        // both maps are keyed by the same block names in sorted order
        for ((_, source), (_, target)) in self.data.iter().zip(result.data.iter_mut()) {
            let size = source.dim().0;
            for i in 0..size {
                for j in 0..size {
                    for l in 0..n_l {
                        let mut acc = Complex64::new(0.0, 0.0);
                        for k in 0..2 * n_iw {
                            acc += matrix[[k, l]].conj() * source[[i, j, k]];
                        }
                        target[[i, j, l]] = acc;
                    }
                }
            }
        }
        Ok(result)
    }

    /// Synthesises Matsubara data from Legendre coefficients:
    /// G(iωₙ) = Σₗ Tₙₗ·Gₗ. Exact given the coefficients.
    pub(crate) fn legendre_to_matsubara(&self) -> Result<GfContainer, QimpError> {
        let n_iw = self.grid.n_iw();
        let n_l = self.grid.n_l();
        let matrix = transform_matrix(n_iw, n_l);

        let mut result =
            GfContainer::new(&self.structure, &self.grid, Representation::MatsubaraFrequency);
        for ((_, source), (_, target)) in self.data.iter().zip(result.data.iter_mut()) {
            let size = source.dim().0;
            for i in 0..size {
                for j in 0..size {
                    for k in 0..2 * n_iw {
                        let mut acc = Complex64::new(0.0, 0.0);
                        for l in 0..n_l {
                            acc += matrix[[k, l]] * source[[i, j, l]];
                        }
                        target[[i, j, k]] = acc;
                    }
                }
            }
        }
        Ok(result)
    }
}
