//! Imaginary-time ↔ Matsubara-frequency transforms.
//!
//! Time→frequency evaluates Gω = ∫₀^β dτ e^{iωτ} G(τ) as the exact Fourier
//! integral of the piecewise-linear interpolant of the stored samples
//! (Filon-type interval weights). Because the interpolant carries the
//! boundary values G(0⁺) and G(β⁻), the result reproduces the exact
//! high-frequency tail c₁/iω with c₁ = −(G(0⁺) + G(β⁻)). The grid excludes
//! τ = β, so G(β⁻) is linearly extrapolated from the last two samples.
//!
//! Frequency→time evaluates the truncated Matsubara sum after subtracting
//! the first-moment tail, with c₁ estimated from the top frequencies:
//! G(τ) = −c₁/2 + (1/β) Σₙ e^{−iωₙτ} [G(iωₙ) − c₁/iωₙ].

use ndarray::Array3;
use num_complex::Complex64;

use qimp_core::{QimpError, Statistics};

use crate::container::{GfContainer, Representation};

/// Threshold below which the interval weights switch to their series
/// expansion to avoid cancellation in (e^z − 1 − z)/z².
const SERIES_CUTOFF: f64 = 1e-3;

/// Exact weights for ∫₀^h e^{iωτ} (linear interpolant) dτ, normalised to
/// the interval length: the integral equals h·(w₀·g₀ + w₁·g₁) with
/// z = iωh.
fn interval_weights(z: Complex64) -> (Complex64, Complex64) {
    if z.norm() < SERIES_CUTOFF {
        let w0 = Complex64::new(0.5, 0.0) + z / 6.0 + z * z / 24.0 + z * z * z / 120.0;
        let w1 = Complex64::new(0.5, 0.0) + z / 3.0 + z * z / 8.0 + z * z * z / 30.0;
        (w0, w1)
    } else {
        let ez = z.exp();
        let z2 = z * z;
        let w0 = (ez - 1.0 - z) / z2;
        let w1 = (ez * (z - 1.0) + 1.0) / z2;
        (w0, w1)
    }
}

impl GfContainer {
    /// Transforms into the Matsubara-frequency representation.
    ///
    /// Accepts imaginary-time input (Fourier integral, see module docs) or
    /// Legendre input (exact coefficient synthesis). Fails with
    /// `shape-mismatch` for Matsubara input.
    pub fn to_matsubara(&self) -> Result<GfContainer, QimpError> {
        match self.representation {
            Representation::ImaginaryTime => self.tau_to_matsubara(),
            Representation::Legendre => self.legendre_to_matsubara(),
            Representation::MatsubaraFrequency => Err(QimpError::shape_mismatch(
                "container is already in the Matsubara representation",
            )),
        }
    }

    /// Transforms a Matsubara container back to imaginary time.
    pub fn to_imaginary_time(&self) -> Result<GfContainer, QimpError> {
        if self.representation != Representation::MatsubaraFrequency {
            return Err(QimpError::shape_mismatch(
                "frequency-to-time transform requires Matsubara input",
            ));
        }
        let grid = self.grid;
        let beta = grid.beta();
        let n_iw = grid.n_iw();
        let n_tau = grid.n_tau();

        let mut result = GfContainer::new(&self.structure, &grid, Representation::ImaginaryTime);
        // both maps are keyed by the same block names in sorted order
        for ((_, source), (_, target)) in self.data.iter().zip(result.data.iter_mut()) {
            let size = source.dim().0;
            for i in 0..size {
                for j in 0..size {
                    let samples: Vec<Complex64> =
                        (0..2 * n_iw).map(|k| source[[i, j, k]]).collect();
                    let c1 = tail_coefficient(&samples, &grid);
                    for kt in 0..n_tau {
                        let tau = grid.time_point(kt);
                        let mut acc = Complex64::new(0.0, 0.0);
                        for (k, &value) in samples.iter().enumerate() {
                            let omega = grid.matsubara_frequency(
                                Statistics::Fermionic,
                                grid.frequency_index(k),
                            );
                            let iw = Complex64::new(0.0, omega);
                            let phase = Complex64::from_polar(1.0, -omega * tau);
                            acc += phase * (value - c1 / iw);
                        }
                        target[[i, j, kt]] = acc / beta - c1 / 2.0;
                    }
                }
            }
        }
        Ok(result)
    }

    fn tau_to_matsubara(&self) -> Result<GfContainer, QimpError> {
        let grid = self.grid;
        let n_tau = grid.n_tau();
        if n_tau < 2 {
            return Err(QimpError::shape_mismatch(
                "time-to-frequency transform requires at least two time points",
            ));
        }
        let h = grid.time_step();
        let n_iw = grid.n_iw();

        let mut result =
            GfContainer::new(&self.structure, &grid, Representation::MatsubaraFrequency);
        for ((_, source), (_, target)) in self.data.iter().zip(result.data.iter_mut()) {
            let size = source.dim().0;
            for i in 0..size {
                for j in 0..size {
                    // samples extended to τ = β by linear extrapolation
                    let mut samples: Vec<Complex64> =
                        (0..n_tau).map(|k| source[[i, j, k]]).collect();
                    let g_beta = 2.0 * samples[n_tau - 1] - samples[n_tau - 2];
                    samples.push(g_beta);
                    fourier_column(&samples, h, n_iw, &grid, target, i, j);
                }
            }
        }
        Ok(result)
    }
}

fn fourier_column(
    samples: &[Complex64],
    h: f64,
    n_iw: usize,
    grid: &qimp_core::FrequencyTimeGrid,
    target: &mut Array3<Complex64>,
    i: usize,
    j: usize,
) {
    let intervals = samples.len() - 1;
    for k in 0..2 * n_iw {
        let omega = grid.matsubara_frequency(Statistics::Fermionic, grid.frequency_index(k));
        let z = Complex64::new(0.0, omega * h);
        let (w0, w1) = interval_weights(z);
        let step = Complex64::from_polar(1.0, omega * h);
        let mut phase = Complex64::new(1.0, 0.0);
        let mut acc = Complex64::new(0.0, 0.0);
        for m in 0..intervals {
            acc += phase * (w0 * samples[m] + w1 * samples[m + 1]);
            phase *= step;
        }
        target[[i, j, k]] = acc * h;
    }
}

/// Estimates the 1/iω tail coefficient from the top ~12% of frequencies on
/// both sides of the grid, as the mean of iωₙ·G(iωₙ).
fn tail_coefficient(samples: &[Complex64], grid: &qimp_core::FrequencyTimeGrid) -> Complex64 {
    let n_iw = grid.n_iw();
    let n_top = (n_iw / 8).max(1);
    let mut acc = Complex64::new(0.0, 0.0);
    let mut count = 0;
    for offset in 0..n_top {
        for k in [offset, 2 * n_iw - 1 - offset] {
            let omega = grid.matsubara_frequency(Statistics::Fermionic, grid.frequency_index(k));
            let iw = Complex64::new(0.0, omega);
            acc += iw * samples[k];
            count += 1;
        }
    }
    acc / count as f64
}
