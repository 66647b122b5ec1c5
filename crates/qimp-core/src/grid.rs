//! Imaginary-time / Matsubara / Legendre discretizations shared by all
//! Green's functions of one impurity problem.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QimpError};

/// Particle statistics selecting the Matsubara frequency family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistics {
    /// Fermionic frequencies iωₙ = (2n+1)π/β.
    Fermionic,
    /// Bosonic frequencies iωₙ = 2nπ/β.
    Bosonic,
}

/// Grid sizes and inverse temperature fixed for the lifetime of a solving
/// session.
///
/// Fermionic Matsubara data is stored over `2 * n_iw` points; storage index
/// `k` corresponds to the signed frequency index `n = k - n_iw`, so negative
/// frequencies occupy the first half of each array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTimeGrid {
    beta: f64,
    n_tau: usize,
    n_iw: usize,
    n_l: usize,
}

impl FrequencyTimeGrid {
    /// Creates a grid, failing with `invalid-grid` unless β > 0 and every
    /// count is positive.
    pub fn new(beta: f64, n_tau: usize, n_iw: usize, n_l: usize) -> Result<Self, QimpError> {
        if !(beta > 0.0) || !beta.is_finite() {
            let info = ErrorInfo::new("invalid-grid", "inverse temperature must be positive")
                .with_context("beta", beta.to_string());
            return Err(QimpError::Grid(info));
        }
        if n_tau == 0 || n_iw == 0 || n_l == 0 {
            let info = ErrorInfo::new("invalid-grid", "all grid counts must be positive")
                .with_context("n_tau", n_tau.to_string())
                .with_context("n_iw", n_iw.to_string())
                .with_context("n_l", n_l.to_string());
            return Err(QimpError::Grid(info));
        }
        Ok(Self {
            beta,
            n_tau,
            n_iw,
            n_l,
        })
    }

    /// Inverse temperature β.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of imaginary-time points.
    pub fn n_tau(&self) -> usize {
        self.n_tau
    }

    /// Number of positive fermionic Matsubara frequencies.
    pub fn n_iw(&self) -> usize {
        self.n_iw
    }

    /// Number of Legendre coefficients.
    pub fn n_l(&self) -> usize {
        self.n_l
    }

    /// Matsubara frequency ωₙ for a signed index `n`.
    ///
    /// Fermionic: (2n+1)π/β, so ω₋ₙ₋₁ = −ωₙ. Bosonic: 2nπ/β.
    pub fn matsubara_frequency(&self, statistics: Statistics, n: i64) -> f64 {
        match statistics {
            Statistics::Fermionic => (2 * n + 1) as f64 * PI / self.beta,
            Statistics::Bosonic => (2 * n) as f64 * PI / self.beta,
        }
    }

    /// Signed fermionic frequency index for a storage index in
    /// `[0, 2 * n_iw)`.
    pub fn frequency_index(&self, storage: usize) -> i64 {
        storage as i64 - self.n_iw as i64
    }

    /// Imaginary time τₖ = k·β/n_tau for k in `[0, n_tau)`.
    pub fn time_point(&self, k: usize) -> f64 {
        k as f64 * self.beta / self.n_tau as f64
    }

    /// Spacing between adjacent time points.
    pub fn time_step(&self) -> f64 {
        self.beta / self.n_tau as f64
    }
}
