//! The serializable aggregate persisted per impurity problem.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qimp_gf::{GfContainer, TwoParticleCorrelator};
use qimp_solver::{DensityMatrix, SolveParams};

/// Full state of one solved problem: parameters plus every measured
/// container, persisted as a single archive value under a user-chosen key.
///
/// All measured fields are optional so partially measured runs (e.g. no
/// two-particle correlators) still round-trip; the reduction driver fills
/// `chi_m`/`chi` in when it augments a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Inverse temperature of the run.
    pub beta: f64,
    /// Solve parameters the run was configured with.
    #[serde(default)]
    pub params: Option<SolveParams>,
    /// G(τ) output.
    #[serde(default)]
    pub g_tau: Option<GfContainer>,
    /// G(iωₙ) output.
    #[serde(default)]
    pub g_iw: Option<GfContainer>,
    /// Legendre coefficients output.
    #[serde(default)]
    pub g_l: Option<GfContainer>,
    /// Particle-hole correlator over the (up, up) style pair set.
    #[serde(default)]
    pub g2_up_up: Option<TwoParticleCorrelator>,
    /// Particle-hole correlator over the (up, down) style pair set.
    #[serde(default)]
    pub g2_up_dn: Option<TwoParticleCorrelator>,
    /// Reduced impurity density matrix.
    #[serde(default)]
    pub density_matrix: Option<DensityMatrix>,
    /// Magnetic correlator produced by the reduction pipeline.
    #[serde(default)]
    pub chi_m: Option<TwoParticleCorrelator>,
    /// Static susceptibility produced by the reduction pipeline.
    #[serde(default)]
    pub chi: Option<Complex64>,
}

impl ProblemRecord {
    /// Creates an empty record for a run at the given inverse temperature.
    pub fn new(beta: f64) -> Self {
        Self {
            beta,
            params: None,
            g_tau: None,
            g_iw: None,
            g_l: None,
            g2_up_up: None,
            g2_up_dn: None,
            density_matrix: None,
            chi_m: None,
            chi: None,
        }
    }
}
