//! The boundary to the external Monte-Carlo solving engine.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use qimp_core::{BlockStructure, ErrorInfo, FrequencyTimeGrid, OperatorExpr, QimpError};
use qimp_gf::{GfContainer, TwoParticleCorrelator};

use crate::params::SolveParams;

/// Everything the engine needs for one impurity problem. All references are
/// read-only; the engine must not rely on any state outside this bundle.
#[derive(Debug)]
pub struct SolverInput<'a> {
    /// Orbital/spin block declarations.
    pub structure: &'a BlockStructure,
    /// Shared grid; β is fixed for the whole session.
    pub grid: &'a FrequencyTimeGrid,
    /// Local (interacting) Hamiltonian.
    pub h_loc: &'a OperatorExpr,
    /// Non-interacting propagator in Matsubara frequencies.
    pub g0_iw: &'a GfContainer,
    /// Validated engine options.
    pub params: &'a SolveParams,
    /// Derived engine seed for this session's worker.
    pub engine_seed: u64,
}

/// Reduced density matrix of the impurity's local Hilbert space, stored as
/// real matrices per diagonalization sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DensityMatrix {
    sectors: BTreeMap<String, Array2<f64>>,
}

impl DensityMatrix {
    /// Creates a density matrix from labelled sector blocks.
    pub fn from_sectors(sectors: BTreeMap<String, Array2<f64>>) -> Self {
        Self { sectors }
    }

    /// Returns one sector's matrix.
    pub fn sector(&self, label: &str) -> Result<&Array2<f64>, QimpError> {
        self.sectors.get(label).ok_or_else(|| {
            QimpError::State(
                ErrorInfo::new("not-ready", "density matrix holds no such sector")
                    .with_context("sector", label),
            )
        })
    }

    /// Sector labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }

    /// Trace over all sectors; 1 for a normalised measurement.
    pub fn trace(&self) -> f64 {
        self.sectors
            .values()
            .map(|matrix| matrix.diag().sum())
            .sum()
    }
}

/// Measured outputs of a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutput {
    /// G(τ) in imaginary time.
    pub g_tau: GfContainer,
    /// G(iωₙ) in Matsubara frequencies.
    pub g_iw: GfContainer,
    /// Gₗ in the Legendre representation.
    pub g_l: GfContainer,
    /// Particle-hole two-particle correlator, when measured.
    pub g2_iw_ph: Option<TwoParticleCorrelator>,
    /// Reduced impurity density matrix, when measured.
    pub density_matrix: Option<DensityMatrix>,
}

/// Opaque, blocking solving engine.
///
/// The call may run for a long time and may parallelize internally; the
/// core sees only the final outcome. Errors belong to the `Engine` family
/// (`engine-failure`, `not-converged`, `time-budget-exceeded`) and are
/// surfaced to the session without retry.
pub trait SolverEngine {
    /// Runs the sampling for one configured impurity problem.
    fn solve(&self, input: &SolverInput<'_>) -> Result<SolverOutput, QimpError>;
}
