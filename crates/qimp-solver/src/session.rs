//! One-shot impurity solving sessions.

use serde::{Deserialize, Serialize};

use qimp_core::{
    worker_seed, BlockStructure, ErrorInfo, FrequencyTimeGrid, OperatorExpr, QimpError, WorkerId,
};
use qimp_gf::{GfContainer, Representation};

use crate::engine::{SolverEngine, SolverInput, SolverOutput};
use crate::params::SolveParams;

/// Lifecycle of a session. Transitions are one-shot: re-solving requires a
/// fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Hamiltonian, hybridization and parameters set; ready to solve.
    Configured,
    /// The engine call is in flight.
    Running,
    /// Outputs are available and immutable.
    Completed,
    /// The engine reported a non-recoverable error.
    Failed,
}

impl SessionState {
    fn as_str(&self) -> &'static str {
        match self {
            SessionState::Configured => "configured",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        }
    }
}

/// Owns one impurity problem and drives the external engine for it.
///
/// Sessions own disjoint data; independent sessions may run concurrently on
/// separate workers. Outputs exist only after a successful `solve` and are
/// immutable thereafter.
#[derive(Debug)]
pub struct SolverSession {
    structure: BlockStructure,
    grid: FrequencyTimeGrid,
    h_loc: OperatorExpr,
    g0_iw: GfContainer,
    params: SolveParams,
    engine_seed: u64,
    state: SessionState,
    output: Option<SolverOutput>,
    failure: Option<QimpError>,
}

impl SolverSession {
    /// Configures a session, validating the Hamiltonian, parameters and
    /// hybridization input against the block structure and grid.
    pub fn new(
        structure: BlockStructure,
        grid: FrequencyTimeGrid,
        h_loc: OperatorExpr,
        g0_iw: GfContainer,
        params: SolveParams,
        master_seed: u64,
        worker: WorkerId,
    ) -> Result<Self, QimpError> {
        h_loc.validate(&structure)?;
        params.validate(&structure)?;
        if g0_iw.representation() != Representation::MatsubaraFrequency {
            return Err(QimpError::shape_mismatch(
                "hybridization input must be in the Matsubara representation",
            ));
        }
        if g0_iw.structure() != &structure || g0_iw.grid() != &grid {
            return Err(QimpError::shape_mismatch(
                "hybridization input does not match the session structure and grid",
            ));
        }
        let engine_seed = params
            .random_seed
            .unwrap_or_else(|| worker_seed(master_seed, worker));
        Ok(Self {
            structure,
            grid,
            h_loc,
            g0_iw,
            params,
            engine_seed,
            state: SessionState::Configured,
            output: None,
            failure: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The read-only non-interacting propagator handed in at construction.
    pub fn g0_iw(&self) -> &GfContainer {
        &self.g0_iw
    }

    /// Engine seed derived for this session.
    pub fn engine_seed(&self) -> u64 {
        self.engine_seed
    }

    /// Runs the engine once. Fails with `already-solved` on any state other
    /// than *configured*; engine errors transition the session to *failed*
    /// and are returned unchanged.
    pub fn solve(&mut self, engine: &dyn SolverEngine) -> Result<(), QimpError> {
        if self.state != SessionState::Configured {
            let info = ErrorInfo::new("already-solved", "session can only be solved once")
                .with_context("state", self.state.as_str())
                .with_hint("construct a new session to re-run with different parameters");
            return Err(QimpError::State(info));
        }
        self.state = SessionState::Running;
        let input = SolverInput {
            structure: &self.structure,
            grid: &self.grid,
            h_loc: &self.h_loc,
            g0_iw: &self.g0_iw,
            params: &self.params,
            engine_seed: self.engine_seed,
        };
        match engine.solve(&input).and_then(|output| {
            self.check_output(&output)?;
            Ok(output)
        }) {
            Ok(output) => {
                self.output = Some(output);
                self.state = SessionState::Completed;
                Ok(())
            }
            Err(err) => {
                self.failure = Some(err.clone());
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    fn check_output(&self, output: &SolverOutput) -> Result<(), QimpError> {
        let expectations = [
            (&output.g_tau, Representation::ImaginaryTime),
            (&output.g_iw, Representation::MatsubaraFrequency),
            (&output.g_l, Representation::Legendre),
        ];
        for (container, representation) in expectations {
            if container.structure() != &self.structure
                || container.grid() != &self.grid
                || container.representation() != representation
            {
                return Err(QimpError::shape_mismatch(
                    "engine output does not match the session structure and grid",
                ));
            }
        }
        match (&output.g2_iw_ph, self.params.measure_g2_iw_ph) {
            (Some(corr), true) => {
                if corr.structure() != &self.structure || corr.grid() != &self.grid {
                    return Err(QimpError::shape_mismatch(
                        "engine two-particle output does not match the session",
                    ));
                }
                if corr.n_freq() != 2 * self.params.measure_g2_n_fermionic {
                    return Err(QimpError::shape_mismatch(
                        "engine two-particle output has the wrong frequency count",
                    ));
                }
            }
            (None, false) => {}
            (Some(_), false) | (None, true) => {
                return Err(QimpError::shape_mismatch(
                    "two-particle output disagrees with the measurement flag",
                ));
            }
        }
        if output.density_matrix.is_some() != self.params.measure_density_matrix {
            return Err(QimpError::shape_mismatch(
                "density matrix output disagrees with the measurement flag",
            ));
        }
        Ok(())
    }

    /// Measured outputs of a completed session. Fails with `not-ready` in
    /// every other state.
    pub fn outputs(&self) -> Result<&SolverOutput, QimpError> {
        match (self.state, self.output.as_ref()) {
            (SessionState::Completed, Some(output)) => Ok(output),
            (state, _) => Err(QimpError::State(
                ErrorInfo::new("not-ready", "session has no outputs to expose")
                    .with_context("state", state.as_str()),
            )),
        }
    }

    /// The engine error recorded by a failed session.
    pub fn failure(&self) -> Option<&QimpError> {
        self.failure.as_ref()
    }
}
