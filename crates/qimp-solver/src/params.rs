//! Validated solve parameters passed to the external engine.
//!
//! Replaces open keyword-argument bags: the recognized options are
//! enumerated here with documented defaults, and unknown keys in a
//! parameter file fail parsing instead of being silently accepted.

use serde::{Deserialize, Serialize};

use qimp_core::{BlockStructure, ErrorInfo, OperatorExpr, QimpError};

/// Options recognized by the solving engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolveParams {
    /// Number of QMC cycles. Required; must be positive.
    pub n_cycles: usize,
    /// Length of a single QMC cycle.
    #[serde(default = "default_length_cycle")]
    pub length_cycle: usize,
    /// Number of cycles discarded for thermalization.
    #[serde(default = "default_warmup_cycles")]
    pub n_warmup_cycles: usize,
    /// Explicit engine seed. When absent the session derives one from its
    /// master seed and worker identity.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Wall-clock budget in seconds enforced by the engine; exceeding it
    /// surfaces as a `time-budget-exceeded` engine error.
    #[serde(default)]
    pub max_time_secs: Option<u64>,
    /// Measure the particle-hole two-particle correlator G²(ν₁,ν₂,ν₃)?
    #[serde(default)]
    pub measure_g2_iw_ph: bool,
    /// Number of positive fermionic frequencies per G² axis.
    #[serde(default = "default_g2_n_fermionic")]
    pub measure_g2_n_fermionic: usize,
    /// Measure the reduced impurity density matrix?
    #[serde(default)]
    pub measure_density_matrix: bool,
    /// Partition the local Hilbert space using the quantum numbers below?
    #[serde(default)]
    pub use_quantum_numbers: bool,
    /// Conserved quantum-number operators handed to the engine.
    #[serde(default)]
    pub quantum_numbers: Vec<OperatorExpr>,
}

fn default_length_cycle() -> usize {
    50
}

fn default_warmup_cycles() -> usize {
    5000
}

fn default_g2_n_fermionic() -> usize {
    30
}

impl SolveParams {
    /// Creates parameters with the documented defaults and the given cycle
    /// count.
    pub fn new(n_cycles: usize) -> Self {
        Self {
            n_cycles,
            length_cycle: default_length_cycle(),
            n_warmup_cycles: default_warmup_cycles(),
            random_seed: None,
            max_time_secs: None,
            measure_g2_iw_ph: false,
            measure_g2_n_fermionic: default_g2_n_fermionic(),
            measure_density_matrix: false,
            use_quantum_numbers: false,
            quantum_numbers: Vec::new(),
        }
    }

    /// Parses parameters from a YAML document; unknown keys are rejected.
    pub fn from_yaml(source: &str) -> Result<Self, QimpError> {
        serde_yaml::from_str(source).map_err(|err| {
            QimpError::Spec(
                ErrorInfo::new("malformed-spec", err.to_string())
                    .with_hint("recognized keys are listed in SolveParams"),
            )
        })
    }

    /// Checks internal consistency and quantum-number compatibility with
    /// the block structure.
    pub fn validate(&self, structure: &BlockStructure) -> Result<(), QimpError> {
        if self.n_cycles == 0 || self.length_cycle == 0 {
            let info = ErrorInfo::new("malformed-spec", "cycle counts must be positive")
                .with_context("n_cycles", self.n_cycles.to_string())
                .with_context("length_cycle", self.length_cycle.to_string());
            return Err(QimpError::Spec(info));
        }
        if self.measure_g2_iw_ph && self.measure_g2_n_fermionic == 0 {
            return Err(QimpError::malformed_spec(
                "two-particle measurement requires a positive frequency count",
            ));
        }
        if self.use_quantum_numbers && self.quantum_numbers.is_empty() {
            return Err(QimpError::malformed_spec(
                "quantum-number partitioning requested without quantum numbers",
            ));
        }
        for expr in &self.quantum_numbers {
            expr.validate(structure)?;
        }
        Ok(())
    }
}
