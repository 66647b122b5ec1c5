#![deny(missing_docs)]
#![doc = "Hybridization construction, validated solve parameters and the one-shot impurity solver session."]

pub mod engine;
pub mod hybridization;
pub mod params;
pub mod session;

pub use engine::{DensityMatrix, SolverEngine, SolverInput, SolverOutput};
pub use hybridization::{BathPole, HybridizationBuilder};
pub use params::SolveParams;
pub use session::{SessionState, SolverSession};
