#![deny(missing_docs)]
#![doc = "Core types for the qimp impurity-solver toolkit: block structure, grids, operator expressions, errors and seeding."]

pub mod block;
pub mod errors;
pub mod grid;
pub mod oper;
pub mod rng;

pub use block::BlockStructure;
pub use errors::{ErrorInfo, QimpError};
pub use grid::{FrequencyTimeGrid, Statistics};
pub use oper::{c, c_dag, n, FermionOp, OperatorExpr, OperatorTerm};
pub use rng::{worker_seed, RngHandle, WorkerId};
