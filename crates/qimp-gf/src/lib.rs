#![deny(missing_docs)]
#![doc = "Block Green's function containers, two-particle correlators and basis transforms for the qimp toolkit."]

pub mod container;
pub mod fourier;
pub mod legendre;
pub mod twopart;

pub use container::{GfContainer, Representation};
pub use legendre::transform_matrix;
pub use twopart::{BlockPair, TwoParticleCorrelator};
