#![deny(missing_docs)]
#![doc = "Observable reduction, per-run problem records and the batch analysis driver."]

pub mod archive;
pub mod driver;
pub mod record;
pub mod reduce;

pub use archive::Archive;
pub use driver::{enumerate_runs, reduce_all, reduce_run, RunOutcome};
pub use record::ProblemRecord;
pub use reduce::{dynamic_susceptibility, Susceptibility};
