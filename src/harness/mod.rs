pub mod runner;
pub mod types;

pub use runner::{run_harness, verify_capture};
pub use types::{HarnessConfig, HarnessError, HarnessResult};
