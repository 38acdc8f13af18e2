//! Jericho Harness - serial-console verification for the JerichoOS WASM
//! demo suite.
//!
//! This crate provides:
//! - QEMU launch with a bounded wall-clock timeout and forced termination
//! - Serial capture through an ordered list of backends (file chardev
//!   first, PTY-wrapped stdio as fallback when the first comes back empty)
//! - Normalization of binary-contaminated capture buffers into text
//! - Per-demo marker extraction and suite-wide validation checks
//! - A pass/fail report with machine-checkable exit status
//!
//! # Example
//!
//! ```rust,no_run
//! use jericho_harness::harness::{HarnessConfig, run_harness};
//! use jericho_harness::report::print_report;
//!
//! let config = HarnessConfig::default();
//! let report = run_harness(&config).unwrap();
//! print_report(&report);
//! std::process::exit(report.exit_code());
//! ```

pub mod capture;
pub mod config;
pub mod harness;
pub mod report;
pub mod session;
pub mod verify;

// Re-export harness types
pub use harness::{HarnessConfig, HarnessError, HarnessResult, run_harness, verify_capture};

// Re-export capture types and backends
pub use capture::{
    CaptureBackend, CaptureError, CaptureResult, CaptureSession, ExitReason, MachineConfig,
    MockSerialBackend, PtyCaptureBackend, SerialFileBackend, capture_with_backends,
};

// Re-export verification types
pub use verify::{
    DemoRecord, DemoStatus, NormalizedOutput, SuiteResult, ValidationCheck, Verdict, extract_demos,
    normalize, run_checks,
};

// Re-export reporting
pub use report::{EXIT_FAIL, EXIT_LAUNCH_FAILURE, EXIT_PASS, RunReport, print_report};

// Re-export session management
pub use session::{Session, cleanup_old_sessions, list_sessions};
