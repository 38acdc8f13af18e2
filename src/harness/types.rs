use std::path::PathBuf;
use std::time::Duration;

use crate::capture::CaptureError;
use crate::config;

/// Configuration for one harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// QEMU binary to invoke
    pub qemu_binary: PathBuf,

    /// Kernel boot image to run
    pub kernel_image: PathBuf,

    /// Wall-clock timeout for each emulator invocation
    pub timeout: Duration,

    /// Number of demo scenarios to extract
    pub demo_count: u32,

    /// Session directory override; a fresh session directory is generated
    /// when unset
    pub output_dir: Option<PathBuf>,

    /// Whether to keep the session directory after the run
    pub keep: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let cfg = config::get();
        Self {
            qemu_binary: PathBuf::from(&cfg.emulator.qemu_binary),
            kernel_image: PathBuf::from(&cfg.emulator.kernel_image),
            timeout: Duration::from_secs(cfg.emulator.timeout_secs),
            demo_count: cfg.suite.demo_count,
            output_dir: None,
            keep: true,
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Error types for harness operations
#[derive(Debug)]
pub enum HarnessError {
    /// The emulator could not be invoked at all; the only error that
    /// aborts the pipeline before a verdict exists
    Launch(String),

    /// Capture machinery error
    Capture(String),

    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::Launch(msg) => write!(f, "Launch error: {}", msg),
            HarnessError::Capture(msg) => write!(f, "Capture error: {}", msg),
            HarnessError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Launch(_) | HarnessError::Capture(_) => None,
            HarnessError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Io(err)
    }
}

impl From<CaptureError> for HarnessError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Launch(msg) => HarnessError::Launch(msg),
            CaptureError::Backend(msg) => HarnessError::Capture(msg),
            CaptureError::Io(err) => HarnessError::Io(err),
        }
    }
}
