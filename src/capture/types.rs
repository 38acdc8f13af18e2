// Core types for serial capture sessions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config;

/// How the emulator process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The emulator exited on its own, with its exit code when available
    Exited(Option<i32>),

    /// The wall-clock timeout elapsed and the emulator was killed. This is
    /// the normal end of a run whose guest never powers off.
    TimedOut,
}

/// One capture attempt: whatever bytes the emulator wrote to its serial
/// console, plus how the attempt ended. Immutable once capture ends.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    /// Name of the backend that produced this session
    pub backend: String,

    /// Raw serial bytes, possibly binary-contaminated
    pub raw: Vec<u8>,

    /// How the emulator process ended
    pub exit: ExitReason,

    /// Wall-clock time the attempt took
    pub elapsed: Duration,

    /// The timeout the attempt ran under
    pub timeout: Duration,
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error types for capture operations
#[derive(Debug)]
pub enum CaptureError {
    /// The emulator executable could not be invoked at all. The only
    /// condition fatal to the pipeline.
    Launch(String),

    /// Capture machinery failure (PTY allocation, reader plumbing)
    Backend(String),

    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Launch(msg) => write!(f, "Launch error: {}", msg),
            CaptureError::Backend(msg) => write!(f, "Backend error: {}", msg),
            CaptureError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Launch(_) | CaptureError::Backend(_) => None,
            CaptureError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}

/// Fixed QEMU machine configuration for one run.
///
/// The machine shape (chipset, cpu model, memory, no display) is constant
/// across backends; only the serial redirection differs per backend.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// QEMU binary to invoke
    pub qemu_binary: PathBuf,
    /// Bootable kernel image (bootimage disk image)
    pub kernel_image: PathBuf,
    /// QEMU machine type
    pub machine: String,
    /// CPU model
    pub cpu: String,
    /// Guest memory in MiB
    pub memory_mb: u32,
    /// File the serial console is captured into
    pub serial_file: PathBuf,
    /// Wall-clock timeout for the whole run
    pub timeout: Duration,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            qemu_binary: PathBuf::from(config::DEFAULT_QEMU_BINARY),
            kernel_image: PathBuf::from(config::DEFAULT_KERNEL_IMAGE),
            machine: config::DEFAULT_MACHINE.to_string(),
            cpu: config::DEFAULT_CPU.to_string(),
            memory_mb: config::DEFAULT_MEMORY_MB,
            serial_file: PathBuf::from(config::RAW_CAPTURE_FILE),
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MachineConfig {
    /// Create a machine configuration for the given kernel image
    pub fn new(kernel_image: impl Into<PathBuf>) -> Self {
        Self {
            kernel_image: kernel_image.into(),
            ..Default::default()
        }
    }

    /// Set the QEMU binary
    pub fn qemu(mut self, qemu_binary: impl Into<PathBuf>) -> Self {
        self.qemu_binary = qemu_binary.into();
        self
    }

    /// Set the wall-clock timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the serial capture file path
    pub fn serial_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.serial_file = path.into();
        self
    }

    /// The QEMU arguments shared by every backend: boot drive, machine
    /// shape, and display disabled. The serial argument is per-backend.
    pub fn common_args(&self) -> Vec<String> {
        vec![
            "-drive".to_string(),
            format!("format=raw,file={}", self.kernel_image.display()),
            "-machine".to_string(),
            self.machine.clone(),
            "-cpu".to_string(),
            self.cpu.clone(),
            "-m".to_string(),
            format!("{}M", self.memory_mb),
            "-display".to_string(),
            "none".to_string(),
            "-no-reboot".to_string(),
        ]
    }
}
