//! Capture backend abstraction and the primary serial-file backend.
//!
//! Serial redirection out of QEMU is host-environment dependent: direct
//! file chardevs and PTY-wrapped stdio fail under different buffering
//! conditions, and a failure shows up only as an empty capture. Backends
//! therefore share one trait and are tried in order until one yields
//! non-empty output.

use std::fs;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::types::{CaptureError, CaptureResult, CaptureSession, ExitReason, MachineConfig};

/// Poll interval while waiting for the emulator to exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Delay after emulator exit before reading the capture file, giving the
/// host a moment to flush the serial chardev
const FLUSH_DELAY: Duration = Duration::from_millis(200);

/// Trait for serial capture backends
///
/// Implementations provide different methods of redirecting the guest's
/// serial console to a host-readable buffer:
/// - `SerialFileBackend` writes through a QEMU file chardev
/// - `PtyCaptureBackend` wraps QEMU's stdio serial in a pseudo-terminal
/// - `MockSerialBackend` returns canned bytes for testing
pub trait CaptureBackend {
    /// Run the emulator once and return whatever was captured
    fn capture(&mut self) -> CaptureResult<CaptureSession>;

    /// Get the backend identifier (e.g. "qemu_serial_file", "qemu_pty")
    fn backend_name(&self) -> &str;
}

/// Primary backend: QEMU with `-serial file:<path>`.
///
/// The capture file is truncated before launch so stale output from a
/// previous run can never satisfy the non-empty fallback condition.
pub struct SerialFileBackend {
    machine: MachineConfig,
}

impl SerialFileBackend {
    /// Create a serial-file backend for the given machine configuration
    pub fn new(machine: MachineConfig) -> Self {
        Self { machine }
    }
}

impl CaptureBackend for SerialFileBackend {
    fn capture(&mut self) -> CaptureResult<CaptureSession> {
        let serial_file = &self.machine.serial_file;
        if let Some(parent) = serial_file.parent() {
            fs::create_dir_all(parent)?;
        }
        // Truncate before every run.
        fs::File::create(serial_file)?;

        let mut cmd = Command::new(&self.machine.qemu_binary);
        cmd.args(self.machine.common_args())
            .arg("-serial")
            .arg(format!("file:{}", serial_file.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            CaptureError::Launch(format!(
                "failed to start '{}': {}",
                self.machine.qemu_binary.display(),
                e
            ))
        })?;

        // Wait for exit or timeout.
        let mut exit = None;
        while start.elapsed() < self.machine.timeout {
            match child.try_wait()? {
                Some(status) => {
                    exit = Some(ExitReason::Exited(status.code()));
                    break;
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }

        // Still running means the timeout won; kill without negotiation.
        let exit = match exit {
            Some(reason) => reason,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                ExitReason::TimedOut
            }
        };

        thread::sleep(FLUSH_DELAY);
        let raw = fs::read(serial_file).unwrap_or_default();

        Ok(CaptureSession {
            backend: self.backend_name().to_string(),
            raw,
            exit,
            elapsed: start.elapsed(),
            timeout: self.machine.timeout,
        })
    }

    fn backend_name(&self) -> &str {
        "qemu_serial_file"
    }
}

/// A canned-output backend for testing fallback behavior and downstream
/// pipeline stages without an emulator.
pub struct MockSerialBackend {
    name: String,
    output: Vec<u8>,
    /// How many times `capture` has been called
    pub invocations: usize,
}

impl MockSerialBackend {
    /// Create a mock backend that yields the given bytes on every capture
    pub fn new(name: impl Into<String>, output: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            invocations: 0,
        }
    }

    /// Create a mock backend that always yields an empty buffer
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

impl CaptureBackend for MockSerialBackend {
    fn capture(&mut self) -> CaptureResult<CaptureSession> {
        self.invocations += 1;
        Ok(CaptureSession {
            backend: self.name.clone(),
            raw: self.output.clone(),
            exit: ExitReason::Exited(Some(0)),
            elapsed: Duration::ZERO,
            timeout: Duration::ZERO,
        })
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

/// Try capture backends in order until one yields non-empty output.
///
/// The decision to try the next backend depends only on the previous
/// buffer's length, never on its content. If every backend comes back
/// empty, the last (empty) session is returned so the pipeline can still
/// produce a complete accounting. Launch and machinery errors propagate
/// immediately; a later backend is never used to paper over a fatal one.
pub fn capture_with_backends(
    backends: &mut [&mut dyn CaptureBackend],
) -> CaptureResult<CaptureSession> {
    let mut last = None;

    for backend in backends.iter_mut() {
        let session = backend.capture()?;
        if !session.raw.is_empty() {
            return Ok(session);
        }
        last = Some(session);
    }

    last.ok_or_else(|| CaptureError::Backend("no capture backends configured".to_string()))
}
