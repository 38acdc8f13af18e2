//! PTY-wrapped fallback capture backend.
//!
//! Some hosts ship QEMU builds whose file chardev buffers serial output
//! in ways that lose it when the process is killed at the timeout. Running
//! the same invocation with `-serial stdio` inside a pseudo-terminal takes
//! a different I/O path: QEMU believes it is talking to an interactive
//! terminal and flushes line by line, and the harness reads the bytes off
//! the PTY master as they appear.

use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use std::fs;
use std::io::{ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::backend::CaptureBackend;
use super::types::{CaptureError, CaptureResult, CaptureSession, ExitReason, MachineConfig};

/// PTY dimensions handed to QEMU; the guest never queries them but the
/// PTY layer needs something sane.
const PTY_ROWS: u16 = 40;
const PTY_COLS: u16 = 120;

/// How long to keep draining the reader channel once the child is gone
const FINAL_DRAIN_WINDOW: Duration = Duration::from_millis(300);

/// Fallback backend: QEMU with `-serial stdio` inside a portable PTY.
pub struct PtyCaptureBackend {
    machine: MachineConfig,
}

impl PtyCaptureBackend {
    /// Create a PTY capture backend for the given machine configuration
    pub fn new(machine: MachineConfig) -> Self {
        Self { machine }
    }
}

impl CaptureBackend for PtyCaptureBackend {
    fn capture(&mut self) -> CaptureResult<CaptureSession> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: PTY_ROWS,
                cols: PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| CaptureError::Backend(format!("failed to open PTY: {}", e)))?;

        let qemu = self.machine.qemu_binary.to_string_lossy().to_string();
        let mut cmd = CommandBuilder::new(&qemu);
        for arg in self.machine.common_args() {
            cmd.arg(arg);
        }
        cmd.arg("-serial");
        cmd.arg("stdio");

        let start = Instant::now();
        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| CaptureError::Launch(format!("failed to start '{}': {}", qemu, e)))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| CaptureError::Backend(format!("failed to clone PTY reader: {}", e)))?;
        let rx = spawn_reader(reader);

        // Accumulate serial bytes until the child exits or the timeout wins.
        let mut raw: Vec<u8> = Vec::new();
        let mut exit = None;

        while start.elapsed() < self.machine.timeout {
            if let Ok(Some(status)) = child.try_wait() {
                exit = Some(ExitReason::Exited(Some(status.exit_code() as i32)));
                break;
            }
            if let Ok(chunk) = rx.recv_timeout(Duration::from_millis(50)) {
                raw.extend_from_slice(&chunk);
            }
        }

        let exit = match exit {
            Some(reason) => reason,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                ExitReason::TimedOut
            }
        };

        drain_remaining(&rx, &mut raw);
        drop(pair.master);

        // Mirror the capture into the shared serial file so post-mortem
        // inspection finds it at the same path as the primary backend.
        if let Some(parent) = self.machine.serial_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.machine.serial_file, &raw)?;

        Ok(CaptureSession {
            backend: self.backend_name().to_string(),
            raw,
            exit,
            elapsed: start.elapsed(),
            timeout: self.machine.timeout,
        })
    }

    fn backend_name(&self) -> &str {
        "qemu_pty"
    }
}

/// Spawn a thread that forwards PTY reads into a channel
fn spawn_reader(mut reader: Box<dyn Read + Send>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(size) => {
                    if tx.send(buffer[..size].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });
    rx
}

/// Collect whatever the reader thread still has buffered after the child
/// is gone
fn drain_remaining(rx: &Receiver<Vec<u8>>, raw: &mut Vec<u8>) {
    let deadline = Instant::now() + FINAL_DRAIN_WINDOW;
    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(chunk) => raw.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => {
                if Instant::now() >= deadline {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Exercises the whole PTY plumbing with a plain host binary standing
    // in for QEMU: spawn under the PTY, read serial bytes, mirror them to
    // the capture file.
    #[test]
    #[cfg(unix)]
    fn test_pty_capture_of_host_binary() {
        let dir = tempdir().unwrap();
        let serial_file = dir.path().join("serial_raw.log");

        let machine = MachineConfig::new("unused.bin")
            .qemu("/bin/echo")
            .timeout(Duration::from_secs(5))
            .serial_file(&serial_file);

        let mut backend = PtyCaptureBackend::new(machine);
        let session = backend.capture().unwrap();

        // echo prints its arguments (the QEMU flags) and exits
        assert!(!session.raw.is_empty());
        assert!(matches!(session.exit, ExitReason::Exited(_)));
        assert_eq!(fs::read(&serial_file).unwrap(), session.raw);
    }

}
