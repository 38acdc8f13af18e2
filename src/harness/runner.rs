//! Pipeline orchestration: capture, normalize, extract, validate, report.

use std::fs;

use crate::capture::{
    CaptureBackend, MachineConfig, PtyCaptureBackend, SerialFileBackend, capture_with_backends,
};
use crate::harness::types::{HarnessConfig, HarnessResult};
use crate::report::RunReport;
use crate::session::Session;
use crate::verify::{SuiteResult, extract_demos, normalize, run_checks};

/// Run the full verification pipeline once.
///
/// Launches the kernel under QEMU with the primary serial-file backend,
/// falls back to the PTY backend when the primary capture is empty,
/// normalizes whatever came back, extracts per-demo records and suite-wide
/// checks, persists both capture projections into the session directory,
/// and returns the assembled report. Only a launch failure aborts; a
/// timeout, a crashed guest, or an empty capture all flow through to a
/// complete report.
pub fn run_harness(config: &HarnessConfig) -> HarnessResult<RunReport> {
    let session = match &config.output_dir {
        Some(dir) => Session::in_dir(dir),
        None => Session::with_name("suite"),
    }
    .keep(config.keep);
    session.init()?;

    let machine = MachineConfig::new(&config.kernel_image)
        .qemu(&config.qemu_binary)
        .timeout(config.timeout)
        .serial_file(session.raw_log_path());

    let mut primary = SerialFileBackend::new(machine.clone());
    let mut fallback = PtyCaptureBackend::new(machine);
    let capture = {
        let mut backends: [&mut dyn CaptureBackend; 2] = [&mut primary, &mut fallback];
        capture_with_backends(&mut backends)?
    };

    // The winning backend already wrote the capture file, but persist the
    // authoritative buffer explicitly so the on-disk state always matches
    // what was verified.
    fs::write(session.raw_log_path(), &capture.raw)?;

    let normalized = normalize(&capture.raw);
    fs::write(session.processed_log_path(), &normalized.lines)?;

    let demos = extract_demos(&normalized, config.demo_count);
    let checks = run_checks(&normalized);
    let result = SuiteResult::new(demos, checks);

    let report = RunReport {
        backend: capture.backend.clone(),
        captured_bytes: capture.raw.len(),
        exit: capture.exit,
        elapsed_ms: capture.elapsed.as_millis() as u64,
        raw_log: session.raw_log_path(),
        processed_log: session.processed_log_path(),
        result,
    };

    // The session owns cleanup-on-drop; a kept session must outlive it.
    if session.keep {
        std::mem::forget(session);
    }

    Ok(report)
}

/// Re-run extraction and validation over an already-captured raw log.
///
/// No emulator is involved; this is the post-mortem path for a persisted
/// `serial_raw.log`.
pub fn verify_capture(raw: &[u8], demo_count: u32) -> SuiteResult {
    let normalized = normalize(raw);
    let demos = extract_demos(&normalized, demo_count);
    let checks = run_checks(&normalized);
    SuiteResult::new(demos, checks)
}
