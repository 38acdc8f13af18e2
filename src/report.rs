//! Summary report: a pure projection of already-computed suite state onto
//! stdout, with an optional JSON form.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::ExitReason;
use crate::verify::{
    CAPABILITY_ENFORCEMENT, DemoStatus, KERNEL_PANIC, MESSAGE_DELIVERY, SUITE_COMPLETION,
    SuiteResult, Verdict,
};

/// Exit code for a passing suite
pub const EXIT_PASS: i32 = 0;

/// Exit code for a failing suite
pub const EXIT_FAIL: i32 = 1;

/// Exit code when the emulator could not be launched; distinct from a
/// fail verdict, which always comes with a full report
pub const EXIT_LAUNCH_FAILURE: i32 = 2;

/// Everything one harness run produced, ready for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Backend that produced the authoritative capture
    pub backend: String,

    /// Size of the raw capture in bytes
    pub captured_bytes: usize,

    /// How the emulator ended
    pub exit: ExitReason,

    /// Wall-clock capture time in milliseconds
    pub elapsed_ms: u64,

    /// Where the raw capture was persisted
    pub raw_log: PathBuf,

    /// Where the normalized capture was persisted
    pub processed_log: PathBuf,

    /// Extracted and validated suite result
    pub result: SuiteResult,
}

impl RunReport {
    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        match self.result.verdict {
            Verdict::Pass => EXIT_PASS,
            Verdict::Fail => EXIT_FAIL,
        }
    }
}

/// Print the full human-readable report for a harness run.
pub fn print_report(report: &RunReport) {
    println!(
        "Capture: {} bytes via {} in {} ms",
        report.captured_bytes, report.backend, report.elapsed_ms
    );
    if report.exit == ExitReason::TimedOut {
        println!("Emulator killed at timeout (normal for a guest that never powers off)");
    }
    if report.captured_bytes == 0 {
        println!("Warning: captured 0 bytes of serial output; every result below reflects an empty capture");
    }
    println!();

    print_result(&report.result);

    println!();
    println!("Raw capture:        {}", report.raw_log.display());
    println!("Processed capture:  {}", report.processed_log.display());
}

/// Print the demo, check, and verdict lines for a suite result.
///
/// Shared by the full run report and the offline `verify` path, which has
/// no capture metadata to show.
pub fn print_result(result: &SuiteResult) {
    println!("Demo results:");
    for demo in &result.demos {
        match demo.status {
            DemoStatus::Pass => {
                let label = demo.label.as_deref().unwrap_or("Detected");
                println!("  [DEMO {}] PASS  {}", demo.id, label);
            }
            DemoStatus::Fail => {
                println!("  [DEMO {}] FAIL  no completion marker found", demo.id);
            }
        }
    }

    println!("Checks:");
    for check in &result.checks {
        let status = match (check.detected, check.metric) {
            (true, Some(metric)) => format!("detected ({})", metric),
            (true, None) => "detected".to_string(),
            (false, _) => "not detected".to_string(),
        };
        println!("  {}: {}", check_label(&check.name), status);
    }

    let verdict = match result.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    };
    println!(
        "Verdict: {} ({}/{} demos complete)",
        verdict,
        result.passed_count(),
        result.demos.len()
    );
}

/// Human-readable label for a check name
fn check_label(name: &str) -> &str {
    match name {
        MESSAGE_DELIVERY => "Message delivery",
        CAPABILITY_ENFORCEMENT => "Capability enforcement",
        SUITE_COMPLETION => "Suite completion",
        KERNEL_PANIC => "Kernel panic",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{DemoRecord, ValidationCheck};
    use std::time::Duration;

    fn report_with_verdict(pass: bool) -> RunReport {
        let demos = vec![DemoRecord::passed(1, "Demo".to_string())];
        let checks = if pass {
            vec![ValidationCheck::detected(SUITE_COMPLETION)]
        } else {
            vec![ValidationCheck::not_detected(SUITE_COMPLETION)]
        };
        RunReport {
            backend: "mock".to_string(),
            captured_bytes: 10,
            exit: ExitReason::Exited(Some(0)),
            elapsed_ms: Duration::from_millis(5).as_millis() as u64,
            raw_log: PathBuf::from("/tmp/serial_raw.log"),
            processed_log: PathBuf::from("/tmp/serial_processed.txt"),
            result: SuiteResult::new(demos, checks),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(report_with_verdict(true).exit_code(), EXIT_PASS);
        assert_eq!(report_with_verdict(false).exit_code(), EXIT_FAIL);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = report_with_verdict(true);
        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.backend, "mock");
        assert_eq!(back.exit_code(), EXIT_PASS);
    }
}
