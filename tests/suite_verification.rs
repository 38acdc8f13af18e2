//! Integration tests for the capture-and-verification pipeline.

use std::time::Duration;

use jericho_harness::capture::{CaptureBackend, MockSerialBackend, capture_with_backends};
use jericho_harness::report::{EXIT_FAIL, EXIT_PASS, RunReport};
use jericho_harness::verify::{DemoStatus, SUITE_COMPLETION, Verdict};
use jericho_harness::{ExitReason, verify_capture};

const FULL_PASS_CAPTURE: &[u8] = b"[BOOT] JerichoOS v0.1.0 Starting...\n\
    [INFO] Starting WASM demo suite...\n\
    [DEMO 1] Linear Memory (grow) COMPLETE\n\
    [DEMO 2] Host Function Calls (env.print) COMPLETE\n\
    [DEMO 3] Capability Security (send denied) COMPLETE\n\
    [DEMO 4] MQTT Pub/Sub (broker) COMPLETE\n\
    [DEMO 5] Preemptive Scheduling (round robin) COMPLETE\n\
    Delivered 100 messages to subscriber\n\
    [IPC-DENIED] No Endpoint capability for destination 3\n\
    All WASM Demos Complete\n\
    [INFO] Demo suite complete\n";

#[test]
fn test_end_to_end_full_pass() {
    let result = verify_capture(FULL_PASS_CAPTURE, 5);

    assert_eq!(result.passed_count(), 5);
    assert_eq!(result.demos[0].label.as_deref(), Some("Linear Memory"));
    assert_eq!(
        result.demos[1].label.as_deref(),
        Some("Host Function Calls")
    );
    assert_eq!(result.check("MessageDelivery").unwrap().metric, Some(100));
    assert!(result.check("CapabilityEnforcement").unwrap().detected);
    assert!(result.check(SUITE_COMPLETION).unwrap().detected);
    assert_eq!(result.verdict, Verdict::Pass);
}

#[test]
fn test_end_to_end_empty_capture() {
    let result = verify_capture(b"", 5);

    assert_eq!(result.demos.len(), 5);
    assert!(result.demos.iter().all(|d| d.status == DemoStatus::Fail));
    assert!(result.checks.iter().all(|c| !c.detected));
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn test_partial_run_fails_verdict() {
    // Guest hung after demo 3: no demo 4/5 markers and no sentinel.
    let raw = b"[DEMO 1] Linear Memory COMPLETE\n\
        [DEMO 2] Host Function Calls COMPLETE\n\
        [DEMO 3] Capability Security COMPLETE\n";
    let result = verify_capture(raw, 5);

    assert_eq!(result.passed_count(), 3);
    assert_eq!(result.demos[3].status, DemoStatus::Fail);
    assert_eq!(result.demos[4].status, DemoStatus::Fail);
    assert!(!result.check(SUITE_COMPLETION).unwrap().detected);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn test_all_demos_pass_without_sentinel_fails() {
    let raw = b"[DEMO 1] a COMPLETE\n[DEMO 2] b COMPLETE\n[DEMO 3] c COMPLETE\n\
        [DEMO 4] d COMPLETE\n[DEMO 5] e COMPLETE\n";
    let result = verify_capture(raw, 5);
    assert_eq!(result.passed_count(), 5);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn test_contaminated_capture_still_verifies() {
    let mut raw: Vec<u8> = vec![0x00, 0x1b, 0x5b, 0x32, 0x4a, 0xff];
    raw.extend_from_slice(FULL_PASS_CAPTURE);
    raw.extend_from_slice(&[0x00, 0x00, 0xfe]);

    let result = verify_capture(&raw, 5);
    assert_eq!(result.verdict, Verdict::Pass);
}

#[test]
fn test_fallback_only_on_empty_primary() {
    // Non-empty primary: a single invocation, fallback untouched.
    let mut primary = MockSerialBackend::new("primary", FULL_PASS_CAPTURE.to_vec());
    let mut fallback = MockSerialBackend::empty("fallback");
    let session = {
        let mut backends: [&mut dyn CaptureBackend; 2] = [&mut primary, &mut fallback];
        capture_with_backends(&mut backends).unwrap()
    };
    assert_eq!(session.backend, "primary");
    assert_eq!(primary.invocations, 1);
    assert_eq!(fallback.invocations, 0);

    // Empty primary: exactly one fallback invocation.
    let mut primary = MockSerialBackend::empty("primary");
    let mut fallback = MockSerialBackend::new("fallback", FULL_PASS_CAPTURE.to_vec());
    let session = {
        let mut backends: [&mut dyn CaptureBackend; 2] = [&mut primary, &mut fallback];
        capture_with_backends(&mut backends).unwrap()
    };
    assert_eq!(session.backend, "fallback");
    assert_eq!(primary.invocations, 1);
    assert_eq!(fallback.invocations, 1);

    // The recovered capture verifies like any other.
    let result = verify_capture(&session.raw, 5);
    assert_eq!(result.verdict, Verdict::Pass);
}

#[test]
fn test_report_exit_codes_follow_verdict() {
    let make_report = |raw: &[u8]| RunReport {
        backend: "mock".to_string(),
        captured_bytes: raw.len(),
        exit: ExitReason::TimedOut,
        elapsed_ms: Duration::from_secs(15).as_millis() as u64,
        raw_log: "/tmp/jericho-harness/run/serial_raw.log".into(),
        processed_log: "/tmp/jericho-harness/run/serial_processed.txt".into(),
        result: verify_capture(raw, 5),
    };

    assert_eq!(make_report(FULL_PASS_CAPTURE).exit_code(), EXIT_PASS);
    assert_eq!(make_report(b"").exit_code(), EXIT_FAIL);
}
