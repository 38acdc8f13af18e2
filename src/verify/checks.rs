//! Suite-wide validation checks.
//!
//! These scans are independent of each other, of demo ids, and of scan
//! order. An undetected check is an informational result, not an error.

use regex::Regex;

use crate::verify::normalize::NormalizedOutput;
use crate::verify::types::{
    CAPABILITY_ENFORCEMENT, KERNEL_PANIC, MESSAGE_DELIVERY, SUITE_COMPLETION, ValidationCheck,
};

/// Suite completion sentinel printed once every demo has run
const COMPLETION_SENTINEL: &str = "All WASM Demos Complete";

/// Denial token printed by the capability layer on a rejected IPC send
const DENIAL_TOKEN: &str = "IPC-DENIED";

/// Kernel panic patterns
const PANIC_PATTERNS: &[&str] = &["panicked at", "PANIC:"];

/// Run every suite-wide check against the normalized output.
pub fn run_checks(output: &NormalizedOutput) -> Vec<ValidationCheck> {
    vec![
        message_delivery(output),
        capability_enforcement(output),
        suite_completion(output),
        kernel_panic(output),
    ]
}

/// `Delivered <N> messages to subscriber` with the leftmost N as metric.
/// Absence means "not detected", never a zero count.
fn message_delivery(output: &NormalizedOutput) -> ValidationCheck {
    let pattern = Regex::new(r"Delivered (?P<count>\d+) messages to subscriber")
        .expect("delivery pattern is valid");

    let count = pattern
        .captures(&output.joined)
        .and_then(|caps| caps.name("count"))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    match count {
        Some(n) => ValidationCheck::with_metric(MESSAGE_DELIVERY, n),
        None => ValidationCheck::not_detected(MESSAGE_DELIVERY),
    }
}

/// Detected iff the denial token appears anywhere in the output.
fn capability_enforcement(output: &NormalizedOutput) -> ValidationCheck {
    if output.joined.contains(DENIAL_TOKEN) {
        ValidationCheck::detected(CAPABILITY_ENFORCEMENT)
    } else {
        ValidationCheck::not_detected(CAPABILITY_ENFORCEMENT)
    }
}

/// Detected iff the completion sentinel appears anywhere in the output.
fn suite_completion(output: &NormalizedOutput) -> ValidationCheck {
    if output.joined.contains(COMPLETION_SENTINEL) {
        ValidationCheck::detected(SUITE_COMPLETION)
    } else {
        ValidationCheck::not_detected(SUITE_COMPLETION)
    }
}

/// Detected iff a panic pattern appears. Informational: a panic does not
/// by itself flip the verdict, but a panicked run will have missing
/// markers anyway.
fn kernel_panic(output: &NormalizedOutput) -> ValidationCheck {
    if PANIC_PATTERNS.iter().any(|p| output.joined.contains(p)) {
        ValidationCheck::detected(KERNEL_PANIC)
    } else {
        ValidationCheck::not_detected(KERNEL_PANIC)
    }
}
