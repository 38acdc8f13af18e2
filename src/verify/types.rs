//! Types for demo suite verification results.

use serde::{Deserialize, Serialize};

/// Name of the suite-wide completion check. The verdict depends on it.
pub const SUITE_COMPLETION: &str = "SuiteCompletion";

/// Name of the message-delivery check.
pub const MESSAGE_DELIVERY: &str = "MessageDelivery";

/// Name of the capability-enforcement check.
pub const CAPABILITY_ENFORCEMENT: &str = "CapabilityEnforcement";

/// Name of the kernel-panic check (informational only).
pub const KERNEL_PANIC: &str = "KernelPanic";

/// Outcome of a single demo scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoStatus {
    Pass,
    Fail,
}

/// Result of one demo scenario, identified by its serial marker id.
///
/// A missing completion marker is recorded as `Fail` whether the demo
/// crashed, hung, or was never reached; the serial stream cannot tell
/// those apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoRecord {
    /// Demo id (1-based, contiguous)
    pub id: u32,

    /// Label derived from the demo's serial line (present only on pass)
    pub label: Option<String>,

    /// Pass iff the completion marker was found
    pub status: DemoStatus,
}

impl DemoRecord {
    /// Create a failed record for a demo whose marker was not found
    pub fn failed(id: u32) -> Self {
        Self {
            id,
            label: None,
            status: DemoStatus::Fail,
        }
    }

    /// Create a passing record with the given label
    pub fn passed(id: u32, label: String) -> Self {
        Self {
            id,
            label: Some(label),
            status: DemoStatus::Pass,
        }
    }
}

/// A suite-wide check on the captured output, not tied to any demo id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    /// Check name (one of the `*_CHECK` constants in this module)
    pub name: String,

    /// Whether the check's evidence appeared in the output
    pub detected: bool,

    /// Extracted metric (e.g. a delivered-message count), if the check
    /// carries one and it was detected
    pub metric: Option<u64>,
}

impl ValidationCheck {
    /// A check that found its evidence, with no metric
    pub fn detected(name: &str) -> Self {
        Self {
            name: name.to_string(),
            detected: true,
            metric: None,
        }
    }

    /// A check that found its evidence along with a metric
    pub fn with_metric(name: &str, metric: u64) -> Self {
        Self {
            name: name.to_string(),
            detected: true,
            metric: Some(metric),
        }
    }

    /// A check whose evidence was absent. Never reported as zero.
    pub fn not_detected(name: &str) -> Self {
        Self {
            name: name.to_string(),
            detected: false,
            metric: None,
        }
    }
}

/// Aggregate pass/fail decision for one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Aggregate result of one harness run. Terminal: computed once from the
/// extractor and validator outputs, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    /// Per-demo records, ordered by id
    pub demos: Vec<DemoRecord>,

    /// Suite-wide validation checks
    pub checks: Vec<ValidationCheck>,

    /// Overall verdict
    pub verdict: Verdict,
}

impl SuiteResult {
    /// Compute the suite result. The verdict is `Pass` iff every demo
    /// passed and the suite-completion check was detected.
    pub fn new(demos: Vec<DemoRecord>, checks: Vec<ValidationCheck>) -> Self {
        let all_demos_pass = demos.iter().all(|d| d.status == DemoStatus::Pass);
        let completion_seen = checks
            .iter()
            .any(|c| c.name == SUITE_COMPLETION && c.detected);

        let verdict = if all_demos_pass && completion_seen {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        Self {
            demos,
            checks,
            verdict,
        }
    }

    /// Number of passing demos
    pub fn passed_count(&self) -> usize {
        self.demos
            .iter()
            .filter(|d| d.status == DemoStatus::Pass)
            .count()
    }

    /// Look up a check by name
    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(id: u32) -> DemoRecord {
        DemoRecord::passed(id, format!("Demo {}", id))
    }

    #[test]
    fn test_verdict_all_pass_with_completion() {
        let demos: Vec<_> = (1..=5).map(pass).collect();
        let checks = vec![ValidationCheck::detected(SUITE_COMPLETION)];
        let result = SuiteResult::new(demos, checks);
        assert_eq!(result.verdict, Verdict::Pass);
    }

    #[test]
    fn test_verdict_all_pass_without_completion() {
        let demos: Vec<_> = (1..=5).map(pass).collect();
        let checks = vec![ValidationCheck::not_detected(SUITE_COMPLETION)];
        let result = SuiteResult::new(demos, checks);
        assert_eq!(result.verdict, Verdict::Fail);
    }

    #[test]
    fn test_verdict_one_failure_with_completion() {
        let mut demos: Vec<_> = (1..=4).map(pass).collect();
        demos.push(DemoRecord::failed(5));
        let checks = vec![ValidationCheck::detected(SUITE_COMPLETION)];
        let result = SuiteResult::new(demos, checks);
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.passed_count(), 4);
    }

    #[test]
    fn test_verdict_missing_completion_check() {
        // No completion check at all is treated like not detected.
        let demos: Vec<_> = (1..=5).map(pass).collect();
        let result = SuiteResult::new(demos, vec![]);
        assert_eq!(result.verdict, Verdict::Fail);
    }

    #[test]
    fn test_check_lookup() {
        let checks = vec![
            ValidationCheck::with_metric(MESSAGE_DELIVERY, 42),
            ValidationCheck::not_detected(SUITE_COMPLETION),
        ];
        let result = SuiteResult::new(vec![], checks);
        assert_eq!(result.check(MESSAGE_DELIVERY).unwrap().metric, Some(42));
        assert!(result.check("NoSuchCheck").is_none());
    }
}
