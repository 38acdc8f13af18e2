pub mod checks;
pub mod extract;
pub mod normalize;
pub mod types;

pub use checks::run_checks;
pub use extract::{PLACEHOLDER_LABEL, extract_demo, extract_demos};
pub use normalize::{NormalizedOutput, normalize};
pub use types::{
    CAPABILITY_ENFORCEMENT, DemoRecord, DemoStatus, KERNEL_PANIC, MESSAGE_DELIVERY,
    SUITE_COMPLETION, SuiteResult, ValidationCheck, Verdict,
};
