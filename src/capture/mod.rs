pub mod backend;
pub mod pty;
pub mod types;

pub use backend::{CaptureBackend, MockSerialBackend, SerialFileBackend, capture_with_backends};
pub use pty::PtyCaptureBackend;
pub use types::{CaptureError, CaptureResult, CaptureSession, ExitReason, MachineConfig};
