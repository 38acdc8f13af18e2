//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for the harness,
//! supporting:
//! - Environment variables for all configurable values
//! - Sensible defaults matching the stock JerichoOS build layout
//! - Programmatic overrides through `HarnessConfig`
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JERICHO_HARNESS_QEMU` | QEMU binary to invoke | `qemu-system-x86_64` |
//! | `JERICHO_HARNESS_KERNEL` | Kernel boot image path | `target/x86_64-jericho/debug/bootimage-jericho_os.bin` |
//! | `JERICHO_HARNESS_TIMEOUT` | Emulator timeout in seconds | `15` |
//! | `JERICHO_HARNESS_DEMOS` | Number of demo scenarios | `5` |
//! | `JERICHO_HARNESS_SESSION_DIR` | Base directory for sessions | `/tmp/jericho-harness` |
//!
//! # Example
//!
//! ```bash
//! # Use a locally built QEMU and a release kernel
//! export JERICHO_HARNESS_QEMU="/opt/qemu/bin/qemu-system-x86_64"
//! export JERICHO_HARNESS_KERNEL="target/x86_64-jericho/release/bootimage-jericho_os.bin"
//! ```

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default QEMU binary
pub const DEFAULT_QEMU_BINARY: &str = "qemu-system-x86_64";

/// Default kernel boot image (bootimage output of the JerichoOS build)
pub const DEFAULT_KERNEL_IMAGE: &str = "target/x86_64-jericho/debug/bootimage-jericho_os.bin";

/// Default QEMU machine type
pub const DEFAULT_MACHINE: &str = "q35";

/// Default CPU model
pub const DEFAULT_CPU: &str = "qemu64";

/// Default guest memory (MiB)
pub const DEFAULT_MEMORY_MB: u32 = 512;

/// Default emulator timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default number of demo scenarios
pub const DEFAULT_DEMO_COUNT: u32 = 5;

/// Default session base directory
pub const DEFAULT_SESSION_DIR: &str = "/tmp/jericho-harness";

/// File name of the raw serial capture inside a session directory
pub const RAW_CAPTURE_FILE: &str = "serial_raw.log";

/// File name of the normalized capture inside a session directory
pub const PROCESSED_CAPTURE_FILE: &str = "serial_processed.txt";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the QEMU binary
pub const ENV_QEMU_BINARY: &str = "JERICHO_HARNESS_QEMU";

/// Environment variable for the kernel image path
pub const ENV_KERNEL_IMAGE: &str = "JERICHO_HARNESS_KERNEL";

/// Environment variable for the emulator timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "JERICHO_HARNESS_TIMEOUT";

/// Environment variable for the demo count
pub const ENV_DEMO_COUNT: &str = "JERICHO_HARNESS_DEMOS";

/// Environment variable for the session base directory
pub const ENV_SESSION_DIR: &str = "JERICHO_HARNESS_SESSION_DIR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for the harness
#[derive(Debug, Clone)]
pub struct Config {
    /// Emulator invocation settings
    pub emulator: EmulatorSettings,
    /// Session storage settings
    pub session: SessionSettings,
    /// Demo suite settings
    pub suite: SuiteSettings,
}

/// Emulator-related settings
#[derive(Debug, Clone)]
pub struct EmulatorSettings {
    /// QEMU binary to invoke
    pub qemu_binary: String,
    /// Kernel boot image path
    pub kernel_image: String,
    /// Wall-clock timeout (seconds)
    pub timeout_secs: u64,
}

/// Session-related settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base directory for session storage
    pub base_dir: String,
}

/// Demo-suite settings
#[derive(Debug, Clone)]
pub struct SuiteSettings {
    /// Number of demo scenarios expected in the capture
    pub demo_count: u32,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            emulator: EmulatorSettings::from_env(),
            session: SessionSettings::from_env(),
            suite: SuiteSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            emulator: EmulatorSettings::defaults(),
            session: SessionSettings::defaults(),
            suite: SuiteSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EmulatorSettings {
    /// Create emulator settings from environment variables
    pub fn from_env() -> Self {
        Self {
            qemu_binary: env::var(ENV_QEMU_BINARY)
                .unwrap_or_else(|_| DEFAULT_QEMU_BINARY.to_string()),
            kernel_image: env::var(ENV_KERNEL_IMAGE)
                .unwrap_or_else(|_| DEFAULT_KERNEL_IMAGE.to_string()),
            timeout_secs: env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create emulator settings with defaults
    pub fn defaults() -> Self {
        Self {
            qemu_binary: DEFAULT_QEMU_BINARY.to_string(),
            kernel_image: DEFAULT_KERNEL_IMAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SessionSettings {
    /// Create session settings from environment variables
    pub fn from_env() -> Self {
        Self {
            base_dir: env::var(ENV_SESSION_DIR).unwrap_or_else(|_| DEFAULT_SESSION_DIR.to_string()),
        }
    }

    /// Create session settings with defaults
    pub fn defaults() -> Self {
        Self {
            base_dir: DEFAULT_SESSION_DIR.to_string(),
        }
    }
}

impl SuiteSettings {
    /// Create suite settings from environment variables
    pub fn from_env() -> Self {
        Self {
            demo_count: env::var(ENV_DEMO_COUNT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DEMO_COUNT),
        }
    }

    /// Create suite settings with defaults
    pub fn defaults() -> Self {
        Self {
            demo_count: DEFAULT_DEMO_COUNT,
        }
    }
}

/// Get the session base directory (convenience function)
pub fn session_base_dir() -> String {
    get().session.base_dir.clone()
}

/// Get the configured demo count (convenience function)
pub fn demo_count() -> u32 {
    get().suite.demo_count
}
