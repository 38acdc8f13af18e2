use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use jericho_harness::harness::{HarnessConfig, HarnessError, run_harness, verify_capture};
use jericho_harness::report::{self, EXIT_LAUNCH_FAILURE};

/// Jericho Harness - QEMU serial verification for the JerichoOS demo suite
#[derive(Parser, Debug)]
#[command(
    name = "jericho-harness",
    about = "Boot a JerichoOS kernel under QEMU and verify its WASM demo suite from serial output",
    after_help = "ENVIRONMENT VARIABLES:\n\
        JERICHO_HARNESS_QEMU          QEMU binary to invoke\n\
        JERICHO_HARNESS_KERNEL        Kernel boot image path\n\
        JERICHO_HARNESS_TIMEOUT       Emulator timeout in seconds\n\
        JERICHO_HARNESS_DEMOS         Number of demo scenarios\n\
        JERICHO_HARNESS_SESSION_DIR   Base directory for sessions"
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Boot the kernel under QEMU, capture serial output, and verify the suite
    Run {
        /// QEMU binary to invoke
        #[arg(long, env = "JERICHO_HARNESS_QEMU", default_value = "qemu-system-x86_64")]
        qemu: PathBuf,

        /// Kernel boot image to run
        #[arg(
            short,
            long,
            env = "JERICHO_HARNESS_KERNEL",
            default_value = "target/x86_64-jericho/debug/bootimage-jericho_os.bin"
        )]
        kernel: PathBuf,

        /// Emulator timeout in seconds
        #[arg(short, long, env = "JERICHO_HARNESS_TIMEOUT", default_value = "15")]
        timeout: u64,

        /// Number of demo scenarios to verify
        #[arg(short, long, env = "JERICHO_HARNESS_DEMOS", default_value = "5")]
        demos: u32,

        /// Session directory for capture files (default: auto-generated in session dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-verify an already-captured serial log without running QEMU
    Verify {
        /// Path to a raw serial capture file
        log: PathBuf,

        /// Number of demo scenarios to verify
        #[arg(short, long, env = "JERICHO_HARNESS_DEMOS", default_value = "5")]
        demos: u32,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();

    let exit_code = match args.command {
        Commands::Run {
            qemu,
            kernel,
            timeout,
            demos,
            output,
            json,
        } => {
            let config = HarnessConfig {
                qemu_binary: qemu,
                kernel_image: kernel,
                timeout: Duration::from_secs(timeout),
                demo_count: demos,
                output_dir: output,
                keep: true,
            };

            match run_harness(&config) {
                Ok(run_report) => {
                    if json {
                        match serde_json::to_string_pretty(&run_report) {
                            Ok(text) => println!("{}", text),
                            Err(e) => eprintln!("Warning: could not serialize report: {}", e),
                        }
                    } else {
                        report::print_report(&run_report);
                    }
                    run_report.exit_code()
                }
                Err(HarnessError::Launch(msg)) => {
                    // Distinct from a fail verdict: no report exists.
                    eprintln!("Error: could not launch the emulator: {}", msg);
                    EXIT_LAUNCH_FAILURE
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    EXIT_LAUNCH_FAILURE
                }
            }
        }

        Commands::Verify { log, demos, json } => match std::fs::read(&log) {
            Ok(raw) => {
                let result = verify_capture(&raw, demos);
                if json {
                    match serde_json::to_string_pretty(&result) {
                        Ok(text) => println!("{}", text),
                        Err(e) => eprintln!("Warning: could not serialize result: {}", e),
                    }
                } else {
                    report::print_result(&result);
                }
                match result.verdict {
                    jericho_harness::Verdict::Pass => report::EXIT_PASS,
                    jericho_harness::Verdict::Fail => report::EXIT_FAIL,
                }
            }
            Err(e) => {
                eprintln!("Error: could not read '{}': {}", log.display(), e);
                EXIT_LAUNCH_FAILURE
            }
        },
    };

    std::process::exit(exit_code);
}
