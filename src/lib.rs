//! # iostat_relay - iostat to collectd/graphite bridge
//!
//! A small Rust crate that runs `iostat` as a long-lived child process,
//! parses its block-device and average-CPU tables line by line, and
//! republishes every sample as plain-text metric lines in either the
//! collectd exec-plugin protocol or the graphite line protocol.
//!
//! ## Features
//!
//! - **Streaming parser**: schema-tracking state machine for the two iostat
//!   tables, tolerant of re-announced headers and blank separators
//! - **Dual wire formats**: collectd `PUTVAL` lines or graphite
//!   `iostat.<device>.<metric>` lines
//! - **Subprocess supervision**: the child is terminated on SIGINT/SIGTERM
//!   so no orphaned `iostat` survives a restart
//! - **Library + Binary**: use the parser as a crate or run the bridge
//!   standalone
//!
//! ## Quick Start
//!
//! ```rust
//! use iostat_relay::{AgentKind, SampleDriver, format_observation};
//!
//! let mut driver = SampleDriver::new(false);
//! driver.process_line("Device:  r/s  w/s");
//! for obs in driver.process_line("sda  1.00  2.00") {
//!     println!("{}", format_observation(&obs, "host1", AgentKind::Collectd));
//! }
//! ```

pub mod error;
pub mod metrics;
pub mod output;
pub mod supervisor;

// Re-export public API
pub use error::{RelayError, Result};
pub use metrics::{
    data::{Observation, Schema, TableKind, CPU_ENTITY},
    driver::{DriverState, SampleDriver},
    parser::{extract_observations, extract_schema},
};
pub use output::{config::OutputConfig, format_observation, AgentKind, Emitter};
pub use supervisor::IostatProcess;

/// The default delay between iostat samples, in seconds
pub const DEFAULT_DELAY_SECS: u64 = 1;

/// The default option string passed to iostat (extended stats, kilobytes)
pub const DEFAULT_IOSTAT_OPTIONS: &str = "Nxk";

/// The default address of the machine running the metrics agent
pub const DEFAULT_AGENT_HOST: &str = "127.0.0.1";

/// The default agent port receiving graphite lines
pub const DEFAULT_AGENT_PORT: u16 = 2878;
