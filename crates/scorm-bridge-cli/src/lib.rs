//! SCORM launch bridge tooling.
//!
//! Library half of the `scorm-bridge` binary:
//!
//! - [`commands`]: checksum, verify and form rendering for LMS-side checks
//! - [`dry_run`]: the full launcher against an in-process host API
//! - [`SystemEnv`]: the production [`scorm_bridge_core::Environment`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
pub mod dry_run;
mod error;
mod system_env;

pub use dry_run::{DryRunOptions, DryRunReport, EventLine, read_events, run_dry_run};
pub use error::CliError;
pub use system_env::SystemEnv;
