//! CLI error types.

use std::path::PathBuf;

use scorm_bridge_core::{ConfigError, LaunchError};
use scorm_bridge_crypto::ChecksumError;
use thiserror::Error;

/// Errors reported by the `scorm-bridge` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Checksum could not be computed, or did not verify.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// Arguments do not form a usable bridge configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The dry-run launch failed before a session started.
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Event file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadEvents {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line of the event file is not a valid event.
    #[error("{}:{line}: invalid event: {reason}", path.display())]
    InvalidEvent {
        /// File containing the line.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Decoder error text.
        reason: String,
    },

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
