//! Launch error types.

use scorm_bridge_crypto::ChecksumError;
use thiserror::Error;

use crate::config::ConfigError;

/// The locator exhausted its retry budget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocateError {
    /// No ancestor or opener window exposed an `API` object.
    #[error("Error obtaining SCORM API")]
    ApiNotFound {
        /// Attempts made before giving up.
        attempts: u32,
    },
}

/// Errors that abort a launch.
///
/// The `Display` text of the fatal variants is what the learner sees.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Host API could not be located.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// `LMSInitialize` returned false.
    #[error("SCORM initialisation error")]
    InitializationFailed,

    /// Launch checksum could not be computed.
    #[error("launch checksum failed: {0}")]
    Checksum(#[from] ChecksumError),

    /// Bridge configuration is unusable.
    #[error("bridge configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LaunchError {
    /// Returns true if this error is fatal to the launch (alerted to the
    /// learner, no content loaded).
    ///
    /// Configuration errors are deployment bugs caught before the page runs
    /// and are reported to the operator instead.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Locate(_) | Self::InitializationFailed | Self::Checksum(_) => true,
            Self::Config(_) => false,
        }
    }
}
