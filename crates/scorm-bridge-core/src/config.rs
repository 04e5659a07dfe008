//! Bridge configuration.
//!
//! The deployment templates the launch URL, package ID and optional page ID
//! into the page. [`BridgeConfig`] carries them explicitly, together with the
//! locator's retry budget and the origin policy for inbound messages.

use std::time::Duration;

use scorm_bridge_proto::DEFAULT_FRAME_NAME;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default number of locate attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default delay between locate attempts.
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 300;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Launch URL could not be parsed.
    #[error("invalid launch URL {url:?}: {reason}")]
    InvalidLaunchUrl {
        /// The rejected URL.
        url: String,
        /// Parser error text.
        reason: String,
    },

    /// A required field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Retry budget allows no attempts.
    #[error("locator max_attempts must be at least 1")]
    NoAttempts,

    /// Config text could not be decoded.
    #[error("invalid bridge config: {reason}")]
    Decode {
        /// Decoder error text.
        reason: String,
    },
}

/// How inbound message origins are compared with the launch URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginPolicy {
    /// Accept when the launch URL starts with the event origin.
    ///
    /// This is the deployed behavior. It admits origins that happen to be a
    /// string prefix of the launch URL, so `https://lms.ex` passes for
    /// `https://lms.example/launch`.
    #[default]
    Prefix,

    /// Accept only the launch URL's own serialized origin.
    ExactOrigin,
}

/// Retry budget for locating the host API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total locate attempts, including the first.
    pub max_attempts: u32,
    /// Delay between attempts, in milliseconds.
    pub interval_ms: u64,
}

impl RetryPolicy {
    /// Delay between attempts.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, interval_ms: DEFAULT_RETRY_INTERVAL_MS }
    }
}

/// Everything the bridge needs from its deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Endpoint the launch form posts to; also the reference for origin
    /// checks.
    pub launch_url: String,
    /// Content package ID; keys the checksum.
    pub package_id: String,
    /// Page hint forwarded as `pageId` when present.
    #[serde(default)]
    pub page_id: Option<String>,
    /// Name and id of the content iframe.
    #[serde(default = "default_frame_name")]
    pub frame_name: String,
    /// Origin comparison for inbound messages.
    #[serde(default)]
    pub origin_policy: OriginPolicy,
    /// Locator retry budget.
    #[serde(default)]
    pub locator: RetryPolicy,
}

fn default_frame_name() -> String {
    DEFAULT_FRAME_NAME.to_string()
}

impl BridgeConfig {
    /// Config with default frame name, origin policy and retry budget.
    pub fn new(launch_url: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self {
            launch_url: launch_url.into(),
            package_id: package_id.into(),
            page_id: None,
            frame_name: default_frame_name(),
            origin_policy: OriginPolicy::default(),
            locator: RetryPolicy::default(),
        }
    }

    /// Set the page hint.
    #[must_use]
    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    /// Set the origin policy.
    #[must_use]
    pub fn with_origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.origin_policy = policy;
        self
    }

    /// Set the locator retry budget.
    #[must_use]
    pub fn with_locator(mut self, locator: RetryPolicy) -> Self {
        self.locator = locator;
        self
    }

    /// Decode and validate a JSON config blob.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Decode { reason: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package_id.is_empty() {
            return Err(ConfigError::Empty { field: "package_id" });
        }
        if self.frame_name.is_empty() {
            return Err(ConfigError::Empty { field: "frame_name" });
        }
        if self.locator.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        self.parsed_launch_url().map(|_| ())
    }

    /// The launch URL, parsed.
    pub fn parsed_launch_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.launch_url).map_err(|e| ConfigError::InvalidLaunchUrl {
            url: self.launch_url.clone(),
            reason: e.to_string(),
        })
    }
}
