//! Operations for model-based testing.
//!
//! Each operation is one event the content frame or the browser could deliver
//! to a launched session. They are generated by proptest (or `arbitrary` in
//! the fuzzer) and applied to both the model and the real bridge.

use arbitrary::Arbitrary;
use serde_json::{Value, json};

use super::{MODEL_LAUNCH_ORIGIN, MODEL_LAUNCH_URL};

/// Sender origin for a posted message, relative to [`MODEL_LAUNCH_URL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum OriginChoice {
    /// The launch URL's own origin.
    Launch,
    /// A truncated origin that is still a string prefix of the launch URL.
    TruncatedLaunch,
    /// The full launch URL, path included.
    FullLaunchUrl,
    /// An empty origin string.
    Empty,
    /// A host that starts with the launch host.
    LookAlike,
    /// An unrelated site.
    Foreign,
}

impl OriginChoice {
    /// The `event.origin` string.
    pub fn as_origin(self) -> &'static str {
        match self {
            Self::Launch => MODEL_LAUNCH_ORIGIN,
            Self::TruncatedLaunch => "https://lms.ex",
            Self::FullLaunchUrl => MODEL_LAUNCH_URL,
            Self::Empty => "",
            Self::LookAlike => "https://lms.example.evil.com",
            Self::Foreign => "https://evil.example",
        }
    }
}

/// Payload for a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum MessageChoice {
    /// `{"_type": "INCOMPLETE"}`.
    Incomplete,
    /// `{"_type": "COMPLETE", "grade": .., "max": ..}`.
    Complete {
        /// Points earned.
        grade: u8,
        /// Points available; zero leaves the score unwritten.
        max: u8,
    },
    /// `COMPLETE` with both numbers sent as strings.
    CompleteAsText {
        /// Points earned.
        grade: u8,
        /// Points available.
        max: u8,
    },
    /// `{"_type": "SESSION_EXPIRED"}`.
    SessionExpired,
    /// `{"_type": "LOGGED_OUT"}`.
    LoggedOut,
    /// A tag outside the protocol.
    Unknown,
    /// No `_type` tag at all.
    Untagged,
}

impl MessageChoice {
    /// The `event.data` value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Incomplete => json!({ "_type": "INCOMPLETE" }),
            Self::Complete { grade, max } => {
                json!({ "_type": "COMPLETE", "grade": grade, "max": max })
            },
            Self::CompleteAsText { grade, max } => {
                json!({ "_type": "COMPLETE", "grade": grade.to_string(), "max": max.to_string() })
            },
            Self::SessionExpired => json!({ "_type": "SESSION_EXPIRED" }),
            Self::LoggedOut => json!({ "_type": "LOGGED_OUT" }),
            Self::Unknown => json!({ "_type": "RESIZE", "height": 480 }),
            Self::Untagged => json!({ "grade": 1, "max": 2 }),
        }
    }
}

/// Events delivered to a launched session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// The content frame posts a message.
    Post {
        /// Sender origin.
        origin: OriginChoice,
        /// Payload.
        message: MessageChoice,
    },
    /// The launching window is torn down.
    BeforeUnload,
}
