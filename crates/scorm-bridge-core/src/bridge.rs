//! Session Event Bridge
//!
//! Pure state machine that turns content-frame messages and window teardown
//! into SCORM calls.
//!
//! ## States
//!
//! ```text
//! Active ──SESSION_EXPIRED / LOGGED_OUT / beforeunload──▶ Finished
//! ```
//!
//! `INCOMPLETE` and `COMPLETE` write progress and commit without leaving
//! `Active`. A `COMPLETE` without a usable score still marks the lesson
//! completed; only the `score.*` writes are skipped. Every event in `Finished` is absorbed, which is what keeps
//! `LMSFinish` to a single call.
//!
//! ## Design
//!
//! - Action-based: `handle` returns [`BridgeAction`]s; the caller applies them
//!   to the host API with [`crate::execute_actions`]
//! - Origin before content: a message from an unexpected origin is dropped
//!   before its payload is decoded

use scorm_bridge_proto::{
    CmiValue, ExitReason, InboundMessage, LessonStatus, MessageError, cmi, score_percent,
};
use serde_json::Value;
use thiserror::Error;

use crate::config::{BridgeConfig, OriginPolicy};

/// Argument passed to `LMSFinish`.
pub const FINISH_ARG: &str = "";

/// Lifecycle of one SCORM session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session initialized; progress messages are forwarded.
    Active,
    /// `LMSFinish` has been issued.
    Finished {
        /// Value written to `cmi.core.exit` before finishing.
        exit: ExitReason,
    },
}

/// Events fed into the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A `message` event from another window.
    Message {
        /// The sender's origin (`event.origin`).
        origin: String,
        /// The posted payload (`event.data`).
        data: Value,
    },
    /// The window is being torn down (`beforeunload`).
    BeforeUnload,
}

impl BridgeEvent {
    /// A message event carrying `message` from `origin`.
    pub fn message(origin: impl Into<String>, message: &InboundMessage) -> Self {
        Self::Message { origin: origin.into(), data: message.to_value() }
    }
}

/// Severity of a [`BridgeAction::Log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal session milestones.
    Info,
    /// Discarded input.
    Warn,
}

/// Actions produced by the bridge for the caller to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeAction {
    /// `LMSSetValue(element, value)`.
    SetValue {
        /// Data model element.
        element: &'static str,
        /// Value to store.
        value: CmiValue,
    },
    /// `LMSCommit()`.
    Commit,
    /// `LMSFinish("")`.
    Finish,
    /// Diagnostic output.
    Log {
        /// Severity.
        level: LogLevel,
        /// Message text.
        message: String,
    },
}

/// Why an inbound message was discarded. None of these end the session.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MessageRejection {
    /// `event.origin` does not match the launch URL.
    #[error("message from unexpected origin {origin:?}")]
    OriginMismatch {
        /// The rejected origin.
        origin: String,
    },

    /// Payload could not be decoded.
    #[error("malformed message: {0}")]
    Malformed(#[from] MessageError),

    /// `_type` is not part of the protocol.
    #[error("unknown message type {kind:?}")]
    UnknownType {
        /// The unrecognized tag.
        kind: String,
    },
}

/// How origins are checked, resolved once at construction.
#[derive(Debug, Clone)]
enum OriginCheck {
    Prefix { launch_url: String },
    Exact { origin: Option<String> },
}

impl OriginCheck {
    fn new(config: &BridgeConfig) -> Self {
        match config.origin_policy {
            OriginPolicy::Prefix => Self::Prefix { launch_url: config.launch_url.clone() },
            OriginPolicy::ExactOrigin => Self::Exact {
                origin: config
                    .parsed_launch_url()
                    .ok()
                    .map(|url| url.origin())
                    .filter(url::Origin::is_tuple)
                    .map(|origin| origin.ascii_serialization()),
            },
        }
    }

    fn accepts(&self, origin: &str) -> bool {
        match self {
            Self::Prefix { launch_url } => launch_url.starts_with(origin),
            Self::Exact { origin: expected } => expected.as_deref() == Some(origin),
        }
    }
}

/// Session Event Bridge state machine.
///
/// Create one per successful `LMSInitialize`. Pure: returns actions, the
/// caller performs them.
#[derive(Debug, Clone)]
pub struct SessionBridge {
    origin_check: OriginCheck,
    state: SessionState,
}

impl SessionBridge {
    /// Create a bridge in the `Active` state.
    pub fn new(config: &BridgeConfig) -> Self {
        Self { origin_check: OriginCheck::new(config), state: SessionState::Active }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true once `LMSFinish` has been issued.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished { .. })
    }

    /// Returns true if a message from `origin` would be accepted.
    pub fn accepts_origin(&self, origin: &str) -> bool {
        self.origin_check.accepts(origin)
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: BridgeEvent) -> Vec<BridgeAction> {
        if let SessionState::Finished { exit } = self.state {
            let ignored = describe(&event);
            return vec![log(
                LogLevel::Debug,
                format!("session already finished ({}), ignoring {ignored}", exit.as_str()),
            )];
        }

        match event {
            BridgeEvent::Message { origin, data } => match self.accept(&origin, &data) {
                Ok(message) => self.handle_message(message),
                Err(rejection) => reject(&rejection),
            },
            BridgeEvent::BeforeUnload => self.finish(ExitReason::Suspend),
        }
    }

    /// Validate origin, then decode.
    fn accept(&self, origin: &str, data: &Value) -> Result<InboundMessage, MessageRejection> {
        if !self.origin_check.accepts(origin) {
            return Err(MessageRejection::OriginMismatch { origin: origin.to_string() });
        }

        Ok(InboundMessage::from_value(data)?)
    }

    fn handle_message(&mut self, message: InboundMessage) -> Vec<BridgeAction> {
        match message {
            InboundMessage::Incomplete => vec![
                set(cmi::LESSON_STATUS, LessonStatus::Incomplete),
                BridgeAction::Commit,
            ],
            InboundMessage::Complete { grade, max } => {
                let mut actions = Vec::with_capacity(6);
                let percent = grade.zip(max).and_then(|(grade, max)| score_percent(grade, max));
                let summary = match percent {
                    Some(percent) => {
                        actions.extend([
                            set(cmi::SCORE_MIN, 0.0),
                            set(cmi::SCORE_MAX, 100.0),
                            set(cmi::SCORE_RAW, percent),
                        ]);
                        log(LogLevel::Info, format!("completed with {percent}%"))
                    },
                    None => log(
                        LogLevel::Warn,
                        format!("completed without a usable score (grade {grade:?}, max {max:?})"),
                    ),
                };
                actions.extend([
                    set(cmi::LESSON_STATUS, LessonStatus::Completed),
                    BridgeAction::Commit,
                    summary,
                ]);
                actions
            },
            InboundMessage::SessionExpired => self.finish(ExitReason::TimeOut),
            InboundMessage::LoggedOut => self.finish(ExitReason::Logout),
            InboundMessage::Unknown { kind } => reject(&MessageRejection::UnknownType { kind }),
        }
    }

    /// Transition `Active -> Finished`. The caller has already checked the
    /// state is `Active`.
    fn finish(&mut self, exit: ExitReason) -> Vec<BridgeAction> {
        self.state = SessionState::Finished { exit };

        vec![
            set(cmi::EXIT, exit),
            BridgeAction::Finish,
            log(LogLevel::Info, format!("session finished with exit {}", exit.as_str())),
        ]
    }
}

/// Unknown tags log at info, other rejections at warn.
fn reject(rejection: &MessageRejection) -> Vec<BridgeAction> {
    match rejection {
        MessageRejection::UnknownType { .. } => {
            vec![log(LogLevel::Info, format!("ignoring {rejection}"))]
        },
        _ => vec![log(LogLevel::Warn, format!("discarding {rejection}"))],
    }
}

fn set(element: &'static str, value: impl Into<CmiValue>) -> BridgeAction {
    BridgeAction::SetValue { element, value: value.into() }
}

fn log(level: LogLevel, message: String) -> BridgeAction {
    BridgeAction::Log { level, message }
}

fn describe(event: &BridgeEvent) -> String {
    match event {
        BridgeEvent::Message { origin, data } => {
            let kind = data.get(scorm_bridge_proto::TYPE_FIELD).and_then(Value::as_str);
            format!("message {kind:?} from {origin:?}")
        },
        BridgeEvent::BeforeUnload => "beforeunload".to_string(),
    }
}
