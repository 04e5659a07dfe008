//! Inbound message protocol.
//!
//! The embedded content posts JSON objects tagged by `_type`:
//!
//! ```text
//! { "_type": "INCOMPLETE" }
//! { "_type": "COMPLETE", "grade": 45, "max": 50 }
//! { "_type": "SESSION_EXPIRED" }
//! { "_type": "LOGGED_OUT" }
//! ```
//!
//! Unrecognized tags decode to [`InboundMessage::Unknown`] rather than an
//! error so the bridge can log and ignore them. A `COMPLETE` whose score
//! fields are missing or unusable still decodes; the score is just absent.

use serde_json::{Value, json};
use thiserror::Error;

/// Name of the tag field.
pub const TYPE_FIELD: &str = "_type";

const INCOMPLETE: &str = "INCOMPLETE";
const COMPLETE: &str = "COMPLETE";
const SESSION_EXPIRED: &str = "SESSION_EXPIRED";
const LOGGED_OUT: &str = "LOGGED_OUT";

/// Errors decoding an inbound message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessageError {
    /// Payload is not valid JSON.
    #[error("invalid JSON: {reason}")]
    InvalidJson {
        /// Parser error text.
        reason: String,
    },

    /// Payload has no string `_type` field.
    #[error("message has no `_type` tag")]
    MissingType,
}

/// A message posted by the content frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Learner progress saved, not finished.
    Incomplete,
    /// Learner finished, with `grade` out of `max` when the content sent
    /// usable numbers.
    Complete {
        /// Points earned.
        grade: Option<f64>,
        /// Points available.
        max: Option<f64>,
    },
    /// Content session timed out.
    SessionExpired,
    /// Learner logged out inside the content.
    LoggedOut,
    /// Any other tag.
    Unknown {
        /// The unrecognized tag.
        kind: String,
    },
}

impl InboundMessage {
    /// Decode from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let kind = value.get(TYPE_FIELD).and_then(Value::as_str).ok_or(MessageError::MissingType)?;

        match kind {
            INCOMPLETE => Ok(Self::Incomplete),
            COMPLETE => Ok(Self::Complete {
                grade: numeric_field(value, "grade"),
                max: numeric_field(value, "max"),
            }),
            SESSION_EXPIRED => Ok(Self::SessionExpired),
            LOGGED_OUT => Ok(Self::LoggedOut),
            other => Ok(Self::Unknown { kind: other.to_string() }),
        }
    }

    /// Decode from JSON text.
    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MessageError::InvalidJson { reason: e.to_string() })?;
        Self::from_value(&value)
    }

    /// Encode as the JSON object the content frame would post.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Complete { grade, max } => {
                json!({ TYPE_FIELD: COMPLETE, "grade": grade, "max": max })
            },
            other => json!({ TYPE_FIELD: other.kind() }),
        }
    }

    /// The `_type` tag.
    pub fn kind(&self) -> &str {
        match self {
            Self::Incomplete => INCOMPLETE,
            Self::Complete { .. } => COMPLETE,
            Self::SessionExpired => SESSION_EXPIRED,
            Self::LoggedOut => LOGGED_OUT,
            Self::Unknown { kind } => kind.as_str(),
        }
    }
}

/// Normalize `grade` out of `max` to a 0-100 percentage.
///
/// Some LMS integrations drop a non-percentage `score.max`, so the bridge
/// always reports on a 0-100 scale. `None` when the result is not a finite
/// number (a zero `max`, or a quotient that overflows).
pub fn score_percent(grade: f64, max: f64) -> Option<f64> {
    Some(100.0 * grade / max).filter(|percent| percent.is_finite())
}

/// Numbers, or strings holding numbers (the content frame is not strict).
fn numeric_field(value: &Value, field: &str) -> Option<f64> {
    let parsed = match value.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_known_type() {
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"INCOMPLETE"}"#).unwrap(),
            InboundMessage::Incomplete
        );
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"COMPLETE","grade":45,"max":50}"#).unwrap(),
            InboundMessage::Complete { grade: Some(45.0), max: Some(50.0) }
        );
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"SESSION_EXPIRED"}"#).unwrap(),
            InboundMessage::SessionExpired
        );
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"LOGGED_OUT"}"#).unwrap(),
            InboundMessage::LoggedOut
        );
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let message = InboundMessage::from_json(r#"{"_type":"RESIZE","height":300}"#).unwrap();
        assert_eq!(message, InboundMessage::Unknown { kind: "RESIZE".to_string() });
        assert_eq!(message.kind(), "RESIZE");
    }

    #[test]
    fn missing_or_non_string_type_is_rejected() {
        assert_eq!(InboundMessage::from_json(r#"{"grade":1}"#), Err(MessageError::MissingType));
        assert_eq!(InboundMessage::from_json(r#"{"_type":7}"#), Err(MessageError::MissingType));
        assert_eq!(InboundMessage::from_json(r#""COMPLETE""#), Err(MessageError::MissingType));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = InboundMessage::from_json("{not json");
        assert!(matches!(result, Err(MessageError::InvalidJson { .. })));
    }

    #[test]
    fn complete_accepts_numeric_strings() {
        let message =
            InboundMessage::from_json(r#"{"_type":"COMPLETE","grade":"7.5","max":" 10 "}"#)
                .unwrap();
        assert_eq!(message, InboundMessage::Complete { grade: Some(7.5), max: Some(10.0) });
    }

    #[test]
    fn complete_without_usable_score_still_decodes() {
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"COMPLETE"}"#).unwrap(),
            InboundMessage::Complete { grade: None, max: None }
        );
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"COMPLETE","grade":3,"max":"ten"}"#).unwrap(),
            InboundMessage::Complete { grade: Some(3.0), max: None }
        );
        assert_eq!(
            InboundMessage::from_json(r#"{"_type":"COMPLETE","grade":null,"max":10}"#).unwrap(),
            InboundMessage::Complete { grade: None, max: Some(10.0) }
        );
    }

    #[test]
    fn zero_maximum_still_decodes() {
        let message = InboundMessage::from_json(r#"{"_type":"COMPLETE","grade":0,"max":0}"#)
            .unwrap();
        assert_eq!(message, InboundMessage::Complete { grade: Some(0.0), max: Some(0.0) });
    }

    #[test]
    fn overflowing_percentage_is_undefined() {
        assert_eq!(score_percent(1e308, 0.5), None);
        assert_eq!(score_percent(3.0, 0.0), None);
        assert_eq!(score_percent(0.0, 0.0), None);
    }

    #[test]
    fn to_value_decodes_back() {
        for message in [
            InboundMessage::Incomplete,
            InboundMessage::Complete { grade: Some(45.0), max: Some(50.0) },
            InboundMessage::Complete { grade: None, max: Some(4.0) },
            InboundMessage::SessionExpired,
            InboundMessage::LoggedOut,
        ] {
            assert_eq!(InboundMessage::from_value(&message.to_value()).unwrap(), message);
        }
    }

    #[test]
    fn percent_normalization() {
        assert_eq!(score_percent(45.0, 50.0), Some(90.0));
        assert_eq!(score_percent(3.0, 4.0), Some(75.0));
        assert_eq!(score_percent(0.0, 7.0), Some(0.0));
        assert_eq!(score_percent(12.0, 10.0), Some(120.0));
    }
}
