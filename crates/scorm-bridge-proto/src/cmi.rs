//! SCORM 1.2 data model elements and values written by the bridge.

use std::fmt;

/// Learner identifier, read during the launch handshake.
pub const STUDENT_ID: &str = "cmi.core.student_id";
/// Learner display name, read during the launch handshake.
pub const STUDENT_NAME: &str = "cmi.core.student_name";
/// Completion status of the lesson.
pub const LESSON_STATUS: &str = "cmi.core.lesson_status";
/// How the learner left the content.
pub const EXIT: &str = "cmi.core.exit";
/// Lower bound of the reported score range.
pub const SCORE_MIN: &str = "cmi.core.score.min";
/// Upper bound of the reported score range.
pub const SCORE_MAX: &str = "cmi.core.score.max";
/// Reported score.
pub const SCORE_RAW: &str = "cmi.core.score.raw";

/// Value passed to `LMSSetValue`.
///
/// The host API accepts strings or numbers. Numbers are rendered the way a
/// JavaScript number prints (`90`, not `90.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum CmiValue {
    /// A vocabulary token or free text.
    Text(String),
    /// A numeric value such as a score.
    Number(f64),
}

impl fmt::Display for CmiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            // -0 prints as "0" in JS
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CmiValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<f64> for CmiValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<LessonStatus> for CmiValue {
    fn from(status: LessonStatus) -> Self {
        Self::Text(status.as_str().to_string())
    }
}

impl From<ExitReason> for CmiValue {
    fn from(reason: ExitReason) -> Self {
        Self::Text(reason.as_str().to_string())
    }
}

/// Values the bridge writes to `cmi.core.lesson_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonStatus {
    /// Learner has started but not finished.
    Incomplete,
    /// Learner has finished and a score was reported.
    Completed,
}

impl LessonStatus {
    /// SCORM vocabulary token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
        }
    }
}

/// Values the bridge writes to `cmi.core.exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The content's server session expired.
    TimeOut,
    /// The learner logged out inside the content.
    Logout,
    /// The window is being torn down mid-session.
    Suspend,
}

impl ExitReason {
    /// SCORM vocabulary token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeOut => "time-out",
            Self::Logout => "logout",
            Self::Suspend => "suspend",
        }
    }
}
