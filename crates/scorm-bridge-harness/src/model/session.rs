//! Model session.
//!
//! Tracks the SCORM data model a correct bridge would leave behind. No JSON,
//! no actions: each operation updates the expected host state directly.

use scorm_bridge_core::{CmiValue, ExitReason, OriginPolicy, cmi};

use super::operation::{MessageChoice, Operation, OriginChoice};
use crate::recording_host::RecordingHost;

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// `LMSFinish` has been called.
    pub finished: bool,
    /// Number of `LMSFinish` calls.
    pub finish_calls: usize,
    /// Number of `LMSCommit` calls.
    pub commits: usize,
    /// Last value written to `cmi.core.exit`.
    pub exit: Option<String>,
    /// Last value written to `cmi.core.lesson_status`.
    pub lesson_status: Option<String>,
    /// Last value written to `cmi.core.score.raw`.
    pub score_raw: Option<String>,
}

/// Reference implementation of the session bridge.
#[derive(Debug, Clone)]
pub struct ModelSession {
    policy: OriginPolicy,
    state: ObservableState,
}

impl ModelSession {
    /// A freshly launched session.
    pub fn new(policy: OriginPolicy) -> Self {
        let state = ObservableState {
            finished: false,
            finish_calls: 0,
            commits: 0,
            exit: None,
            lesson_status: None,
            score_raw: None,
        };
        Self { policy, state }
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        if self.state.finished {
            return;
        }

        match *op {
            Operation::BeforeUnload => self.finish(ExitReason::Suspend),
            Operation::Post { origin, message } => {
                if self.accepts(origin) {
                    self.post(message);
                }
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        self.state.clone()
    }

    /// Returns true once the session has finished.
    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    fn accepts(&self, origin: OriginChoice) -> bool {
        match self.policy {
            OriginPolicy::Prefix => matches!(
                origin,
                OriginChoice::Launch
                    | OriginChoice::TruncatedLaunch
                    | OriginChoice::FullLaunchUrl
                    | OriginChoice::Empty
            ),
            OriginPolicy::ExactOrigin => origin == OriginChoice::Launch,
        }
    }

    fn post(&mut self, message: MessageChoice) {
        match message {
            MessageChoice::Incomplete => {
                self.state.lesson_status = Some("incomplete".to_string());
                self.state.commits += 1;
            },
            MessageChoice::Complete { grade, max }
            | MessageChoice::CompleteAsText { grade, max } => {
                // Zero maximum: no score writes
                if max != 0 {
                    let percent = 100.0 * f64::from(grade) / f64::from(max);
                    self.state.score_raw = Some(CmiValue::Number(percent).to_string());
                }
                self.state.lesson_status = Some("completed".to_string());
                self.state.commits += 1;
            },
            MessageChoice::SessionExpired => self.finish(ExitReason::TimeOut),
            MessageChoice::LoggedOut => self.finish(ExitReason::Logout),
            MessageChoice::Unknown | MessageChoice::Untagged => {},
        }
    }

    fn finish(&mut self, exit: ExitReason) {
        self.state.exit = Some(exit.as_str().to_string());
        self.state.finished = true;
        self.state.finish_calls += 1;
    }
}

/// Read the same observable state off a [`RecordingHost`].
pub fn observe_host(host: &RecordingHost) -> ObservableState {
    let finish_calls = host.finish_count();
    ObservableState {
        finished: finish_calls > 0,
        finish_calls,
        commits: host.commit_count(),
        exit: host.value(cmi::EXIT),
        lesson_status: host.value(cmi::LESSON_STATUS),
        score_raw: host.value(cmi::SCORE_RAW),
    }
}
