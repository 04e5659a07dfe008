//! Offline Launch Dry Run
//!
//! Runs the real [`Launcher`] against an in-process host API so a deployment
//! can be checked without an LMS. The window tree is fixed:
//!
//! ```text
//! content ──parent──▶ lms (API = TraceHost) ──parent──▶ lms
//! ```
//!
//! Events are replayed from a JSON lines file, one per line:
//!
//! ```text
//! {"origin": "https://lms.example", "data": {"_type": "COMPLETE", "grade": 8, "max": 10}}
//! {"event": "beforeunload"}
//! ```
//!
//! The page is always torn down after the last event, as a browser would.

use std::{
    fmt,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use scorm_bridge_core::{
    BridgeConfig, BridgeEvent, CmiValue, Environment, HostApi, LaunchForm, LaunchFrame,
    LaunchSurface, Launcher, SessionState, WindowAccessError, WindowLike,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CliError;

/// One line of an event file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EventLine {
    /// A message posted by the content frame.
    Message {
        /// Sender origin.
        origin: String,
        /// Posted payload.
        data: Value,
    },
    /// A window lifecycle event.
    Lifecycle {
        /// Which event.
        event: LifecycleEvent,
    },
}

/// Window lifecycle events an event file can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    /// `beforeunload`.
    BeforeUnload,
}

impl From<EventLine> for BridgeEvent {
    fn from(line: EventLine) -> Self {
        match line {
            EventLine::Message { origin, data } => Self::Message { origin, data },
            EventLine::Lifecycle { event: LifecycleEvent::BeforeUnload } => Self::BeforeUnload,
        }
    }
}

/// Parse JSON lines event text. Blank lines are skipped.
pub fn parse_events(path: &Path, text: &str) -> Result<Vec<EventLine>, CliError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| CliError::InvalidEvent {
                path: path.to_path_buf(),
                line: index + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Read and parse an event file.
pub fn read_events(path: &Path) -> Result<Vec<EventLine>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CliError::ReadEvents { path: path.to_path_buf(), source })?;
    parse_events(path, &text)
}

#[derive(Debug)]
struct TraceState {
    student_id: String,
    student_name: String,
    initialize_result: bool,
    calls: Vec<String>,
}

/// Host API that answers with a fixed learner and logs every call.
#[derive(Debug, Clone)]
pub struct TraceHost {
    state: Arc<Mutex<TraceState>>,
}

impl TraceHost {
    /// A host for the given learner.
    pub fn new(student_id: &str, student_name: &str, initialize_result: bool) -> Self {
        let state = TraceState {
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            initialize_result,
            calls: Vec::new(),
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Every call so far, rendered as `LMSName(args)`.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, TraceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) {
        tracing::info!(target: "scorm_bridge::host", "{call}");
        self.state().calls.push(call);
    }
}

impl HostApi for TraceHost {
    fn lms_initialize(&mut self, arg: &str) -> bool {
        let result = self.state().initialize_result;
        self.record(format!("LMSInitialize({arg:?}) -> {result}"));
        result
    }

    fn lms_get_value(&mut self, element: &str) -> String {
        let value = {
            let state = self.state();
            match element {
                scorm_bridge_core::cmi::STUDENT_ID => state.student_id.clone(),
                scorm_bridge_core::cmi::STUDENT_NAME => state.student_name.clone(),
                _ => String::new(),
            }
        };
        self.record(format!("LMSGetValue({element:?}) -> {value:?}"));
        value
    }

    fn lms_set_value(&mut self, element: &str, value: &CmiValue) {
        self.record(format!("LMSSetValue({element:?}, {:?})", value.to_string()));
    }

    fn lms_commit(&mut self) {
        self.record("LMSCommit()".to_string());
    }

    fn lms_finish(&mut self, arg: &str) {
        self.record(format!("LMSFinish({arg:?})"));
    }
}

/// The two windows of a dry run.
#[derive(Debug, Clone)]
pub struct DryRunWindow {
    host: TraceHost,
    is_content: bool,
}

impl DryRunWindow {
    /// The content window, framed inside the LMS window that owns `host`.
    pub fn content(host: TraceHost) -> Self {
        Self { host, is_content: true }
    }

    fn lms(&self) -> Self {
        Self { host: self.host.clone(), is_content: false }
    }
}

impl WindowLike for DryRunWindow {
    type Api = TraceHost;

    fn api(&self) -> Result<Option<TraceHost>, WindowAccessError> {
        Ok((!self.is_content).then(|| self.host.clone()))
    }

    fn parent(&self) -> Result<Option<Self>, WindowAccessError> {
        Ok(Some(self.lms()))
    }

    fn top(&self) -> Self {
        self.lms()
    }

    fn opener(&self) -> Result<Option<Self>, WindowAccessError> {
        Ok(None)
    }

    fn is_same_window(&self, other: &Self) -> bool {
        self.is_content == other.is_content
    }
}

/// Captures the rendered form and any alerts.
#[derive(Debug, Default)]
struct CaptureSurface {
    html: Option<String>,
    alerts: Vec<String>,
}

impl LaunchSurface for CaptureSurface {
    fn submit(&mut self, frame: &LaunchFrame, form: &LaunchForm) {
        self.html = Some(form.to_html(frame));
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(target: "scorm_bridge::alert", "{message}");
        self.alerts.push(message.to_string());
    }
}

/// Inputs for a dry run.
#[derive(Debug, Clone)]
pub struct DryRunOptions {
    /// Bridge configuration under test.
    pub config: BridgeConfig,
    /// Learner ID the host reports.
    pub student_id: String,
    /// Learner name the host reports.
    pub student_name: String,
    /// Make `LMSInitialize` fail.
    pub init_fails: bool,
}

/// What a dry run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunReport {
    /// Launch HTML, if the form was submitted.
    pub form_html: Option<String>,
    /// Alerts shown to the learner.
    pub alerts: Vec<String>,
    /// SCORM calls, in order.
    pub calls: Vec<String>,
    /// Final session state, if a session started.
    pub state: Option<SessionState>,
}

impl fmt::Display for DryRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(html) = &self.form_html {
            writeln!(f, "== launch form ==")?;
            write!(f, "{html}")?;
        }
        for alert in &self.alerts {
            writeln!(f, "== alert == {alert}")?;
        }
        writeln!(f, "== SCORM calls ==")?;
        for call in &self.calls {
            writeln!(f, "{call}")?;
        }
        match self.state {
            Some(SessionState::Active) => writeln!(f, "== session active =="),
            Some(SessionState::Finished { exit }) => {
                writeln!(f, "== session finished ({}) ==", exit.as_str())
            },
            None => writeln!(f, "== launch aborted =="),
        }
    }
}

/// Launch, replay `events`, then tear the page down.
///
/// Fatal launch errors end up in the report (as alerts), not in the `Err`
/// branch; only configuration errors are returned.
pub async fn run_dry_run<E: Environment>(
    env: E,
    options: &DryRunOptions,
    events: Vec<EventLine>,
) -> Result<DryRunReport, CliError> {
    let host = TraceHost::new(&options.student_id, &options.student_name, !options.init_fails);
    let window = DryRunWindow::content(host.clone());
    let mut surface = CaptureSurface::default();

    let launcher = Launcher::new(env, options.config.clone())?;

    let state = match launcher.launch(&window, &mut surface).await {
        Ok(mut session) => {
            for event in events {
                session.dispatch(event.into());
            }
            session.on_before_unload();
            Some(session.state())
        },
        Err(e) if e.is_fatal() => None,
        Err(e) => return Err(e.into()),
    };

    Ok(DryRunReport { form_html: surface.html, alerts: surface.alerts, calls: host.calls(), state })
}
