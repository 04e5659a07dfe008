//! Launch surface that captures what would have been shown.

use scorm_bridge_core::{LaunchForm, LaunchFrame, LaunchSurface};

/// Records submitted forms and alerts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    /// Every `(frame, form)` pair submitted, in order.
    pub submissions: Vec<(LaunchFrame, LaunchForm)>,
    /// Every alert message, in order.
    pub alerts: Vec<String>,
}

impl RecordingSurface {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The single submitted form, if exactly one was submitted.
    pub fn submitted_form(&self) -> Option<&LaunchForm> {
        match self.submissions.as_slice() {
            [(_, form)] => Some(form),
            _ => None,
        }
    }
}

impl LaunchSurface for RecordingSurface {
    fn submit(&mut self, frame: &LaunchFrame, form: &LaunchForm) {
        self.submissions.push((frame.clone(), form.clone()));
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
