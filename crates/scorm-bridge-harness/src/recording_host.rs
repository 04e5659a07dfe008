//! A SCORM host API that records every call.
//!
//! Clones share state: mount one clone on a window in a [`crate::WindowGraph`]
//! and keep another to inspect what the bridge did.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use scorm_bridge_core::{CmiValue, HostApi, cmi};

/// One call made against the host API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `LMSInitialize(arg)`.
    Initialize(String),
    /// `LMSGetValue(element)`.
    GetValue(String),
    /// `LMSSetValue(element, value)`, value in wire form.
    SetValue(String, String),
    /// `LMSCommit()`.
    Commit,
    /// `LMSFinish(arg)`.
    Finish(String),
}

#[derive(Debug)]
struct HostState {
    initialize_result: bool,
    values: HashMap<String, String>,
    calls: Vec<HostCall>,
}

/// Recording host API.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    state: Arc<Mutex<HostState>>,
}

impl RecordingHost {
    /// A host with an empty data model whose `LMSInitialize` succeeds.
    pub fn new() -> Self {
        let state =
            HostState { initialize_result: true, values: HashMap::new(), calls: Vec::new() };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// A host that knows the learner as `id` / `name`.
    pub fn with_student(id: &str, name: &str) -> Self {
        let host = Self::new();
        {
            let mut state = host.state();
            state.values.insert(cmi::STUDENT_ID.to_string(), id.to_string());
            state.values.insert(cmi::STUDENT_NAME.to_string(), name.to_string());
        }
        host
    }

    /// Make `LMSInitialize` return false.
    pub fn failing_initialize(self) -> Self {
        self.state().initialize_result = false;
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    /// Number of `LMSFinish` calls.
    pub fn finish_count(&self) -> usize {
        self.state().calls.iter().filter(|c| matches!(c, HostCall::Finish(_))).count()
    }

    /// Number of `LMSCommit` calls.
    pub fn commit_count(&self) -> usize {
        self.state().calls.iter().filter(|c| matches!(c, HostCall::Commit)).count()
    }

    /// Calls made after the first `LMSFinish`.
    pub fn calls_after_finish(&self) -> Vec<HostCall> {
        let calls = self.calls();
        match calls.iter().position(|c| matches!(c, HostCall::Finish(_))) {
            Some(index) => calls[index + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    /// Current value of a data model element.
    pub fn value(&self, element: &str) -> Option<String> {
        self.state().values.get(element).cloned()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostApi for RecordingHost {
    fn lms_initialize(&mut self, arg: &str) -> bool {
        let mut state = self.state();
        state.calls.push(HostCall::Initialize(arg.to_string()));
        state.initialize_result
    }

    fn lms_get_value(&mut self, element: &str) -> String {
        let mut state = self.state();
        state.calls.push(HostCall::GetValue(element.to_string()));
        state.values.get(element).cloned().unwrap_or_default()
    }

    fn lms_set_value(&mut self, element: &str, value: &CmiValue) {
        let mut state = self.state();
        let value = value.to_string();
        state.calls.push(HostCall::SetValue(element.to_string(), value.clone()));
        state.values.insert(element.to_string(), value);
    }

    fn lms_commit(&mut self) {
        self.state().calls.push(HostCall::Commit);
    }

    fn lms_finish(&mut self, arg: &str) {
        self.state().calls.push(HostCall::Finish(arg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_calls_and_values() {
        let host = RecordingHost::with_student("42", "Jane Doe");
        let mut api = host.clone();

        assert!(api.lms_initialize(""));
        assert_eq!(api.lms_get_value(cmi::STUDENT_ID), "42");
        api.lms_set_value(cmi::SCORE_RAW, &CmiValue::from(90.0));
        api.lms_finish("");
        api.lms_commit();

        assert_eq!(host.value(cmi::SCORE_RAW).as_deref(), Some("90"));
        assert_eq!(host.finish_count(), 1);
        assert_eq!(host.calls_after_finish(), vec![HostCall::Commit]);
    }

    #[test]
    fn failing_initialize_returns_false() {
        let mut host = RecordingHost::new().failing_initialize();
        assert!(!host.lms_initialize(""));
        assert_eq!(host.calls(), vec![HostCall::Initialize(String::new())]);
    }

    #[test]
    fn missing_elements_read_empty() {
        let mut host = RecordingHost::new();
        assert_eq!(host.lms_get_value(cmi::STUDENT_NAME), "");
    }
}
