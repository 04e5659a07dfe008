//! The SCORM 1.2 run-time API, as the bridge consumes it.

use scorm_bridge_proto::CmiValue;

/// SCORM API object placed on an ancestor or opener window by the LMS.
///
/// The bridge is a client of this API, never an implementer. It owns a
/// handle for the life of one session.
pub trait HostApi {
    /// `LMSInitialize`. Returns false if the LMS refused the session.
    fn lms_initialize(&mut self, arg: &str) -> bool;

    /// `LMSGetValue` for a data model element.
    fn lms_get_value(&mut self, element: &str) -> String;

    /// `LMSSetValue` for a data model element.
    fn lms_set_value(&mut self, element: &str, value: &CmiValue);

    /// `LMSCommit`.
    fn lms_commit(&mut self);

    /// `LMSFinish`. Hosts generally do not tolerate a second call.
    fn lms_finish(&mut self, arg: &str);
}
