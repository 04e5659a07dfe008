//! Launch Handshake
//!
//! Once the host API is located: initialize the session, read the learner's
//! identity, sign it, and describe the form that loads the content.
//! Any failure here is terminal for the launch; retries belong to the
//! locator.

use scorm_bridge_proto::{LaunchForm, LaunchFrame, LaunchIdentity, build_launch_form, cmi};

use crate::{config::BridgeConfig, error::LaunchError, host::HostApi};

/// Argument passed to `LMSInitialize`.
pub const INITIALIZE_ARG: &str = "";

/// Result of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// Signed learner identity.
    pub identity: LaunchIdentity,
    /// Frame the form targets.
    pub frame: LaunchFrame,
    /// Form to submit.
    pub form: LaunchForm,
}

/// Initialize the SCORM session on `api` and build the signed launch form.
///
/// Nothing is read from the API if `LMSInitialize` fails.
pub fn perform_handshake<H: HostApi + ?Sized>(
    api: &mut H,
    config: &BridgeConfig,
) -> Result<Handshake, LaunchError> {
    if !api.lms_initialize(INITIALIZE_ARG) {
        return Err(LaunchError::InitializationFailed);
    }

    let student_id = api.lms_get_value(cmi::STUDENT_ID);
    let student_name = api.lms_get_value(cmi::STUDENT_NAME);

    let identity = LaunchIdentity::sign(
        config.package_id.as_str(),
        config.page_id.clone(),
        student_id,
        student_name,
    )?;

    let frame = LaunchFrame::new(config.frame_name.as_str());
    let form = build_launch_form(&identity, &config.launch_url, &frame);

    tracing::info!(
        package_id = identity.package_id(),
        student_id = identity.student_id(),
        "SCORM session initialized"
    );

    Ok(Handshake { identity, frame, form })
}
