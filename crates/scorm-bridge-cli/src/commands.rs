//! One-shot commands: checksum, verify, form.

use scorm_bridge_core::{BridgeConfig, LaunchFrame, LaunchIdentity};
use scorm_bridge_crypto::{launch_checksum, verify_launch_checksum};
use scorm_bridge_proto::build_launch_form;

use crate::error::CliError;

/// Checksum the LMS would attach to a launch for this learner.
pub fn checksum(
    package_id: &str,
    student_id: &str,
    student_name: &str,
) -> Result<String, CliError> {
    Ok(launch_checksum(package_id, student_id, student_name)?)
}

/// Check a received launch checksum. Returns `Ok` only on a match.
pub fn verify(
    package_id: &str,
    student_id: &str,
    student_name: &str,
    checksum: &str,
) -> Result<(), CliError> {
    verify_launch_checksum(package_id, student_id, student_name, checksum)?;
    tracing::debug!(package_id, student_id, "checksum verified");
    Ok(())
}

/// Render the HTML a launch page would inject for this learner.
pub fn render_form(
    config: &BridgeConfig,
    student_id: &str,
    student_name: &str,
) -> Result<String, CliError> {
    config.validate()?;

    let identity = LaunchIdentity::sign(
        config.package_id.as_str(),
        config.page_id.clone(),
        student_id,
        student_name,
    )?;
    let frame = LaunchFrame::new(config.frame_name.as_str());
    let form = build_launch_form(&identity, &config.launch_url, &frame);

    Ok(form.to_html(&frame))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use scorm_bridge_crypto::ChecksumError;

    use super::*;

    #[test]
    fn checksum_matches_known_vector() {
        assert_eq!(checksum("pkg-1", "42", "Jane Doe").unwrap(), "ZsiiiWnOWe/kp8dKf1ktfPDghS4=");
    }

    #[test]
    fn verify_rejects_other_learner() {
        assert!(verify("pkg-1", "42", "Jane Doe", "ZsiiiWnOWe/kp8dKf1ktfPDghS4=").is_ok());

        let err = verify("pkg-1", "43", "Jane Doe", "ZsiiiWnOWe/kp8dKf1ktfPDghS4=").unwrap_err();
        assert!(matches!(err, CliError::Checksum(ChecksumError::Mismatch)));
    }

    #[test]
    fn form_contains_signed_fields() {
        let config = BridgeConfig::new("https://lms.example/launch", "pkg-1");
        let html = render_form(&config, "42", "Jane Doe").unwrap();

        assert!(html.contains("action=\"https://lms.example/launch\""));
        assert!(html.contains("value=\"ZsiiiWnOWe/kp8dKf1ktfPDghS4=\""));
        assert!(!html.contains("pageId"));
    }

    #[test]
    fn form_rejects_bad_launch_url() {
        let config = BridgeConfig::new("launch", "pkg-1");
        assert!(matches!(render_form(&config, "42", "Jane"), Err(CliError::Config(_))));
    }
}
