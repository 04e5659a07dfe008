//! Launch checksum: `Base64(HMAC-SHA1(key = package_id, message = student_id
//! + "|" + student_name))`.
//!
//! SHA-1 is kept only because the launch endpoint verifies exactly this
//! construction. It is an integrity checksum, not a signature.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Separator between student ID and student name in the checksummed message.
pub const IDENTITY_SEPARATOR: char = '|';

/// Length of an encoded checksum (20-byte digest, padded Base64).
pub const CHECKSUM_LEN: usize = 28;

/// Errors from checksum computation or verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecksumError {
    /// The MAC could not be keyed.
    #[error("invalid checksum key: {reason}")]
    InvalidKey {
        /// Description of the keying failure.
        reason: String,
    },

    /// The presented checksum is not valid Base64.
    #[error("malformed checksum: {reason}")]
    Malformed {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The presented checksum does not match the identity.
    #[error("checksum mismatch")]
    Mismatch,
}

/// Build the message the checksum covers.
pub fn identity_message(student_id: &str, student_name: &str) -> String {
    let mut message = String::with_capacity(student_id.len() + student_name.len() + 1);
    message.push_str(student_id);
    message.push(IDENTITY_SEPARATOR);
    message.push_str(student_name);
    message
}

/// HMAC-SHA1 of `message` under `key`, encoded as standard padded Base64.
///
/// Keys longer than the SHA-1 block size are hashed down and shorter keys are
/// zero-padded, as RFC 2104 specifies.
pub fn hmac_sha1_base64(key: &[u8], message: &[u8]) -> Result<String, ChecksumError> {
    let mac = keyed(key, message)?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Compute the launch checksum for a student identity.
///
/// Strings are hashed as their UTF-8 bytes.
pub fn launch_checksum(
    package_id: &str,
    student_id: &str,
    student_name: &str,
) -> Result<String, ChecksumError> {
    let message = identity_message(student_id, student_name);
    hmac_sha1_base64(package_id.as_bytes(), message.as_bytes())
}

/// Verify a checksum presented with a launch request.
///
/// The comparison runs in constant time over the decoded digest.
pub fn verify_launch_checksum(
    package_id: &str,
    student_id: &str,
    student_name: &str,
    checksum: &str,
) -> Result<(), ChecksumError> {
    let presented = STANDARD
        .decode(checksum.trim())
        .map_err(|e| ChecksumError::Malformed { reason: e.to_string() })?;

    let message = identity_message(student_id, student_name);
    keyed(package_id.as_bytes(), message.as_bytes())?
        .verify_slice(&presented)
        .map_err(|_| ChecksumError::Mismatch)
}

fn keyed(key: &[u8], message: &[u8]) -> Result<HmacSha1, ChecksumError> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key)
        .map_err(|e| ChecksumError::InvalidKey { reason: e.to_string() })?;
    mac.update(message);
    Ok(mac)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rfc2202_test_case_2() {
        let encoded = hmac_sha1_base64(b"Jefe", b"what do ya want for nothing?").unwrap();
        // effcdf6ae5eb2fa2d27416d5f184df9c259a7c79
        assert_eq!(encoded, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }

    #[test]
    fn known_launch_vector() {
        let checksum = launch_checksum("pkg-1", "42", "Jane Doe").unwrap();
        assert_eq!(checksum, "ZsiiiWnOWe/kp8dKf1ktfPDghS4=");
        assert_eq!(checksum.len(), CHECKSUM_LEN);
    }

    #[test]
    fn key_longer_than_block_is_hashed() {
        let key = [b'k'; 80];
        let encoded = hmac_sha1_base64(&key, b"7|Long Key").unwrap();
        assert_eq!(encoded, "6679vxWSzWi/99vHBqVegOG8moE=");
    }

    #[test]
    fn non_ascii_names_hash_as_utf8() {
        let checksum = launch_checksum("pkg-1", "42", "Zoë").unwrap();
        assert_eq!(checksum, "ao3olNeXSzESWni+MTrZ7IruuwE=");
    }

    #[test]
    fn each_input_changes_the_checksum() {
        let base = launch_checksum("pkg-1", "42", "Jane Doe").unwrap();
        assert_eq!(
            launch_checksum("pkg-2", "42", "Jane Doe").unwrap(),
            "R3cDxfhPMAoN50TksBKW7PXyXmM="
        );
        assert_eq!(
            launch_checksum("pkg-1", "43", "Jane Doe").unwrap(),
            "C39X4zQR6AXYRghbK+8bF0K2v1c="
        );
        assert_eq!(
            launch_checksum("pkg-1", "42", "Jane Does").unwrap(),
            "GxxnwBvb0Be5pDTbdaqzc4cdgQM="
        );
        assert_ne!(base, launch_checksum("pkg-2", "42", "Jane Doe").unwrap());
    }

    #[test]
    fn identity_message_joins_with_separator() {
        assert_eq!(identity_message("42", "Jane Doe"), "42|Jane Doe");
        assert_eq!(identity_message("", ""), "|");
    }

    #[test]
    fn verify_accepts_matching_checksum() {
        assert_eq!(
            verify_launch_checksum("pkg-1", "42", "Jane Doe", "ZsiiiWnOWe/kp8dKf1ktfPDghS4="),
            Ok(())
        );
    }

    #[test]
    fn verify_rejects_other_identity() {
        let result =
            verify_launch_checksum("pkg-1", "43", "Jane Doe", "ZsiiiWnOWe/kp8dKf1ktfPDghS4=");
        assert_eq!(result, Err(ChecksumError::Mismatch));
    }

    #[test]
    fn verify_rejects_malformed_base64() {
        let result = verify_launch_checksum("pkg-1", "42", "Jane Doe", "not base64!");
        assert!(matches!(result, Err(ChecksumError::Malformed { .. })));
    }

    #[test]
    fn verify_rejects_truncated_digest() {
        let result = verify_launch_checksum("pkg-1", "42", "Jane Doe", "ZsiiiWnOWe8=");
        assert_eq!(result, Err(ChecksumError::Mismatch));
    }

    proptest! {
        #[test]
        fn prop_checksum_is_deterministic(
            package in ".{0,24}",
            id in "[0-9]{0,12}",
            name in ".{0,32}",
        ) {
            let first = launch_checksum(&package, &id, &name).unwrap();
            let second = launch_checksum(&package, &id, &name).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), CHECKSUM_LEN);
            prop_assert!(verify_launch_checksum(&package, &id, &name, &first).is_ok());
        }

        #[test]
        fn prop_student_id_change_is_detected(
            package in "[a-z0-9-]{1,16}",
            id in "[0-9]{1,12}",
            name in "[A-Za-z ]{1,24}",
        ) {
            let checksum = launch_checksum(&package, &id, &name).unwrap();
            let other_id = format!("{id}0");
            prop_assert_eq!(
                verify_launch_checksum(&package, &other_id, &name, &checksum),
                Err(ChecksumError::Mismatch)
            );
        }
    }
}
