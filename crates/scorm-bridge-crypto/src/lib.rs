//! SCORM Launch Bridge Checksum Primitives
//!
//! This crate computes and verifies the checksum that accompanies every
//! launch form submission.
//!
//! # Design
//!
//! All functions in this crate are pure - they have no side effects and
//! produce deterministic outputs given the same inputs. The launch identity
//! is passed in by the caller, so both the browser-side bridge and the
//! server-side verifier share one implementation.
//!
//! # Security Properties
//!
//! The checksum is HMAC-SHA1 keyed by the package ID. It is a legacy
//! integrity tag the launch endpoint expects, NOT a security boundary: the
//! key is the package ID, which is embedded in the page served to the
//! learner. Do not reuse this construction for anything that needs
//! authentication or confidentiality.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod checksum;

pub use checksum::{
    CHECKSUM_LEN, ChecksumError, IDENTITY_SEPARATOR, hmac_sha1_base64, identity_message,
    launch_checksum, verify_launch_checksum,
};
