//! SCORM Launch Bridge Protocol
//!
//! Data types shared by the bridge and its adapters:
//!
//! - [`InboundMessage`]: the `_type`-tagged messages the embedded content
//!   frame posts to the bridge
//! - [`CmiValue`] and the [`cmi`] element names written to the host API
//! - [`LaunchIdentity`], [`LaunchForm`], [`LaunchFrame`]: the signed launch
//!   form and the iframe it targets
//!
//! Nothing in this crate performs I/O. Rendering a form to HTML returns a
//! string for the caller to place.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cmi;
pub mod launch;
pub mod message;

pub use cmi::{CmiValue, ExitReason, LessonStatus};
pub use launch::{
    DEFAULT_FRAME_NAME, FRAME_STYLE, FormField, LAUNCH_FORM_ID, LaunchForm, LaunchFrame,
    LaunchIdentity, build_launch_form,
};
pub use message::{InboundMessage, MessageError, TYPE_FIELD, score_percent};
