//! SCORM Launch Bridge Core
//!
//! Protocol logic for bootstrapping a SCORM 1.2 content session, with every
//! platform dependency behind a trait:
//!
//! ```text
//! Launcher
//!   ├─ locator      (walk WindowLike parents/openers for the HostApi, retry)
//!   ├─ handshake    (LMSInitialize, read identity, sign, describe the form)
//!   ├─ LaunchSurface (platform adapter: submit form, show alert)
//!   └─ LaunchSession
//!        ├─ SessionBridge (pure state machine: events in, actions out)
//!        └─ executor      (apply actions to the HostApi)
//! ```
//!
//! # Components
//!
//! - [`Environment`]: time and sleeping, so retries run on a virtual clock in
//!   tests
//! - [`HostApi`]: the LMS-provided SCORM API object
//! - [`WindowLike`]: the window hierarchy the API is found in
//! - [`SessionBridge`]: maps content messages and window teardown to SCORM
//!   calls, finishing at most once

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bridge;
pub mod config;
pub mod env;
mod error;
mod executor;
pub mod handshake;
mod host;
mod launcher;
pub mod locator;
mod window;

pub use bridge::{BridgeAction, BridgeEvent, LogLevel, MessageRejection, SessionBridge, SessionState};
pub use config::{BridgeConfig, ConfigError, OriginPolicy, RetryPolicy};
pub use env::Environment;
pub use error::{LaunchError, LocateError};
pub use executor::execute_actions;
pub use handshake::{Handshake, perform_handshake};
pub use host::HostApi;
pub use launcher::{LaunchSession, LaunchSurface, Launcher};
pub use locator::{MAX_PARENT_HOPS, find_api, locate, locate_once};
pub use scorm_bridge_proto::{
    CmiValue, ExitReason, InboundMessage, LaunchForm, LaunchFrame, LaunchIdentity, LessonStatus,
    cmi,
};
pub use window::{WindowAccessError, WindowLike};
