//! Deterministic simulation harness for SCORM launch bridge testing.
//!
//! Test doubles for every platform seam in `scorm-bridge-core`:
//!
//! - [`SimEnv`]: virtual clock; sleeps are recorded and complete instantly
//! - [`WindowGraph`] / [`SimWindow`]: synthetic frame trees with openers,
//!   cross-origin windows and probe counters
//! - [`RecordingHost`]: a SCORM API that records every call
//! - [`RecordingSurface`]: captures submitted forms and alerts
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the session
//! bridge. Operations are applied to both the model and the real bridge, and
//! their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod recording_host;
pub mod sim_env;
pub mod sim_surface;
pub mod sim_window;

pub use model::{
    MODEL_LAUNCH_ORIGIN, MODEL_LAUNCH_URL, MODEL_PACKAGE_ID, MessageChoice, ModelSession,
    ObservableState, Operation, OriginChoice, model_config, observe_host,
};
pub use recording_host::{HostCall, RecordingHost};
pub use sim_env::SimEnv;
pub use sim_surface::RecordingSurface;
pub use sim_window::{SimWindow, WindowGraph, WindowGraphBuilder, WindowId};
