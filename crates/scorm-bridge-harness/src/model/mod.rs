//! Reference model for model-based testing.
//!
//! The model keeps only what a host would observe after each event: which
//! data model elements were written, how often the session committed, and
//! whether it finished. It is the oracle the real [`SessionBridge`] plus
//! [`execute_actions`] pipeline is checked against.
//!
//! [`SessionBridge`]: scorm_bridge_core::SessionBridge
//! [`execute_actions`]: scorm_bridge_core::execute_actions

pub mod operation;
mod session;

use scorm_bridge_core::{BridgeConfig, OriginPolicy};
pub use operation::{MessageChoice, Operation, OriginChoice};
pub use session::{ModelSession, ObservableState, observe_host};

/// Launch URL used by model runs.
pub const MODEL_LAUNCH_URL: &str = "https://lms.example/scorm/launch";

/// Serialized origin of [`MODEL_LAUNCH_URL`].
pub const MODEL_LAUNCH_ORIGIN: &str = "https://lms.example";

/// Package ID used by model runs.
pub const MODEL_PACKAGE_ID: &str = "pkg-model";

/// Bridge configuration matching the model.
pub fn model_config(policy: OriginPolicy) -> BridgeConfig {
    BridgeConfig::new(MODEL_LAUNCH_URL, MODEL_PACKAGE_ID).with_origin_policy(policy)
}
