//! Model-based property tests.
//!
//! Random event sequences are applied to the reference model and to a real
//! launched session backed by a recording host. After every event the host
//! must look exactly like the model says it should.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!     ModelSession    LaunchSession    Compare
//!     (reference)   (RecordingHost)   host state
//! ```

#![allow(clippy::unwrap_used, clippy::panic)]

use proptest::prelude::*;
use scorm_bridge_core::{LaunchIdentity, LaunchSession, OriginPolicy, SessionBridge};
use scorm_bridge_harness::{
    MODEL_PACKAGE_ID, MessageChoice, ModelSession, Operation, OriginChoice, RecordingHost,
    model_config, observe_host,
};

/// Real session wired to a recording host.
struct RealSession {
    host: RecordingHost,
    session: LaunchSession<RecordingHost>,
}

impl RealSession {
    fn new(policy: OriginPolicy) -> Self {
        let host = RecordingHost::with_student("42", "Jane Doe");
        let identity = LaunchIdentity::sign(MODEL_PACKAGE_ID, None, "42", "Jane Doe").unwrap();
        let bridge = SessionBridge::new(&model_config(policy));
        Self { host: host.clone(), session: LaunchSession::new(host, identity, bridge) }
    }

    fn apply(&mut self, op: &Operation) {
        match *op {
            Operation::Post { origin, message } => {
                self.session.on_message(origin.as_origin(), message.to_value());
            },
            Operation::BeforeUnload => {
                self.session.on_before_unload();
            },
        }
    }
}

fn origin_strategy() -> impl Strategy<Value = OriginChoice> {
    prop_oneof![
        4 => Just(OriginChoice::Launch),
        1 => Just(OriginChoice::TruncatedLaunch),
        1 => Just(OriginChoice::FullLaunchUrl),
        1 => Just(OriginChoice::Empty),
        1 => Just(OriginChoice::LookAlike),
        1 => Just(OriginChoice::Foreign),
    ]
}

fn message_strategy() -> impl Strategy<Value = MessageChoice> {
    prop_oneof![
        3 => Just(MessageChoice::Incomplete),
        3 => (any::<u8>(), any::<u8>())
            .prop_map(|(grade, max)| MessageChoice::Complete { grade, max }),
        1 => (any::<u8>(), any::<u8>())
            .prop_map(|(grade, max)| MessageChoice::CompleteAsText { grade, max }),
        1 => Just(MessageChoice::SessionExpired),
        1 => Just(MessageChoice::LoggedOut),
        1 => Just(MessageChoice::Unknown),
        1 => Just(MessageChoice::Untagged),
    ]
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        9 => (origin_strategy(), message_strategy())
            .prop_map(|(origin, message)| Operation::Post { origin, message }),
        1 => Just(Operation::BeforeUnload),
    ]
}

fn policy_strategy() -> impl Strategy<Value = OriginPolicy> {
    prop_oneof![Just(OriginPolicy::Prefix), Just(OriginPolicy::ExactOrigin)]
}

proptest! {
    /// Host state matches the model after every event.
    #[test]
    fn prop_model_matches_real(
        policy in policy_strategy(),
        ops in prop::collection::vec(operation_strategy(), 0..60),
    ) {
        let mut model = ModelSession::new(policy);
        let mut real = RealSession::new(policy);

        for (i, op) in ops.iter().enumerate() {
            model.apply(op);
            real.apply(op);

            prop_assert_eq!(
                observe_host(&real.host),
                model.observable_state(),
                "diverged at op {}: {:?}",
                i,
                op
            );
            prop_assert_eq!(real.session.is_finished(), model.is_finished());
        }
    }

    /// `LMSFinish` is called at most once and nothing follows it.
    #[test]
    fn prop_finish_is_final(ops in prop::collection::vec(operation_strategy(), 0..60)) {
        let mut real = RealSession::new(OriginPolicy::Prefix);
        for op in &ops {
            real.apply(op);
        }
        real.apply(&Operation::BeforeUnload);

        prop_assert_eq!(real.host.finish_count(), 1);
        prop_assert!(real.host.calls_after_finish().is_empty());
    }
}

#[test]
fn teardown_alone_suspends() {
    let mut model = ModelSession::new(OriginPolicy::Prefix);
    let mut real = RealSession::new(OriginPolicy::Prefix);

    model.apply(&Operation::BeforeUnload);
    real.apply(&Operation::BeforeUnload);

    let observed = observe_host(&real.host);
    assert_eq!(observed, model.observable_state());
    assert_eq!(observed.exit.as_deref(), Some("suspend"));
}

#[test]
fn ungraded_complete_is_recorded() {
    let mut model = ModelSession::new(OriginPolicy::Prefix);
    let mut real = RealSession::new(OriginPolicy::Prefix);
    let op = Operation::Post {
        origin: OriginChoice::Launch,
        message: MessageChoice::Complete { grade: 0, max: 0 },
    };

    model.apply(&op);
    real.apply(&op);

    let observed = observe_host(&real.host);
    assert_eq!(observed, model.observable_state());
    assert_eq!(observed.lesson_status.as_deref(), Some("completed"));
    assert_eq!(observed.score_raw, None);
    assert_eq!(observed.commits, 1);
}
