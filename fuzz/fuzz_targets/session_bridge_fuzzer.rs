//! Fuzz target for [`SessionBridge`] state machine
//!
//! Make sure no sequence of posted messages can finish a session twice or
//! touch the host API after it finished.
//!
//! # Strategy
//!
//! - Origins: the launch origin or arbitrary strings
//! - `_type`: every protocol tag, arbitrary strings, non-strings, absent
//! - `grade` / `max`: integers, floats, numeric and junk strings, null, absent
//! - Non-object payloads and `beforeunload` interleaved anywhere
//!
//! # Invariants
//!
//! - NEVER panic on any payload
//! - At most one `Finish` action per session
//! - `Finish` is always preceded by a `cmi.core.exit` write
//! - No host action (set, commit, finish) once `Finished`
//! - `Finished` is terminal and its exit reason never changes
//! - Every `cmi.core.score.raw` write is a finite number
//! - An accepted `COMPLETE` always writes `lesson_status` and commits

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scorm_bridge_core::{
    cmi, BridgeAction, BridgeConfig, BridgeEvent, CmiValue, OriginPolicy, SessionBridge,
    SessionState,
};
use serde_json::{Map, Value};

const LAUNCH_URL: &str = "https://lms.example/scorm/launch";
const LAUNCH_ORIGIN: &str = "https://lms.example";

#[derive(Debug, Clone, Arbitrary)]
enum FuzzOrigin {
    Launch,
    Raw(String),
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzType {
    Incomplete,
    Complete,
    SessionExpired,
    LoggedOut,
    Raw(String),
    NonString(i64),
    Missing,
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
    Missing,
}

impl FuzzNumber {
    fn insert(&self, object: &mut Map<String, Value>, field: &str) {
        let value = match self {
            Self::Int(n) => Value::from(*n),
            Self::Float(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
            Self::Null => Value::Null,
            Self::Missing => return,
        };
        object.insert(field.to_string(), value);
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzEvent {
    Message { origin: FuzzOrigin, kind: FuzzType, grade: FuzzNumber, max: FuzzNumber },
    NonObject { origin: FuzzOrigin, text: String },
    BeforeUnload,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    exact_origin: bool,
    events: Vec<FuzzEvent>,
}

fn origin(origin: &FuzzOrigin) -> String {
    match origin {
        FuzzOrigin::Launch => LAUNCH_ORIGIN.to_string(),
        FuzzOrigin::Raw(s) => s.clone(),
    }
}

fn to_event(event: &FuzzEvent) -> BridgeEvent {
    match event {
        FuzzEvent::Message { origin: from, kind, grade, max } => {
            let mut object = Map::new();
            let tag = match kind {
                FuzzType::Incomplete => Some(Value::from("INCOMPLETE")),
                FuzzType::Complete => Some(Value::from("COMPLETE")),
                FuzzType::SessionExpired => Some(Value::from("SESSION_EXPIRED")),
                FuzzType::LoggedOut => Some(Value::from("LOGGED_OUT")),
                FuzzType::Raw(s) => Some(Value::from(s.as_str())),
                FuzzType::NonString(n) => Some(Value::from(*n)),
                FuzzType::Missing => None,
            };
            if let Some(tag) = tag {
                object.insert("_type".to_string(), tag);
            }
            grade.insert(&mut object, "grade");
            max.insert(&mut object, "max");

            BridgeEvent::Message { origin: origin(from), data: Value::Object(object) }
        },
        FuzzEvent::NonObject { origin: from, text } => {
            BridgeEvent::Message { origin: origin(from), data: Value::from(text.as_str()) }
        },
        FuzzEvent::BeforeUnload => BridgeEvent::BeforeUnload,
    }
}

fuzz_target!(|input: FuzzInput| {
    let policy = if input.exact_origin { OriginPolicy::ExactOrigin } else { OriginPolicy::Prefix };
    let config = BridgeConfig::new(LAUNCH_URL, "pkg-fuzz").with_origin_policy(policy);
    let mut bridge = SessionBridge::new(&config);

    let mut finishes = 0;
    let mut finished_state: Option<SessionState> = None;

    for event in input.events.iter().take(256) {
        let was_finished = bridge.is_finished();
        let actions = bridge.handle(to_event(event));

        let host_actions: Vec<&BridgeAction> =
            actions.iter().filter(|a| !matches!(a, BridgeAction::Log { .. })).collect();

        if was_finished {
            assert!(host_actions.is_empty(), "host action after finish: {host_actions:?}");
            assert_eq!(Some(bridge.state()), finished_state, "finished state changed");
            continue;
        }

        if let FuzzEvent::Message { origin: from, kind: FuzzType::Complete, .. } = event {
            if bridge.accepts_origin(&origin(from)) {
                assert!(
                    host_actions.iter().any(|a| matches!(
                        a,
                        BridgeAction::SetValue { element, .. } if *element == cmi::LESSON_STATUS
                    )),
                    "complete without lesson status: {host_actions:?}"
                );
                assert!(host_actions.iter().any(|a| matches!(a, BridgeAction::Commit)));
            }
        }

        for (i, action) in host_actions.iter().enumerate() {
            if let BridgeAction::SetValue { element, value } = action {
                if *element == cmi::SCORE_RAW {
                    assert!(
                        matches!(value, CmiValue::Number(n) if n.is_finite()),
                        "non-finite score: {value:?}"
                    );
                }
            }

            if matches!(action, BridgeAction::Finish) {
                finishes += 1;
                assert!(
                    i > 0
                        && matches!(
                            host_actions[i - 1],
                            BridgeAction::SetValue { element, .. } if *element == cmi::EXIT
                        ),
                    "finish without exit: {host_actions:?}"
                );
            }
        }

        if bridge.is_finished() {
            finished_state = Some(bridge.state());
        }
    }

    assert!(finishes <= 1, "finished {finishes} times");
    assert_eq!(finishes == 1, bridge.is_finished());
});
