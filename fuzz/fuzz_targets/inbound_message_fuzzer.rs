//! Fuzz target for inbound message decoding
//!
//! # Strategy
//!
//! - Raw bytes interpreted as UTF-8 JSON text
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - Any score field a decoded `COMPLETE` carries is finite
//! - The percentage, when there is one, is finite
//! - Re-encoding a decoded message decodes to the same message

#![no_main]

use libfuzzer_sys::fuzz_target;
use scorm_bridge_proto::{score_percent, InboundMessage};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(message) = InboundMessage::from_json(text) else {
        return;
    };

    if let InboundMessage::Complete { grade, max } = message {
        assert!(grade.is_none_or(f64::is_finite));
        assert!(max.is_none_or(f64::is_finite));
        let percent = grade.zip(max).and_then(|(grade, max)| score_percent(grade, max));
        if let Some(percent) = percent {
            assert!(percent.is_finite(), "percentage {percent} from {grade:?}/{max:?}");
        }
    }

    let reencoded = InboundMessage::from_value(&message.to_value());
    assert_eq!(reencoded, Ok(message));
});
