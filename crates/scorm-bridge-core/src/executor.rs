//! Applies bridge actions to the host API.

use crate::{
    bridge::{BridgeAction, FINISH_ARG, LogLevel},
    host::HostApi,
};

/// Execute bridge actions against `api`, in order.
///
/// `Log` actions go to `tracing`; everything else is a SCORM call.
pub fn execute_actions<H: HostApi + ?Sized>(api: &mut H, actions: &[BridgeAction]) {
    for action in actions {
        match action {
            BridgeAction::SetValue { element, value } => {
                tracing::debug!(element, %value, "LMSSetValue");
                api.lms_set_value(element, value);
            },
            BridgeAction::Commit => {
                tracing::debug!("LMSCommit");
                api.lms_commit();
            },
            BridgeAction::Finish => {
                tracing::debug!("LMSFinish");
                api.lms_finish(FINISH_ARG);
            },
            BridgeAction::Log { level, message } => match level {
                LogLevel::Debug => tracing::debug!("{}", message),
                LogLevel::Info => tracing::info!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use scorm_bridge_proto::CmiValue;

    use super::*;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl HostApi for Calls {
        fn lms_initialize(&mut self, arg: &str) -> bool {
            self.0.push(format!("LMSInitialize({arg})"));
            true
        }

        fn lms_get_value(&mut self, element: &str) -> String {
            self.0.push(format!("LMSGetValue({element})"));
            String::new()
        }

        fn lms_set_value(&mut self, element: &str, value: &CmiValue) {
            self.0.push(format!("LMSSetValue({element}, {value})"));
        }

        fn lms_commit(&mut self) {
            self.0.push("LMSCommit()".to_string());
        }

        fn lms_finish(&mut self, arg: &str) {
            self.0.push(format!("LMSFinish({arg})"));
        }
    }

    #[test]
    fn applies_calls_in_order_and_skips_logs() {
        let mut api = Calls::default();
        execute_actions(
            &mut api,
            &[
                BridgeAction::SetValue { element: "cmi.core.score.raw", value: 90.0.into() },
                BridgeAction::Log { level: LogLevel::Info, message: "hello".to_string() },
                BridgeAction::Commit,
                BridgeAction::Finish,
            ],
        );

        assert_eq!(
            api.0,
            ["LMSSetValue(cmi.core.score.raw, 90)", "LMSCommit()", "LMSFinish()"]
        );
    }
}
