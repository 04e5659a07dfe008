//! Launcher: locate, handshake, submit, then hand back a live session.

use scorm_bridge_proto::{LaunchForm, LaunchFrame, LaunchIdentity};
use serde_json::Value;

use crate::{
    bridge::{BridgeAction, BridgeEvent, SessionBridge, SessionState},
    config::BridgeConfig,
    env::Environment,
    error::LaunchError,
    executor::execute_actions,
    handshake::{Handshake, perform_handshake},
    host::HostApi,
    locator::locate,
    window::WindowLike,
};

/// Platform adapter for the two visible effects of a launch.
pub trait LaunchSurface {
    /// Insert `frame` and the hidden `form` into the document and submit the
    /// form.
    fn submit(&mut self, frame: &LaunchFrame, form: &LaunchForm);

    /// Show a blocking, fatal error to the learner.
    fn alert(&mut self, message: &str);
}

/// Runs the launch sequence for one page load.
#[derive(Debug, Clone)]
pub struct Launcher<E: Environment> {
    env: E,
    config: BridgeConfig,
}

impl<E: Environment> Launcher<E> {
    /// Create a launcher. The config is validated up front.
    pub fn new(env: E, config: BridgeConfig) -> Result<Self, LaunchError> {
        config.validate()?;
        Ok(Self { env, config })
    }

    /// The launcher's configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Locate the host API from `window`, run the handshake, and submit the
    /// launch form through `surface`.
    ///
    /// On a fatal error the surface is alerted exactly once and no form is
    /// submitted.
    pub async fn launch<W, S>(
        &self,
        window: &W,
        surface: &mut S,
    ) -> Result<LaunchSession<W::Api>, LaunchError>
    where
        W: WindowLike,
        W::Api: HostApi,
        S: LaunchSurface + ?Sized,
    {
        let result = self.try_launch(window).await;

        match result {
            Ok((api, handshake)) => {
                surface.submit(&handshake.frame, &handshake.form);
                Ok(LaunchSession::new(api, handshake.identity, SessionBridge::new(&self.config)))
            },
            Err(e) => {
                tracing::error!(error = %e, "launch aborted");
                if e.is_fatal() {
                    surface.alert(&e.to_string());
                }
                Err(e)
            },
        }
    }

    async fn try_launch<W>(&self, window: &W) -> Result<(W::Api, Handshake), LaunchError>
    where
        W: WindowLike,
        W::Api: HostApi,
    {
        let mut api = locate(&self.env, window, &self.config.locator).await?;
        let handshake = perform_handshake(&mut api, &self.config)?;
        Ok((api, handshake))
    }
}

/// A launched session: the host API plus the bridge state machine that
/// drives it.
#[derive(Debug)]
pub struct LaunchSession<H> {
    api: H,
    identity: LaunchIdentity,
    bridge: SessionBridge,
}

impl<H: HostApi> LaunchSession<H> {
    /// Wrap an initialized host API.
    pub fn new(api: H, identity: LaunchIdentity, bridge: SessionBridge) -> Self {
        Self { api, identity, bridge }
    }

    /// Feed an event through the bridge and apply the resulting actions.
    ///
    /// Returns the actions that were executed.
    pub fn dispatch(&mut self, event: BridgeEvent) -> Vec<BridgeAction> {
        let actions = self.bridge.handle(event);
        execute_actions(&mut self.api, &actions);
        actions
    }

    /// A `message` event from the content frame.
    pub fn on_message(&mut self, origin: impl Into<String>, data: Value) -> Vec<BridgeAction> {
        self.dispatch(BridgeEvent::Message { origin: origin.into(), data })
    }

    /// The window's `beforeunload` event.
    pub fn on_before_unload(&mut self) -> Vec<BridgeAction> {
        self.dispatch(BridgeEvent::BeforeUnload)
    }

    /// Current bridge state.
    pub fn state(&self) -> SessionState {
        self.bridge.state()
    }

    /// Returns true once `LMSFinish` has been issued.
    pub fn is_finished(&self) -> bool {
        self.bridge.is_finished()
    }

    /// Identity submitted with the launch form.
    pub fn identity(&self) -> &LaunchIdentity {
        &self.identity
    }

    /// The host API.
    pub fn api(&self) -> &H {
        &self.api
    }
}
