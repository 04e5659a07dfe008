//! Host API Locator
//!
//! Finds the SCORM API object the LMS placed on an ancestor window (content
//! in a frame) or on the opener's frame tree (content in a new window).
//!
//! ## Algorithm
//!
//! 1. Walk `.parent` upward from `window.parent`, stopping at the first
//!    window with an `API`, at a self-parented window, or after
//!    [`MAX_PARENT_HOPS`] hops.
//! 2. If that finds nothing, repeat the walk from `window.top.opener`.
//! 3. [`locate`] repeats steps 1-2 on the configured retry budget.
//!
//! Access errors (cross-origin windows) end the walk on that path and count
//! as "not found".

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{config::RetryPolicy, env::Environment, error::LocateError, window::WindowLike};

/// Upper bound on `.parent` hops in one walk.
pub const MAX_PARENT_HOPS: usize = 500;

/// Walk `.parent` from `start` looking for an `API` property.
pub fn find_api<W: WindowLike>(start: W) -> Option<W::Api> {
    let mut window = start;
    let mut hops = 0;

    loop {
        match window.api() {
            Ok(Some(api)) => {
                debug!(hops, "found SCORM API");
                return Some(api);
            },
            Ok(None) => {},
            Err(e) => {
                debug!(hops, error = %e, "API property not readable");
                return None;
            },
        }

        if hops == MAX_PARENT_HOPS {
            debug!("gave up after {MAX_PARENT_HOPS} parent hops");
            return None;
        }

        let parent = match window.parent() {
            Ok(Some(parent)) => parent,
            Ok(None) => return None,
            Err(e) => {
                debug!(hops, error = %e, "parent not readable");
                return None;
            },
        };

        // Top-level windows are their own parent
        if parent.is_same_window(&window) {
            return None;
        }

        window = parent;
        hops += 1;
    }
}

/// One locate attempt: the parent chain first, then the top opener's chain.
pub fn locate_once<W: WindowLike>(window: &W) -> Option<W::Api> {
    match window.parent() {
        Ok(Some(parent)) if !parent.is_same_window(window) => {
            if let Some(api) = find_api(parent) {
                return Some(api);
            }
        },
        Ok(_) => {},
        Err(e) => debug!(error = %e, "window.parent not readable"),
    }

    match window.top().opener() {
        Ok(Some(opener)) => find_api(opener),
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "window.top.opener not readable");
            None
        },
    }
}

/// Locate the host API, retrying on `policy`.
///
/// Makes exactly `policy.max_attempts` attempts with `policy.interval()`
/// between them and does not sleep after the last one.
pub async fn locate<E, W>(
    env: &E,
    window: &W,
    policy: &RetryPolicy,
) -> Result<W::Api, LocateError>
where
    E: Environment,
    W: WindowLike,
{
    let started = env.now();

    for attempt in 1..=policy.max_attempts {
        if let Some(api) = locate_once(window) {
            let elapsed: Duration = env.now().saturating_duration_since(started);
            info!(attempt, ?elapsed, "located SCORM API");
            return Ok(api);
        }

        if attempt < policy.max_attempts {
            debug!(attempt, "SCORM API not found, retrying in {:?}", policy.interval());
            env.sleep(policy.interval()).await;
        }
    }

    warn!(attempts = policy.max_attempts, "SCORM API not found");
    Err(LocateError::ApiNotFound { attempts: policy.max_attempts })
}
