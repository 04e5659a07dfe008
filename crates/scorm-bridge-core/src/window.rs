//! Window hierarchy capability.

use thiserror::Error;

/// Access to a property was refused, typically because the window belongs to
/// another origin.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("window access denied: {reason}")]
pub struct WindowAccessError {
    reason: String,
}

impl WindowAccessError {
    /// Create an access error with a description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// A browsing context the locator can inspect.
///
/// Mirrors the parts of `Window` the SCORM discovery convention uses:
/// `.API`, `.parent`, `.top` and `.opener`. A top-level window is its own
/// parent.
pub trait WindowLike: Sized {
    /// Handle to the SCORM API object found on a window.
    type Api;

    /// The window's `API` property.
    fn api(&self) -> Result<Option<Self::Api>, WindowAccessError>;

    /// The window's `parent`. `None` when the platform exposes no parent.
    fn parent(&self) -> Result<Option<Self>, WindowAccessError>;

    /// The outermost window of this window's frame tree.
    fn top(&self) -> Self;

    /// The window that opened this one, if any.
    fn opener(&self) -> Result<Option<Self>, WindowAccessError>;

    /// Returns true if both handles refer to the same browsing context.
    fn is_same_window(&self, other: &Self) -> bool;
}
