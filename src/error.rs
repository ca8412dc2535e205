//! Central error types for the profile store and presence session.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from [`crate::store::ProfileStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No persisted profile exists under this name
    #[error("no profile named `{0}`")]
    NotFound(String),

    /// The name cannot be used as a filesystem entry
    #[error("invalid profile name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A required profile field is empty
    #[error("invalid profile: {0}")]
    InvalidProfile(&'static str),

    /// Underlying filesystem failure
    #[error("failed to {op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from [`crate::session::PresenceSession`] transitions.
///
/// Every variant leaves the session `Inactive` with no connection handle
/// retained.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Opening the external connection failed
    #[error("failed to connect to the presence service: {0:#}")]
    Connection(anyhow::Error),

    /// The connection opened but the update call failed
    #[error("failed to send presence update: {0:#}")]
    Update(anyhow::Error),

    /// One or both teardown steps failed
    #[error("presence teardown incomplete: {0}")]
    Teardown(TeardownError),
}

/// Failure detail from a best-effort teardown.
///
/// The clear and close steps fail independently; both are always
/// attempted.
#[derive(Debug)]
pub struct TeardownError {
    pub clear: Option<anyhow::Error>,
    pub close: Option<anyhow::Error>,
}

impl TeardownError {
    #[allow(dead_code)]
    pub fn clear_failed(&self) -> bool {
        self.clear.is_some()
    }

    #[allow(dead_code)]
    pub fn close_failed(&self) -> bool {
        self.close.is_some()
    }
}

impl fmt::Display for TeardownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.clear, &self.close) {
            (Some(clear), Some(close)) => {
                write!(f, "clear failed: {clear:#}; close failed: {close:#}")
            }
            (Some(clear), None) => write!(f, "clear failed: {clear:#}"),
            (None, Some(close)) => write!(f, "close failed: {close:#}"),
            (None, None) => write!(f, "no teardown failure"),
        }
    }
}

impl std::error::Error for TeardownError {}
