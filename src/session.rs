//! Presence session lifecycle
//!
//! Owns at most one live connection to the broadcast service, plus the
//! elapsed-time → start-timestamp computation used when building the
//! outbound payload.

use std::fmt;

use tracing::{info, warn};

use crate::constants::elapsed;
use crate::error::{SessionError, TeardownError};
use crate::service::{PresenceService, PresenceUpdate};

/// Unit for the user-supplied "how long ago did you start" input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ElapsedUnit {
    Hours,
    Minutes,
    Seconds,
}

impl ElapsedUnit {
    fn seconds(self) -> f64 {
        match self {
            ElapsedUnit::Hours => elapsed::HOUR_SECS,
            ElapsedUnit::Minutes => elapsed::MINUTE_SECS,
            ElapsedUnit::Seconds => 1.0,
        }
    }
}

impl fmt::Display for ElapsedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElapsedUnit::Hours => "hours",
            ElapsedUnit::Minutes => "minutes",
            ElapsedUnit::Seconds => "seconds",
        })
    }
}

/// Compute the absolute activity start from a relative elapsed input.
///
/// Returns `None` for unparseable, non-finite or negative input. The
/// elapsed value is user-facing and frequently malformed; callers omit
/// the start time from the payload instead of failing the activation.
pub fn compute_start_timestamp(raw: &str, unit: ElapsedUnit, now: i64) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(now - (value * unit.seconds()) as i64)
}

struct ActiveConn<C> {
    client_id: String,
    conn: C,
}

/// The single live connection to the broadcast service.
///
/// At most one connection handle is outstanding at any time; every
/// transition out of the active state releases the handle first. Not
/// designed for concurrent callers.
pub struct PresenceSession<S: PresenceService> {
    service: S,
    active: Option<ActiveConn<S::Conn>>,
}

impl<S: PresenceService> PresenceSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Client id the active connection was opened with, if any.
    pub fn active_client_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.client_id.as_str())
    }

    /// Connect and send the initial update, replacing any active session.
    ///
    /// An existing session is fully deactivated first; a teardown failure
    /// is reported to the caller before any new connection is attempted.
    /// On connection or update failure the session ends inactive with no
    /// handle retained.
    pub fn activate(
        &mut self,
        client_id: &str,
        update: &PresenceUpdate,
    ) -> Result<(), SessionError> {
        if let Some(current) = self.active_client_id() {
            info!(current_client_id = %current, client_id = %client_id, "replacing active presence session");
            self.deactivate()?;
        }

        let mut conn = self
            .service
            .connect(client_id)
            .map_err(SessionError::Connection)?;

        if let Err(err) = self.service.update(&mut conn, update) {
            if let Err(close_err) = self.service.close(conn) {
                warn!("failed to close connection after update failure: {close_err:#}");
            }
            return Err(SessionError::Update(err));
        }

        self.active = Some(ActiveConn {
            client_id: client_id.to_string(),
            conn,
        });
        info!(client_id = %client_id, "presence session active");
        Ok(())
    }

    /// Tear down the active session, if any.
    ///
    /// Best-effort: the remote clear and the connection close are both
    /// attempted even if the first fails, and the session is inactive
    /// afterwards regardless of the outcome.
    pub fn deactivate(&mut self) -> Result<(), SessionError> {
        let Some(ActiveConn {
            client_id,
            mut conn,
        }) = self.active.take()
        else {
            return Ok(());
        };

        let clear = self.service.clear(&mut conn).err();
        let close = self.service.close(conn).err();
        if clear.is_some() || close.is_some() {
            return Err(SessionError::Teardown(TeardownError { clear, close }));
        }

        info!(client_id = %client_id, "presence session stopped");
        Ok(())
    }
}

impl<S: PresenceService> Drop for PresenceSession<S> {
    fn drop(&mut self) {
        if let Err(err) = self.deactivate() {
            warn!("presence teardown on drop: {err}");
        }
    }
}
