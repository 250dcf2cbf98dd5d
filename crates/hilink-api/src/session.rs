// ── Adapter seam ──
//
// The router protocol itself lives outside this workspace. Adapters
// implement `RouterConnector` to open a `RouterSession`; every call on a
// session is blocking and must be driven from a blocking-capable thread.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dhcp::DhcpSettingsUpdate;
use crate::error::Error;
use crate::target::ConnectionTarget;

/// Arbitrary key-value mapping returned by a router read call.
pub type Record = Map<String, Value>;

/// Opens authenticated sessions against a router.
///
/// Implementations must be cheap to share: the core holds one connector per
/// configured router and calls `connect` once per poll or write.
pub trait RouterConnector: Send + Sync + 'static {
    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn RouterSession>, Error>;
}

/// A live, authenticated session. Not shared across operations.
pub trait RouterSession: Send {
    // ── Reads ────────────────────────────────────────────────────────
    fn device_information(&mut self) -> Result<Record, Error>;
    fn dhcp_settings(&mut self) -> Result<Record, Error>;
    fn device_signal(&mut self) -> Result<Record, Error>;
    fn monitoring_status(&mut self) -> Result<Record, Error>;
    fn traffic_statistics(&mut self) -> Result<Record, Error>;
    fn lan_host_info(&mut self) -> Result<Record, Error>;

    // ── Writes ───────────────────────────────────────────────────────
    /// Replace the router's DHCP/DNS settings. All fields are required.
    fn set_dhcp_settings(&mut self, settings: &DhcpSettingsUpdate) -> Result<(), Error>;
    fn reboot(&mut self) -> Result<(), Error>;

    /// Log out and release the session.
    fn close(&mut self) -> Result<(), Error>;
}

/// Session handle that always closes on drop.
///
/// Opened with [`ScopedSession::open`]; derefs to the underlying
/// [`RouterSession`]. The close runs whether the operation that used the
/// session succeeded, failed, or unwound.
pub struct ScopedSession {
    session: Box<dyn RouterSession>,
    host: String,
}

impl ScopedSession {
    pub fn open(connector: &dyn RouterConnector, target: &ConnectionTarget) -> Result<Self, Error> {
        let session = connector.connect(target)?;
        debug!(host = %target.host, "router session opened");
        Ok(Self {
            session,
            host: target.host.clone(),
        })
    }
}

impl Deref for ScopedSession {
    type Target = dyn RouterSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for ScopedSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        match self.session.close() {
            Ok(()) => debug!(host = %self.host, "router session closed"),
            Err(e) => warn!(host = %self.host, error = %e, "router session close failed (non-fatal)"),
        }
    }
}
