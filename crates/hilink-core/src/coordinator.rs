// ── Polling coordinator ──
//
// Owns the poll cycle and cached snapshot for one router. Every router
// call runs on the blocking pool inside a fresh session; one operation is
// in flight per router at a time, and a write is always followed by a
// refresh under the same guard.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use hilink_api::{ConnectionTarget, RouterConnector, ScopedSession};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult, RouterInfo};
use crate::config::RouterConfig;
use crate::dns;
use crate::error::CoreError;
use crate::model::{Snapshot, value_to_text};
use crate::store::{RefreshStatus, SnapshotStore};
use crate::stream::SnapshotStream;

/// Handle to one router's coordinator.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Projections and the
/// registry each hold a clone.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: RouterConfig,
    target: ConnectionTarget,
    connector: Arc<dyn RouterConnector>,
    store: SnapshotStore,
    /// Serialises polls and commands, spanning a write and its refresh.
    io_lock: Mutex<()>,
    /// Held by the blocking task until its session has closed, so an
    /// operation abandoned on timeout still blocks the next one.
    session_lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for CoordinatorInner {
    fn drop(&mut self) {
        // Last handle gone: stop a poll task the host never shut down.
        self.cancel.cancel();
    }
}

impl Coordinator {
    /// Create a coordinator. Does NOT poll -- call [`refresh()`](Self::refresh)
    /// for the first snapshot and [`start()`](Self::start) for background polling.
    pub fn new(config: RouterConfig, connector: Arc<dyn RouterConnector>) -> Result<Self, CoreError> {
        let target = config.target()?;

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                target,
                connector,
                store: SnapshotStore::new(),
                io_lock: Mutex::new(()),
                session_lock: Arc::new(Mutex::new(())),
                cancel: CancellationToken::new(),
                poll_handle: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// The router URL this coordinator was registered under.
    pub fn url(&self) -> &str {
        &self.inner.config.url
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    // ── Snapshot access ──────────────────────────────────────────

    /// The last good snapshot; empty until the first poll succeeds.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    pub fn status(&self) -> RefreshStatus {
        self.inner.store.status()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Fetch all datasets in one session and replace the cached snapshot.
    ///
    /// On failure the cached snapshot is kept, the failure is recorded in
    /// [`status()`](Self::status), and a [`CoreError::Fetch`] is returned.
    /// No retry: the next scheduled poll is the next attempt.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.ensure_running()?;
        let _guard = self.inner.io_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh with `io_lock` already held.
    async fn refresh_locked(&self) -> Result<Arc<Snapshot>, CoreError> {
        let result = self
            .run_blocking(fetch_snapshot, |source| CoreError::Fetch { source })
            .await;

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.store.replace(Arc::clone(&snapshot));
                debug!(
                    url = %self.url(),
                    lan_hosts = snapshot.lan_host_info.len(),
                    "router refresh complete"
                );
                Ok(snapshot)
            }
            Err(e) => {
                self.inner.store.record_failure(&e.to_string());
                Err(e)
            }
        }
    }

    /// Start the background poll task. No-op if already started or if the
    /// scan interval is zero.
    pub async fn start(&self) {
        let interval = self.inner.config.scan_interval;
        if interval.is_zero() || !self.is_running() {
            return;
        }

        let mut handle = self.inner.poll_handle.lock().await;
        if handle.is_none() {
            let cancel = self.inner.cancel.clone();
            let weak = Arc::downgrade(&self.inner);
            *handle = Some(tokio::spawn(poll_task(weak, interval, cancel)));
            debug!(url = %self.url(), interval_secs = interval.as_secs(), "polling started");
        }
    }

    /// Stop polling and reject further operations.
    ///
    /// An in-flight poll is allowed to finish; the snapshot it produces (if
    /// any) still lands atomically.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let handle = self.inner.poll_handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!(url = %self.url(), "coordinator stopped");
    }

    // ── Command execution ────────────────────────────────────────

    /// Run a command against the router.
    ///
    /// Writes are followed by a refresh under the same guard so projections
    /// observe the change. A failed refresh after a successful write is
    /// logged and recorded in the status, not returned. A failed write does
    /// not refresh.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        self.ensure_running()?;
        let _guard = self.inner.io_lock.lock().await;

        let operation = cmd.operation();
        let is_write = cmd.is_write();
        let result = self.route_command(cmd).await?;

        if is_write {
            if let Err(e) = self.refresh_locked().await {
                warn!(url = %self.url(), error = %e, "refresh after {operation} failed");
            }
        }

        Ok(result)
    }

    /// Set DNS servers. `None` keeps the router's current value.
    pub async fn update_dns(
        &self,
        primary: Option<String>,
        secondary: Option<String>,
    ) -> Result<(), CoreError> {
        self.execute(Command::SetDns { primary, secondary })
            .await
            .map(|_| ())
    }

    pub async fn reboot(&self) -> Result<(), CoreError> {
        self.execute(Command::Reboot).await.map(|_| ())
    }

    pub async fn router_info(&self) -> Result<RouterInfo, CoreError> {
        match self.execute(Command::GetInfo).await? {
            CommandResult::Info(info) => Ok(info),
            CommandResult::Ok => Err(CoreError::Internal(
                "device info command returned no data".into(),
            )),
        }
    }

    async fn route_command(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let operation = cmd.operation();
        let write_err = move |source: hilink_api::Error| CoreError::Write { operation, source };

        match cmd {
            Command::SetDns { primary, secondary } => {
                let sent = self
                    .run_blocking(
                        move |session| {
                            dns::write_dns(&mut **session, primary.as_deref(), secondary.as_deref())
                        },
                        write_err,
                    )
                    .await?;
                info!(
                    url = %self.url(),
                    primary = ?sent.primary_dns,
                    secondary = ?sent.secondary_dns,
                    "DNS settings updated"
                );
                Ok(CommandResult::Ok)
            }

            Command::Reboot => {
                self.run_blocking(|session| session.reboot(), write_err)
                    .await?;
                info!(url = %self.url(), "router reboot requested");
                Ok(CommandResult::Ok)
            }

            Command::GetInfo => {
                let record = self
                    .run_blocking(
                        |session| session.device_information(),
                        |source| CoreError::Fetch { source },
                    )
                    .await?;
                let info = RouterInfo {
                    device_name: record.get("DeviceName").and_then(value_to_text),
                    software_version: record.get("SoftwareVersion").and_then(value_to_text),
                };
                info!(
                    url = %self.url(),
                    device = ?info.device_name,
                    software = ?info.software_version,
                    "router information"
                );
                Ok(CommandResult::Info(info))
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(CoreError::Stopped {
                url: self.url().to_owned(),
            })
        }
    }

    /// Open a session on the blocking pool, run `op`, close the session.
    ///
    /// Adapter failures go through `wrap`. An operation exceeding the
    /// configured timeout (including time spent waiting for an earlier,
    /// abandoned operation) is reported as a timeout. The blocking call
    /// keeps `session_lock` until its session closes.
    async fn run_blocking<T, F, W>(&self, op: F, wrap: W) -> Result<T, CoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut ScopedSession) -> Result<T, hilink_api::Error> + Send + 'static,
        W: FnOnce(hilink_api::Error) -> CoreError,
    {
        let connector = Arc::clone(&self.inner.connector);
        let target = self.inner.target.clone();
        let timeout = self.inner.config.timeout;
        let session_lock = Arc::clone(&self.inner.session_lock);

        let task = async move {
            let guard = session_lock.lock_owned().await;
            tokio::task::spawn_blocking(move || {
                // Declared first so it drops after the session closes.
                let _guard = guard;
                let mut session = ScopedSession::open(connector.as_ref(), &target)?;
                op(&mut session)
            })
            .await
        };

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result.map_err(wrap),
            Ok(Err(join_err)) => Err(CoreError::Internal(format!(
                "router task failed: {join_err}"
            ))),
            Err(_) => Err(wrap(hilink_api::Error::Timeout {
                timeout_secs: timeout.as_secs(),
            })),
        }
    }
}

/// Read every dataset from one session. Any failed read fails the whole poll.
fn fetch_snapshot(session: &mut ScopedSession) -> Result<Snapshot, hilink_api::Error> {
    Ok(Snapshot {
        device_information: session.device_information()?,
        dhcp_settings: session.dhcp_settings()?,
        device_signal: session.device_signal()?,
        monitoring_status: session.monitoring_status()?,
        traffic_statistics: session.traffic_statistics()?,
        lan_host_info: session.lan_host_info()?,
        fetched_at: Some(Utc::now()),
    })
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh until cancelled or every handle is dropped.
async fn poll_task(inner: Weak<CoordinatorInner>, interval: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(inner) = inner.upgrade() else { break };
                let coordinator = Coordinator { inner };
                if let Err(e) = coordinator.refresh().await {
                    warn!(url = %coordinator.url(), error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
