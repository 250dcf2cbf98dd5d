// ── Snapshot store ──
//
// Holds the latest good snapshot for one router plus the outcome of the
// most recent poll. Both live in `watch` channels so readers never block
// and subscribers are pushed every replacement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::Snapshot;
use crate::stream::SnapshotStream;

/// Outcome of the most recent poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    /// Whether the most recent poll succeeded. `false` before the first poll.
    pub last_update_success: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    /// Rendered error of the most recent failed poll, cleared on success.
    pub last_error: Option<String>,
}

pub struct SnapshotStore {
    snapshot: watch::Sender<Arc<Snapshot>>,
    status: watch::Sender<RefreshStatus>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::empty()));
        let (status, _) = watch::channel(RefreshStatus::default());
        Self { snapshot, status }
    }

    /// The latest good snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn status(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RefreshStatus> {
        self.status.subscribe()
    }

    /// Swap in a freshly fetched snapshot and mark the poll successful.
    pub(crate) fn replace(&self, snapshot: Arc<Snapshot>) {
        let fetched_at = snapshot.fetched_at;
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(snapshot);
        self.status.send_modify(|status| {
            status.last_update_success = true;
            status.last_success_at = fetched_at;
            status.last_error = None;
        });
    }

    /// Record a failed poll. The cached snapshot is left alone.
    pub(crate) fn record_failure(&self, error: &str) {
        self.status.send_modify(|status| {
            status.last_update_success = false;
            status.last_error = Some(error.to_owned());
        });
    }

    /// How long ago the last successful poll completed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.status().last_success_at.map(|t| Utc::now() - t)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
