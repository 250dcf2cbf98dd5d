//! Polling and command layer between a HiLink router adapter and a host
//! automation framework.
//!
//! - **[`Coordinator`]** — owns one router's poll cycle. Every
//!   [`refresh()`](Coordinator::refresh) opens a session on the blocking
//!   pool, reads all six datasets, and swaps in a new [`Snapshot`]
//!   atomically; a failed poll keeps the previous snapshot.
//!   [`execute()`](Coordinator::execute) runs a [`Command`] and refreshes
//!   afterwards for writes.
//!
//! - **[`classify`]** — maps RSSI/RSRP/RSRQ/SINR readings to a
//!   [`QualityBucket`].
//!
//! - **[`dns_update`]** — builds the full DHCP record for a DNS-only change.
//!
//! - **Projections** ([`entity`]) — sensors, DNS text fields and a reboot
//!   button, all reading from or writing through a coordinator.
//!
//! - **[`Registry`]** — explicit map of configured routers with
//!   setup/unload lifecycle.

pub mod command;
pub mod config;
pub mod coordinator;
pub mod dns;
pub mod entity;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, RouterInfo};
pub use config::{DEFAULT_SCAN_INTERVAL, DEFAULT_TIMEOUT, RouterConfig, RouterOptions};
pub use coordinator::Coordinator;
pub use dns::dns_update;
pub use entity::{
    DeviceInfo, DnsField, DnsText, Entities, EntityIdentity, Platform, Projection, RebootButton,
    Sensor,
};
pub use error::CoreError;
pub use model::{Dataset, QualityBucket, SignalKind, Snapshot, classify};
pub use registry::Registry;
pub use store::{RefreshStatus, SnapshotStore};
pub use stream::SnapshotStream;
