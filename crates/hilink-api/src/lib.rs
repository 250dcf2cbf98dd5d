//! Adapter seam for Huawei HiLink (LTE) router management.
//!
//! This crate does not speak the router protocol. It defines the contract a
//! protocol client has to satisfy so `hilink-core` can poll and command a
//! router:
//!
//! - **[`RouterConnector`]** opens one authenticated [`RouterSession`] per
//!   operation from a [`ConnectionTarget`].
//! - **[`ScopedSession`]** wraps a session and closes it on every exit path.
//! - **[`DhcpSettingsUpdate`]** is the full record the router expects when
//!   DNS or DHCP settings change.
//! - **[`Error`]** is the adapter failure taxonomy.

pub mod dhcp;
pub mod error;
pub mod session;
pub mod target;

pub use dhcp::DhcpSettingsUpdate;
pub use error::Error;
pub use session::{Record, RouterConnector, RouterSession, ScopedSession};
pub use target::ConnectionTarget;
