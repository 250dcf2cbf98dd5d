// ── Reboot button ──

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::watch;

use super::{EntityIdentity, Platform, Projection};
use crate::coordinator::Coordinator;
use crate::error::CoreError;

/// Button that reboots the router. Its state is the last successful press.
pub struct RebootButton {
    identity: EntityIdentity,
    coordinator: Coordinator,
    last_pressed: watch::Sender<Option<DateTime<Utc>>>,
}

impl RebootButton {
    pub fn new(coordinator: Coordinator) -> Self {
        let identity = EntityIdentity::new(
            coordinator.url(),
            "reboot_button",
            "Reboot Router",
            "mdi:restart",
        );
        let (last_pressed, _) = watch::channel(None);
        Self {
            identity,
            coordinator,
            last_pressed,
        }
    }

    pub async fn press(&self) -> Result<(), CoreError> {
        self.coordinator.reboot().await?;
        self.last_pressed.send_replace(Some(Utc::now()));
        Ok(())
    }

    pub fn last_pressed(&self) -> Option<DateTime<Utc>> {
        *self.last_pressed.borrow()
    }
}

impl Projection for RebootButton {
    fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    fn platform(&self) -> Platform {
        Platform::Button
    }

    fn value(&self) -> Option<String> {
        self.last_pressed()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
