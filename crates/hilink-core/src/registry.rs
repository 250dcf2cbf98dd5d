// ── Router registry ──
//
// Explicit map of configured routers, keyed by URL. Owned by whoever
// performs setup and passed to consumers; there is no global instance.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hilink_api::RouterConnector;
use tracing::{debug, info, warn};

use crate::command::RouterInfo;
use crate::config::{RouterConfig, RouterOptions};
use crate::coordinator::Coordinator;
use crate::entity::Entities;
use crate::error::CoreError;
use crate::model::{Dataset, Snapshot};

#[derive(Default)]
pub struct Registry {
    routers: DashMap<String, Coordinator>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a router and build its projections.
    ///
    /// The first refresh must succeed; otherwise nothing is registered and
    /// the fetch error is returned so the host can retry setup later.
    /// Configured DNS options are then pushed to the router, and background
    /// polling starts.
    pub async fn setup_entry(
        &self,
        config: RouterConfig,
        connector: Arc<dyn RouterConnector>,
    ) -> Result<Entities, CoreError> {
        let url = config.url.clone();
        if self.routers.contains_key(&url) {
            return Err(CoreError::AlreadyConfigured { url });
        }

        let options = config.options.clone();
        let coordinator = Coordinator::new(config, connector)?;
        if let Err(e) = coordinator.refresh().await {
            coordinator.shutdown().await;
            return Err(e);
        }

        let inserted = match self.routers.entry(url.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(coordinator.clone());
                true
            }
        };
        if !inserted {
            // Lost a race with a concurrent setup of the same URL.
            coordinator.shutdown().await;
            return Err(CoreError::AlreadyConfigured { url });
        }

        if !options.is_empty() {
            if let Err(e) = apply_options(&coordinator, &options).await {
                warn!(url = %url, error = %e, "applying DNS options failed");
            }
        }

        coordinator.start().await;
        info!(url = %url, "router set up");
        Ok(Entities::for_coordinator(&coordinator))
    }

    /// Push changed DNS options to a registered router. Options the router
    /// already reports are not written again.
    pub async fn update_options(&self, url: &str, options: &RouterOptions) -> Result<(), CoreError> {
        let coordinator = self.require(url)?;
        if options.is_empty() {
            return Ok(());
        }
        apply_options(&coordinator, options).await
    }

    /// Stop polling for a router and forget it.
    pub async fn unload_entry(&self, url: &str) -> Result<(), CoreError> {
        let (_, coordinator) = self.routers.remove(url).ok_or_else(|| CoreError::NotFound {
            url: url.to_owned(),
        })?;
        coordinator.shutdown().await;
        info!(url = %url, "router unloaded");
        Ok(())
    }

    /// Unload every router.
    pub async fn shutdown(&self) {
        for url in self.urls() {
            // Already-removed entries are fine here.
            let _ = self.unload_entry(&url).await;
        }
    }

    /// Device name and firmware of a registered router.
    pub async fn get_info(&self, url: &str) -> Result<RouterInfo, CoreError> {
        self.require(url)?.router_info().await
    }

    // ── Lookups ──────────────────────────────────────────────────

    pub fn get(&self, url: &str) -> Option<Coordinator> {
        self.routers.get(url).map(|entry| entry.value().clone())
    }

    pub fn urls(&self) -> Vec<String> {
        self.routers.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    fn require(&self, url: &str) -> Result<Coordinator, CoreError> {
        self.get(url).ok_or_else(|| CoreError::NotFound {
            url: url.to_owned(),
        })
    }
}

async fn apply_options(coordinator: &Coordinator, options: &RouterOptions) -> Result<(), CoreError> {
    if options_in_effect(&coordinator.snapshot(), options) {
        debug!(url = %coordinator.url(), "DNS options already in effect");
        return Ok(());
    }
    coordinator
        .update_dns(
            options.primary().map(str::to_owned),
            options.secondary().map(str::to_owned),
        )
        .await
}

/// Whether every set option already matches the router's DHCP settings.
fn options_in_effect(snapshot: &Snapshot, options: &RouterOptions) -> bool {
    let matches = |wanted: Option<&str>, key: &str| {
        wanted.is_none_or(|value| {
            snapshot.text(Dataset::DhcpSettings, key).as_deref() == Some(value)
        })
    };
    !snapshot.is_empty()
        && matches(options.primary(), "PrimaryDns")
        && matches(options.secondary(), "SecondaryDns")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(primary: &str, secondary: &str) -> Snapshot {
        let mut snap = Snapshot::empty();
        snap.dhcp_settings.insert("PrimaryDns".into(), json!(primary));
        snap.dhcp_settings.insert("SecondaryDns".into(), json!(secondary));
        snap.fetched_at = Some(chrono::Utc::now());
        snap
    }

    fn options(primary: Option<&str>, secondary: Option<&str>) -> RouterOptions {
        RouterOptions {
            primary_dns: primary.map(str::to_owned),
            secondary_dns: secondary.map(str::to_owned),
        }
    }

    #[test]
    fn matching_options_are_in_effect() {
        let snap = snapshot("1.1.1.1", "9.9.9.9");
        assert!(options_in_effect(&snap, &options(Some("1.1.1.1"), None)));
        assert!(options_in_effect(&snap, &options(Some("1.1.1.1"), Some("9.9.9.9"))));
    }

    #[test]
    fn any_difference_needs_a_write() {
        let snap = snapshot("1.1.1.1", "9.9.9.9");
        assert!(!options_in_effect(&snap, &options(Some("1.1.1.1"), Some("8.8.8.8"))));
        assert!(!options_in_effect(&Snapshot::empty(), &options(Some("1.1.1.1"), None)));
    }
}
