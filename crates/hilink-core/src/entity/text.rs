// ── Editable DNS fields ──

use strum::Display;

use super::{EntityIdentity, Platform, Projection};
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::Dataset;

/// Which DNS server a text field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DnsField {
    Primary,
    Secondary,
}

impl DnsField {
    /// Key in the `dhcp_settings` dataset.
    fn settings_key(self) -> &'static str {
        match self {
            Self::Primary => "PrimaryDns",
            Self::Secondary => "SecondaryDns",
        }
    }

    fn unique_suffix(self) -> &'static str {
        match self {
            Self::Primary => "primary_dns",
            Self::Secondary => "secondary_dns",
        }
    }

    fn entity_name(self) -> &'static str {
        match self {
            Self::Primary => "DNS Primary",
            Self::Secondary => "DNS Secondary",
        }
    }
}

/// Text field showing one DNS server; setting it writes to the router.
pub struct DnsText {
    identity: EntityIdentity,
    field: DnsField,
    coordinator: Coordinator,
}

impl DnsText {
    pub fn new(coordinator: Coordinator, field: DnsField) -> Self {
        let identity = EntityIdentity::new(
            coordinator.url(),
            field.unique_suffix(),
            field.entity_name(),
            "mdi:server-network",
        );
        Self {
            identity,
            field,
            coordinator,
        }
    }

    pub fn field(&self) -> DnsField {
        self.field
    }

    /// Write this DNS server, leaving the other one as the router has it.
    /// Resolves once the write and the follow-up refresh have run.
    pub async fn set_value(&self, value: impl Into<String>) -> Result<(), CoreError> {
        let value = Some(value.into());
        let (primary, secondary) = match self.field {
            DnsField::Primary => (value, None),
            DnsField::Secondary => (None, value),
        };
        self.coordinator.update_dns(primary, secondary).await
    }
}

impl Projection for DnsText {
    fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    fn platform(&self) -> Platform {
        Platform::Text
    }

    fn value(&self) -> Option<String> {
        self.coordinator
            .snapshot()
            .text(Dataset::DhcpSettings, self.field.settings_key())
    }
}
