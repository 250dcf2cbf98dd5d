// ── Sensor projections ──
//
// Each sensor is a static description plus pure read functions over the
// snapshot. Missing data renders as "Unknown" rather than an error.

use hilink_api::Record;
use serde_json::Value;

use super::{DeviceInfo, EntityIdentity, Platform, Projection};
use crate::coordinator::Coordinator;
use crate::model::{Dataset, QualityBucket, SignalKind, Snapshot, classify};

const UNKNOWN: &str = "Unknown";

/// Static description of one sensor.
pub struct SensorDescription {
    /// Unique-id suffix.
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub dataset: Dataset,
    pub value: fn(&Snapshot) -> Option<String>,
    pub attributes: fn(&Snapshot) -> Record,
    /// Whether the device entry reports the firmware version.
    pub reports_sw_version: bool,
}

pub static SENSORS: [SensorDescription; 7] = [
    SensorDescription {
        key: "sensor",
        name: "Huawei Router",
        icon: "mdi:router-wireless",
        dataset: Dataset::DeviceInformation,
        value: |s| s.text(Dataset::DeviceInformation, "DeviceName"),
        attributes: |s| s.device_information.clone(),
        reports_sw_version: true,
    },
    SensorDescription {
        key: "dhcp_settings",
        name: "Router DHCP Settings",
        icon: "mdi:ip-network",
        dataset: Dataset::DhcpSettings,
        value: |s| s.text(Dataset::DhcpSettings, "DhcpIPAddress"),
        attributes: |s| s.dhcp_settings.clone(),
        reports_sw_version: false,
    },
    SensorDescription {
        key: "dns_settings",
        name: "Router DNS Settings",
        icon: "mdi:dns",
        dataset: Dataset::DhcpSettings,
        value: dns_pair,
        attributes: |s| s.dhcp_settings.clone(),
        reports_sw_version: false,
    },
    SensorDescription {
        key: "signal",
        name: "Router Signal",
        icon: "mdi:signal",
        dataset: Dataset::DeviceSignal,
        value: |s| s.text(Dataset::DeviceSignal, "rssi"),
        attributes: |s| s.device_signal.clone(),
        reports_sw_version: false,
    },
    SensorDescription {
        key: "monitoring_status",
        name: "Router Monitoring Status",
        icon: "mdi:monitor-dashboard",
        dataset: Dataset::MonitoringStatus,
        value: |s| s.text(Dataset::MonitoringStatus, "ConnectionStatus"),
        attributes: |s| s.monitoring_status.clone(),
        reports_sw_version: false,
    },
    SensorDescription {
        key: "signal_quality",
        name: "Router Signal Quality",
        icon: "mdi:signal-cellular-outline",
        dataset: Dataset::DeviceSignal,
        value: |s| Some(signal_quality(s, SignalKind::Rsrp).to_string()),
        attributes: signal_quality_attributes,
        reports_sw_version: false,
    },
    SensorDescription {
        key: "traffic_statistics",
        name: "Router Traffic Statistics",
        icon: "mdi:chart-line",
        dataset: Dataset::TrafficStatistics,
        value: |s| s.text(Dataset::TrafficStatistics, "CurrentDownloadRate"),
        attributes: |s| s.traffic_statistics.clone(),
        reports_sw_version: false,
    },
];

/// `"{PrimaryDns}, {SecondaryDns}"`, each side falling back to Unknown.
fn dns_pair(snapshot: &Snapshot) -> Option<String> {
    let primary = snapshot.text(Dataset::DhcpSettings, "PrimaryDns");
    let secondary = snapshot.text(Dataset::DhcpSettings, "SecondaryDns");
    Some(format!(
        "{}, {}",
        primary.as_deref().unwrap_or(UNKNOWN),
        secondary.as_deref().unwrap_or(UNKNOWN)
    ))
}

fn signal_quality(snapshot: &Snapshot, kind: SignalKind) -> QualityBucket {
    let name: &'static str = kind.into();
    classify(name, snapshot.field(Dataset::DeviceSignal, name))
}

fn signal_quality_attributes(snapshot: &Snapshot) -> Record {
    [
        SignalKind::Rssi,
        SignalKind::Rsrp,
        SignalKind::Rsrq,
        SignalKind::Sinr,
    ]
    .into_iter()
    .map(|kind| {
        (
            format!("{kind}_quality"),
            Value::String(signal_quality(snapshot, kind).to_string()),
        )
    })
    .collect()
}

/// A read-only sensor over one router's snapshot.
pub struct Sensor {
    identity: EntityIdentity,
    description: &'static SensorDescription,
    coordinator: Coordinator,
}

impl Sensor {
    pub fn new(coordinator: Coordinator, description: &'static SensorDescription) -> Self {
        let identity = EntityIdentity::new(
            coordinator.url(),
            description.key,
            description.name,
            description.icon,
        );
        Self {
            identity,
            description,
            coordinator,
        }
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }
}

impl Projection for Sensor {
    fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn value(&self) -> Option<String> {
        let snapshot = self.coordinator.snapshot();
        Some((self.description.value)(&snapshot).unwrap_or_else(|| UNKNOWN.into()))
    }

    fn attributes(&self) -> Record {
        (self.description.attributes)(&self.coordinator.snapshot())
    }

    fn device_info(&self) -> DeviceInfo {
        let mut device = self.identity.device.clone();
        if self.description.reports_sw_version {
            device.sw_version = self
                .coordinator
                .snapshot()
                .text(Dataset::DeviceInformation, "SoftwareVersion");
        }
        device
    }
}
