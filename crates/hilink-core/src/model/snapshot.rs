// ── Router data snapshot ──

use chrono::{DateTime, Utc};
use hilink_api::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One of the read-only datasets fetched on every poll.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dataset {
    DeviceInformation,
    DhcpSettings,
    DeviceSignal,
    MonitoringStatus,
    TrafficStatistics,
    LanHostInfo,
}

/// All datasets from one successful poll.
///
/// Built in one piece and shared as `Arc<Snapshot>`; a newer poll replaces
/// it wholesale rather than merging into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub device_information: Record,
    pub dhcp_settings: Record,
    pub device_signal: Record,
    pub monitoring_status: Record,
    pub traffic_statistics: Record,
    pub lan_host_info: Record,
    /// `None` until the first successful poll.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The placeholder held before any poll has succeeded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched_at.is_none()
    }

    pub fn dataset(&self, dataset: Dataset) -> &Record {
        match dataset {
            Dataset::DeviceInformation => &self.device_information,
            Dataset::DhcpSettings => &self.dhcp_settings,
            Dataset::DeviceSignal => &self.device_signal,
            Dataset::MonitoringStatus => &self.monitoring_status,
            Dataset::TrafficStatistics => &self.traffic_statistics,
            Dataset::LanHostInfo => &self.lan_host_info,
        }
    }

    pub fn field(&self, dataset: Dataset, key: &str) -> Option<&Value> {
        self.dataset(dataset).get(key)
    }

    /// A field rendered as display text. JSON null counts as absent.
    pub fn text(&self, dataset: Dataset, key: &str) -> Option<String> {
        self.field(dataset, key).and_then(value_to_text)
    }
}

pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn dataset_names_are_snake_case() {
        let names: Vec<&'static str> = Dataset::iter().map(Into::into).collect();
        assert_eq!(
            names,
            [
                "device_information",
                "dhcp_settings",
                "device_signal",
                "monitoring_status",
                "traffic_statistics",
                "lan_host_info",
            ]
        );
        assert_eq!(
            "lan_host_info".parse::<Dataset>().ok(),
            Some(Dataset::LanHostInfo)
        );
    }

    #[test]
    fn empty_snapshot_has_no_fields() {
        let snap = Snapshot::empty();
        assert!(snap.is_empty());
        for dataset in Dataset::iter() {
            assert!(snap.dataset(dataset).is_empty());
        }
        assert_eq!(snap.text(Dataset::DeviceSignal, "rsrp"), None);
    }

    #[test]
    fn text_renders_scalars() {
        let mut snap = Snapshot::empty();
        snap.traffic_statistics
            .insert("CurrentDownloadRate".into(), json!(1024));
        snap.traffic_statistics
            .insert("CurrentUploadRate".into(), json!("512"));
        snap.traffic_statistics
            .insert("TotalConnectTime".into(), Value::Null);

        assert_eq!(
            snap.text(Dataset::TrafficStatistics, "CurrentDownloadRate"),
            Some("1024".into())
        );
        assert_eq!(
            snap.text(Dataset::TrafficStatistics, "CurrentUploadRate"),
            Some("512".into())
        );
        assert_eq!(snap.text(Dataset::TrafficStatistics, "TotalConnectTime"), None);
    }
}
