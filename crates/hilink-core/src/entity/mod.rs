// ── Entity projections ──
//
// Read-only views over a coordinator's snapshot (sensors) and action
// handles that write through the coordinator (text fields, button). The
// host instantiates and schedules these; they hold no state of their own
// beyond a coordinator handle.

mod button;
mod sensor;
mod text;

use hilink_api::Record;
use serde::Serialize;
use strum::Display;

use crate::coordinator::Coordinator;

pub use button::RebootButton;
pub use sensor::{SENSORS, Sensor, SensorDescription};
pub use text::{DnsField, DnsText};

/// Integration domain used in device identifiers.
pub const DOMAIN: &str = "huawei_service_sync";

const DEVICE_NAME: &str = "Huawei Router";
const MANUFACTURER: &str = "Huawei";
const MODEL: &str = "LTE";

/// Host platform a projection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Sensor,
    Text,
    Button,
}

/// Physical device every projection of one router is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    pub fn for_router(url: &str) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_owned(), url.to_owned())],
            name: DEVICE_NAME.into(),
            manufacturer: MANUFACTURER.into(),
            model: MODEL.into(),
            sw_version: None,
        }
    }
}

/// Stable identity of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityIdentity {
    /// `"{url}_{suffix}"`, unique per router.
    pub unique_id: String,
    pub name: String,
    pub icon: String,
    pub device: DeviceInfo,
}

impl EntityIdentity {
    pub(crate) fn new(url: &str, suffix: &str, name: &str, icon: &str) -> Self {
        Self {
            unique_id: format!("{url}_{suffix}"),
            name: name.to_owned(),
            icon: icon.to_owned(),
            device: DeviceInfo::for_router(url),
        }
    }
}

/// Shared interface of every entity the host registers.
pub trait Projection: Send + Sync {
    fn identity(&self) -> &EntityIdentity;

    fn platform(&self) -> Platform;

    /// Current state rendered for the host. `None` when there is nothing to
    /// show (an unset text field, a button never pressed).
    fn value(&self) -> Option<String>;

    /// Extra state attributes.
    fn attributes(&self) -> Record {
        Record::new()
    }

    /// Device registry entry; may carry live data such as firmware version.
    fn device_info(&self) -> DeviceInfo {
        self.identity().device.clone()
    }
}

/// Every projection for one router, grouped by platform.
pub struct Entities {
    pub sensors: Vec<Sensor>,
    pub texts: Vec<DnsText>,
    pub buttons: Vec<RebootButton>,
}

impl std::fmt::Debug for Entities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entities").finish_non_exhaustive()
    }
}

impl Entities {
    pub fn for_coordinator(coordinator: &Coordinator) -> Self {
        Self {
            sensors: SENSORS
                .iter()
                .map(|desc| Sensor::new(coordinator.clone(), desc))
                .collect(),
            texts: vec![
                DnsText::new(coordinator.clone(), DnsField::Primary),
                DnsText::new(coordinator.clone(), DnsField::Secondary),
            ],
            buttons: vec![RebootButton::new(coordinator.clone())],
        }
    }

    pub fn all(&self) -> Vec<&dyn Projection> {
        let sensors = self.sensors.iter().map(|s| s as &dyn Projection);
        let texts = self.texts.iter().map(|t| t as &dyn Projection);
        let buttons = self.buttons.iter().map(|b| b as &dyn Projection);
        sensors.chain(texts).chain(buttons).collect()
    }

    pub fn find(&self, unique_id: &str) -> Option<&dyn Projection> {
        self.all()
            .into_iter()
            .find(|p| p.identity().unique_id == unique_id)
    }

    pub fn len(&self) -> usize {
        self.sensors.len() + self.texts.len() + self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
