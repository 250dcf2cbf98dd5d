#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hilink_api::{
    ConnectionTarget, DhcpSettingsUpdate, Error, Record, RouterConnector, RouterSession,
};
use hilink_core::RouterConfig;
use secrecy::SecretString;
use serde_json::{Value, json};

pub const URL: &str = "http://192.168.8.1";

/// In-memory router. Writes land in `dhcp_settings` so the follow-up
/// refresh observes them.
#[derive(Clone, Default)]
pub struct FakeRouter {
    state: Arc<FakeState>,
}

#[derive(Default)]
pub struct FakeState {
    data: Mutex<FakeData>,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub refreshes: AtomicUsize,
}

#[derive(Default)]
pub struct FakeData {
    pub device_information: Record,
    pub dhcp_settings: Record,
    pub device_signal: Record,
    pub monitoring_status: Record,
    pub traffic_statistics: Record,
    pub lan_host_info: Record,
    pub fail_connect: bool,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub read_delay: Option<Duration>,
    pub writes: Vec<DhcpSettingsUpdate>,
    pub reboots: usize,
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

impl FakeRouter {
    /// A router with typical responses for every dataset.
    pub fn healthy() -> Self {
        let router = Self::default();
        router.with_data(|d| {
            d.device_information = record(json!({
                "DeviceName": "B535-232",
                "SoftwareVersion": "11.0.2.1",
            }));
            d.dhcp_settings = record(json!({
                "DhcpIPAddress": "192.168.8.1",
                "DhcpLanNetmask": "255.255.255.0",
                "DhcpStatus": "1",
                "DhcpStartIPAddress": "192.168.8.50",
                "DhcpEndIPAddress": "192.168.8.150",
                "DhcpLeaseTime": "86400",
                "DnsStatus": "1",
                "PrimaryDns": "192.168.8.1",
                "SecondaryDns": "192.168.8.1",
            }));
            d.device_signal = record(json!({
                "rssi": "-67dBm",
                "rsrp": "-100dBm",
                "rsrq": "-11.0dB",
                "sinr": "13dB",
            }));
            d.monitoring_status = record(json!({ "ConnectionStatus": "901" }));
            d.traffic_statistics = record(json!({ "CurrentDownloadRate": "2048" }));
            d.lan_host_info = record(json!({ "Hosts": { "Host": [] } }));
        });
        router
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&mut FakeData) -> R) -> R {
        f(&mut self.state.data.lock().unwrap())
    }

    pub fn set_signal(&self, key: &str, value: &str) {
        self.with_data(|d| {
            d.device_signal.insert(key.into(), json!(value));
        });
    }

    pub fn fail_reads(&self, fail: bool) {
        self.with_data(|d| d.fail_reads = fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.with_data(|d| d.fail_writes = fail);
    }

    pub fn writes(&self) -> Vec<DhcpSettingsUpdate> {
        self.with_data(|d| d.writes.clone())
    }

    pub fn reboots(&self) -> usize {
        self.with_data(|d| d.reboots)
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Completed full reads of `device_information`, one per refresh.
    pub fn refreshes(&self) -> usize {
        self.state.refreshes.load(Ordering::SeqCst)
    }

    pub fn connector(&self) -> Arc<dyn RouterConnector> {
        Arc::new(self.clone())
    }
}

impl RouterConnector for FakeRouter {
    fn connect(&self, _target: &ConnectionTarget) -> Result<Box<dyn RouterSession>, Error> {
        if self.with_data(|d| d.fail_connect) {
            return Err(Error::Authentication {
                message: "bad credentials".into(),
            });
        }
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Arc<FakeState>,
}

impl FakeSession {
    fn read(&self, pick: impl FnOnce(&FakeData) -> Record) -> Result<Record, Error> {
        let (delay, fail) = {
            let d = self.state.data.lock().unwrap();
            (d.read_delay, d.fail_reads)
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if fail {
            return Err(Error::Connection {
                message: "router unreachable".into(),
            });
        }
        Ok(pick(&self.state.data.lock().unwrap()))
    }
}

impl RouterSession for FakeSession {
    fn device_information(&mut self) -> Result<Record, Error> {
        self.read(|d| d.device_information.clone())
    }

    fn dhcp_settings(&mut self) -> Result<Record, Error> {
        self.read(|d| d.dhcp_settings.clone())
    }

    fn device_signal(&mut self) -> Result<Record, Error> {
        self.read(|d| d.device_signal.clone())
    }

    fn monitoring_status(&mut self) -> Result<Record, Error> {
        self.read(|d| d.monitoring_status.clone())
    }

    fn traffic_statistics(&mut self) -> Result<Record, Error> {
        self.read(|d| d.traffic_statistics.clone())
    }

    fn lan_host_info(&mut self) -> Result<Record, Error> {
        let hosts = self.read(|d| d.lan_host_info.clone())?;
        self.state.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(hosts)
    }

    fn set_dhcp_settings(&mut self, settings: &DhcpSettingsUpdate) -> Result<(), Error> {
        let mut d = self.state.data.lock().unwrap();
        if d.fail_writes {
            return Err(Error::Router {
                code: 100_003,
                message: "no rights".into(),
            });
        }
        d.writes.push(settings.clone());
        if let Some(primary) = &settings.primary_dns {
            d.dhcp_settings.insert("PrimaryDns".into(), json!(primary));
        }
        if let Some(secondary) = &settings.secondary_dns {
            d.dhcp_settings.insert("SecondaryDns".into(), json!(secondary));
        }
        Ok(())
    }

    fn reboot(&mut self) -> Result<(), Error> {
        let mut d = self.state.data.lock().unwrap();
        if d.fail_writes {
            return Err(Error::Router {
                code: 100_003,
                message: "no rights".into(),
            });
        }
        d.reboots += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Config with background polling disabled.
pub fn config() -> RouterConfig {
    RouterConfig::new(URL, "admin", SecretString::from("secret".to_string()))
        .with_scan_interval(Duration::ZERO)
}
