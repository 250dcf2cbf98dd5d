// ── DNS settings writer ──
//
// The router only accepts complete DHCP records, so a DNS change is a
// read-modify-write: fetch the current settings, overlay the new DNS
// servers, and send everything back.

use hilink_api::{DhcpSettingsUpdate, Error, Record, RouterSession};
use serde_json::Value;

use crate::model::{Dataset, value_to_text};

// Fallbacks for fields a router leaves out of its settings response.
const DEFAULT_NETMASK: &str = "255.255.255.0";
const DEFAULT_RANGE_START: u8 = 100;
const DEFAULT_RANGE_END: u8 = 200;
const DEFAULT_LEASE_SECS: u32 = 86_400;

// Routers report `DhcpStartIPAddress`; some firmware drops the `IP`.
const START_KEYS: &[&str] = &["DhcpStartIPAddress", "DhcpStartAddress"];
const END_KEYS: &[&str] = &["DhcpEndIPAddress", "DhcpEndAddress"];

/// Build the settings record for a DNS change.
///
/// `Some` values replace the router's current DNS servers (an empty string
/// clears one); `None` keeps what the router has. Everything else is carried
/// over from `current`. `dns_status` is always off and `show_dns_setting`
/// always on.
pub fn dns_update(
    current: &Record,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<DhcpSettingsUpdate, Error> {
    let router_ip = current
        .get("DhcpIPAddress")
        .and_then(value_to_text)
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| Error::MissingField {
            dataset: Dataset::DhcpSettings.to_string(),
            field: "DhcpIPAddress".into(),
        })?;

    Ok(DhcpSettingsUpdate {
        dhcp_ip_address: router_ip,
        dhcp_lan_netmask: current
            .get("DhcpLanNetmask")
            .and_then(value_to_text)
            .unwrap_or_else(|| DEFAULT_NETMASK.into()),
        dhcp_status: current.get("DhcpStatus").and_then(flag).unwrap_or(true),
        dhcp_start_ip_range: range_bound(current, START_KEYS).unwrap_or(DEFAULT_RANGE_START),
        dhcp_end_ip_range: range_bound(current, END_KEYS).unwrap_or(DEFAULT_RANGE_END),
        dhcp_lease_time: current
            .get("DhcpLeaseTime")
            .and_then(|v| value_to_text(v)?.trim().parse().ok())
            .unwrap_or(DEFAULT_LEASE_SECS),
        dns_status: false,
        primary_dns: primary
            .map(str::to_owned)
            .or_else(|| current.get("PrimaryDns").and_then(value_to_text)),
        secondary_dns: secondary
            .map(str::to_owned)
            .or_else(|| current.get("SecondaryDns").and_then(value_to_text)),
        show_dns_setting: true,
    })
}

/// Read-modify-write on an open session. Returns the record that was sent.
pub(crate) fn write_dns(
    session: &mut dyn RouterSession,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<DhcpSettingsUpdate, Error> {
    let current = session.dhcp_settings()?;
    let update = dns_update(&current, primary, secondary)?;
    session.set_dhcp_settings(&update)?;
    Ok(update)
}

/// `"1"` / `"0"`, numbers, or JSON booleans.
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => match value_to_text(other)?.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
    }
}

/// First of `keys` present with a parseable last octet.
fn range_bound(current: &Record, keys: &[&str]) -> Option<u8> {
    keys.iter()
        .find_map(|key| current.get(*key).and_then(last_octet))
}

/// `"192.168.8.100"` -> 100; a bare `"100"` is accepted too.
fn last_octet(value: &Value) -> Option<u8> {
    let text = value_to_text(value)?;
    text.trim().rsplit('.').next()?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn current() -> Record {
        let Value::Object(map) = json!({
            "DhcpIPAddress": "192.168.8.1",
            "DhcpLanNetmask": "255.255.0.0",
            "DhcpStatus": "1",
            "DhcpStartIPAddress": "192.168.8.50",
            "DhcpEndIPAddress": "192.168.8.150",
            "DhcpLeaseTime": "43200",
            "DnsStatus": "1",
            "PrimaryDns": "192.168.8.1",
            "SecondaryDns": "8.8.4.4",
            "ShowDnsSetting": "0"
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn primary_only_keeps_secondary_and_dhcp_fields() {
        let update = dns_update(&current(), Some("8.8.8.8"), None).unwrap();
        assert_eq!(
            update,
            DhcpSettingsUpdate {
                dhcp_ip_address: "192.168.8.1".into(),
                dhcp_lan_netmask: "255.255.0.0".into(),
                dhcp_status: true,
                dhcp_start_ip_range: 50,
                dhcp_end_ip_range: 150,
                dhcp_lease_time: 43_200,
                dns_status: false,
                primary_dns: Some("8.8.8.8".into()),
                secondary_dns: Some("8.8.4.4".into()),
                show_dns_setting: true,
            }
        );
    }

    #[test]
    fn secondary_only_keeps_primary() {
        let update = dns_update(&current(), None, Some("1.0.0.1")).unwrap();
        assert_eq!(update.primary_dns.as_deref(), Some("192.168.8.1"));
        assert_eq!(update.secondary_dns.as_deref(), Some("1.0.0.1"));
    }

    #[test]
    fn empty_string_clears_a_server() {
        let update = dns_update(&current(), None, Some("")).unwrap();
        assert_eq!(update.secondary_dns.as_deref(), Some(""));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut sparse = Record::new();
        sparse.insert("DhcpIPAddress".into(), json!("10.0.0.1"));

        let update = dns_update(&sparse, Some("9.9.9.9"), None).unwrap();
        assert_eq!(update.dhcp_lan_netmask, "255.255.255.0");
        assert!(update.dhcp_status);
        assert_eq!(update.dhcp_start_ip_range, 100);
        assert_eq!(update.dhcp_end_ip_range, 200);
        assert_eq!(update.dhcp_lease_time, 86_400);
        assert_eq!(update.secondary_dns, None);
    }

    #[test]
    fn short_range_key_names_are_accepted() {
        let mut settings = current();
        settings.remove("DhcpStartIPAddress");
        settings.remove("DhcpEndIPAddress");
        settings.insert("DhcpStartAddress".into(), json!("192.168.8.20"));
        settings.insert("DhcpEndAddress".into(), json!("192.168.8.60"));

        let update = dns_update(&settings, Some("8.8.8.8"), None).unwrap();
        assert_eq!(update.dhcp_start_ip_range, 20);
        assert_eq!(update.dhcp_end_ip_range, 60);
    }

    #[test]
    fn disabled_dhcp_stays_disabled() {
        let mut settings = current();
        settings.insert("DhcpStatus".into(), json!("0"));
        let update = dns_update(&settings, Some("8.8.8.8"), None).unwrap();
        assert!(!update.dhcp_status);
    }

    #[test]
    fn missing_router_ip_is_an_error() {
        let mut settings = current();
        settings.remove("DhcpIPAddress");
        let err = dns_update(&settings, Some("8.8.8.8"), None).unwrap_err();
        assert!(
            matches!(err, Error::MissingField { ref field, .. } if field == "DhcpIPAddress"),
            "got {err:?}"
        );
    }
}
