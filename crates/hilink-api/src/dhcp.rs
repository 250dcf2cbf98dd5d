// Write record for the router's DHCP settings endpoint.

use serde::{Deserialize, Serialize};

/// Full DHCP/DNS settings record accepted by `set_dhcp_settings`.
///
/// The router rejects partial updates, so every field is present even when
/// only one DNS server changes. DHCP range bounds are the last octet of the
/// pool's start/end address on the router's /24.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpSettingsUpdate {
    pub dhcp_ip_address: String,
    pub dhcp_lan_netmask: String,
    pub dhcp_status: bool,
    pub dhcp_start_ip_range: u8,
    pub dhcp_end_ip_range: u8,
    /// Lease time in seconds.
    pub dhcp_lease_time: u32,
    pub dns_status: bool,
    pub primary_dns: Option<String>,
    pub secondary_dns: Option<String>,
    pub show_dns_setting: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_adapter_field_names() {
        let update = DhcpSettingsUpdate {
            dhcp_ip_address: "192.168.8.1".into(),
            dhcp_lan_netmask: "255.255.255.0".into(),
            dhcp_status: true,
            dhcp_start_ip_range: 100,
            dhcp_end_ip_range: 200,
            dhcp_lease_time: 86_400,
            dns_status: false,
            primary_dns: Some("1.1.1.1".into()),
            secondary_dns: None,
            show_dns_setting: true,
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "dhcp_ip_address": "192.168.8.1",
                "dhcp_lan_netmask": "255.255.255.0",
                "dhcp_status": true,
                "dhcp_start_ip_range": 100,
                "dhcp_end_ip_range": 200,
                "dhcp_lease_time": 86400,
                "dns_status": false,
                "primary_dns": "1.1.1.1",
                "secondary_dns": null,
                "show_dns_setting": true
            })
        );
    }
}
