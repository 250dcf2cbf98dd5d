// ── Command API ──
//
// Every router action flows through a `Command`. The coordinator runs
// each one in its own session and, for writes, refreshes afterwards.

use serde::Serialize;

/// All actions a coordinator can perform against its router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace one or both DNS servers, keeping the rest of the DHCP setup.
    SetDns {
        primary: Option<String>,
        secondary: Option<String>,
    },
    Reboot,
    /// Read device name and firmware version.
    GetInfo,
}

impl Command {
    /// Short name used in logs and write errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetDns { .. } => "DNS update",
            Self::Reboot => "reboot",
            Self::GetInfo => "device info",
        }
    }

    /// Whether the command changes router state and needs a fresh snapshot.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::SetDns { .. } | Self::Reboot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    Info(RouterInfo),
}

/// Identity summary returned by [`Command::GetInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterInfo {
    pub device_name: Option<String>,
    pub software_version: Option<String>,
}

impl RouterInfo {
    /// Two-line summary, e.g. for a host notification.
    pub fn summary(&self) -> String {
        format!(
            "Device: {}\nSW: {}",
            self.device_name.as_deref().unwrap_or("None"),
            self.software_version.as_deref().unwrap_or("None"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_flagged() {
        assert!(Command::Reboot.is_write());
        assert!(
            Command::SetDns {
                primary: Some("8.8.8.8".into()),
                secondary: None
            }
            .is_write()
        );
        assert!(!Command::GetInfo.is_write());
    }

    #[test]
    fn summary_formats_missing_fields() {
        let info = RouterInfo {
            device_name: Some("B535-232".into()),
            software_version: None,
        };
        assert_eq!(info.summary(), "Device: B535-232\nSW: None");
    }
}
