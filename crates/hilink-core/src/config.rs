// ── Runtime router configuration ──
//
// These types describe *which* router to talk to and how often.
// They carry credential data but never touch disk; `hilink-config`
// (or the host) builds a `RouterConfig` and hands it in.

use std::time::Duration;

use hilink_api::ConnectionTarget;
use secrecy::SecretString;

use crate::error::CoreError;

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one router. Immutable once registered.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router URL as entered, e.g. `http://192.168.8.1`. Identifies the router.
    pub url: String,
    pub username: String,
    pub password: SecretString,
    /// DNS overrides applied at setup.
    pub options: RouterOptions,
    /// Time between background polls.
    pub scan_interval: Duration,
    /// Upper bound on a single poll or write.
    pub timeout: Duration,
}

impl RouterConfig {
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password,
            options: RouterOptions::default(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the adapter connection target.
    pub fn target(&self) -> Result<ConnectionTarget, CoreError> {
        ConnectionTarget::from_url(&self.url, &self.username, self.password.clone()).map_err(|e| {
            CoreError::Config {
                message: e.to_string(),
            }
        })
    }
}

/// Later-adjustable DNS options. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterOptions {
    pub primary_dns: Option<String>,
    pub secondary_dns: Option<String>,
}

impl RouterOptions {
    pub fn primary(&self) -> Option<&str> {
        non_empty(self.primary_dns.as_deref())
    }

    pub fn secondary(&self) -> Option<&str> {
        non_empty(self.secondary_dns.as_deref())
    }

    /// True when neither DNS server is set.
    pub fn is_empty(&self) -> bool {
        self.primary().is_none() && self.secondary().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("pw".to_string())
    }

    #[test]
    fn defaults_match_poll_cadence() {
        let cfg = RouterConfig::new("192.168.8.1", "admin", secret());
        assert_eq!(cfg.scan_interval, Duration::from_secs(60));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.options.is_empty());
    }

    #[test]
    fn target_resolves_scheme() {
        let target = RouterConfig::new("192.168.8.1", "admin", secret())
            .target()
            .unwrap();
        assert_eq!(target.scheme, "http");
        assert_eq!(target.host, "192.168.8.1");
    }

    #[test]
    fn bad_url_is_a_config_error() {
        let err = RouterConfig::new("https://", "admin", secret())
            .target()
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }), "got {err:?}");
    }

    #[test]
    fn blank_options_are_unset() {
        let options = RouterOptions {
            primary_dns: Some("  ".into()),
            secondary_dns: Some("9.9.9.9".into()),
        };
        assert_eq!(options.primary(), None);
        assert_eq!(options.secondary(), Some("9.9.9.9"));
        assert!(!options.is_empty());
    }
}
