// Router endpoint description handed to a `RouterConnector`.
//
// The configured URL may omit the scheme (`192.168.8.1`), in which case
// plain HTTP is assumed -- HiLink web UIs rarely serve TLS.

use std::fmt;

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

const DEFAULT_SCHEME: &str = "http";

/// Everything an adapter needs to open an authenticated session.
#[derive(Clone)]
pub struct ConnectionTarget {
    pub scheme: String,
    pub host: String,
    pub username: String,
    pub password: SecretString,
}

impl ConnectionTarget {
    /// Split a configured router URL into scheme and host.
    ///
    /// `https://10.0.0.1` keeps its scheme; a bare `10.0.0.1` becomes
    /// `http`. Trailing slashes on the host are dropped.
    pub fn from_url(url: &str, username: &str, password: SecretString) -> Result<Self, Error> {
        let trimmed = url.trim();
        let (scheme, host) = trimmed
            .split_once("://")
            .unwrap_or((DEFAULT_SCHEME, trimmed));
        let host = host.trim_end_matches('/');

        if scheme.is_empty() {
            return Err(Error::InvalidTarget {
                target: url.into(),
                reason: "empty scheme".into(),
            });
        }
        if host.is_empty() {
            return Err(Error::InvalidTarget {
                target: url.into(),
                reason: "empty host".into(),
            });
        }

        let target = Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_owned(),
            username: username.to_owned(),
            password,
        };

        // Reject anything the URL parser can't turn into an endpoint.
        let parsed = target.base_url()?;
        if parsed.host_str().is_none() {
            return Err(Error::InvalidTarget {
                target: url.into(),
                reason: "no host component".into(),
            });
        }

        Ok(target)
    }

    /// Base URL of the management endpoint, without credentials.
    pub fn base_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}://{}/", self.scheme, self.host))?)
    }
}

// Password stays out of logs.
impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
