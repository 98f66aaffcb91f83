//! Session configuration builder.

use std::time::Duration;

use crate::engine::Engine;
use crate::error::{ConfigErrorKind, Error, Result};
use crate::session::{Session, SessionConfig};
use crate::version::Version;

/// SNMPv3 security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityLevel {
    /// No authentication, no privacy.
    #[default]
    NoAuthNoPriv,
    /// Authentication, no privacy.
    AuthNoPriv,
    /// Authentication and privacy.
    AuthPriv,
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoAuthNoPriv => "noAuthNoPriv",
            Self::AuthNoPriv => "authNoPriv",
            Self::AuthPriv => "authPriv",
        })
    }
}

/// SNMPv3 authentication protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProtocol {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

/// SNMPv3 privacy protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivProtocol {
    Des,
    Aes128,
    Aes192,
    Aes256,
}

/// SNMPv3 USM credentials.
///
/// Passed through to the engine; the session core performs no key
/// derivation or crypto itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct V3Security {
    pub username: String,
    pub level: SecurityLevel,
    pub auth_protocol: Option<AuthProtocol>,
    pub auth_password: Option<String>,
    pub priv_protocol: Option<PrivProtocol>,
    pub priv_password: Option<String>,
    /// Context name, empty by default.
    pub context: String,
    /// Authoritative engine ID, discovered by the engine when `None`.
    pub engine_id: Option<Vec<u8>>,
}

/// Builder for [`SessionConfig`] / [`Session`].
///
/// ```
/// use snmp_session::session::SessionBuilder;
/// use snmp_session::version::Version;
///
/// let config = SessionBuilder::new("router1:1161")
///     .version(Version::V2c)
///     .community("private")
///     .build()
///     .unwrap();
/// assert_eq!(config.host, "router1");
/// assert_eq!(config.port, 1161);
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    hostname: String,
    port: Option<u16>,
    version: Version,
    community: String,
    security: Option<V3Security>,
    timeout: Duration,
    retries: u32,
    use_numeric: bool,
    use_enums: bool,
    use_sprint_value: bool,
    abort_on_nonexistent: bool,
}

impl SessionBuilder {
    /// Start building a session for the given host.
    ///
    /// The hostname may carry a `host:port` suffix; combining that with an
    /// explicit [`port`](Self::port) is a configuration error at build time.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: None,
            version: Version::V2c,
            community: "public".to_string(),
            security: None,
            timeout: Duration::from_secs(1),
            retries: 3,
            use_numeric: false,
            use_enums: false,
            use_sprint_value: false,
            abort_on_nonexistent: false,
        }
    }

    /// SNMP version (default V2c).
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Community string for v1/v2c (default "public").
    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    /// V3 security parameters. Implies [`Version::V3`] is intended but does
    /// not switch the version by itself.
    pub fn security(mut self, security: V3Security) -> Self {
        self.security = Some(security);
        self
    }

    /// UDP port (default 161).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Per-attempt timeout (default 1s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after the first timeout (default 3).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Render numeric OIDs instead of symbolic names.
    pub fn use_numeric(mut self, on: bool) -> Self {
        self.use_numeric = on;
        self
    }

    /// Decode enumerated INTEGER values to labels.
    pub fn use_enums(mut self, on: bool) -> Self {
        self.use_enums = on;
        self
    }

    /// Pretty-print values (TimeTicks as `d:h:m:s.cs`).
    pub fn use_sprint_value(mut self, on: bool) -> Self {
        self.use_sprint_value = on;
        self
    }

    /// Turn absence exceptions into errors instead of records.
    pub fn abort_on_nonexistent(mut self, on: bool) -> Self {
        self.abort_on_nonexistent = on;
        self
    }

    /// Validate and produce the frozen configuration.
    pub fn build(self) -> Result<SessionConfig> {
        let (host, host_port) = split_host_port(&self.hostname)?;
        let port = match (host_port, self.port) {
            (Some(from_host), Some(explicit)) if from_host != explicit => {
                return Err(Error::InvalidConfig(ConfigErrorKind::ConflictingPort {
                    host_port: from_host,
                    explicit,
                }));
            }
            (Some(from_host), _) => from_host,
            (None, Some(explicit)) => explicit,
            (None, None) => 161,
        };

        if self.version == Version::V3 {
            validate_security(self.security.as_ref())?;
        }

        Ok(SessionConfig {
            host,
            port,
            version: self.version,
            community: self.community,
            security: self.security,
            timeout: self.timeout,
            retries: self.retries,
            use_numeric: self.use_numeric,
            use_enums: self.use_enums,
            use_sprint_value: self.use_sprint_value,
            abort_on_nonexistent: self.abort_on_nonexistent,
        })
    }

    /// Build the configuration and open a session over the given engine.
    pub async fn open<E: Engine>(self, engine: E) -> Result<Session<E>> {
        Session::open(engine, self.build()?).await
    }
}

fn validate_security(security: Option<&V3Security>) -> Result<()> {
    let Some(security) = security else {
        return Err(Error::InvalidConfig(ConfigErrorKind::MissingCredentials {
            field: "security parameters",
        }));
    };
    if security.username.is_empty() {
        return Err(Error::InvalidConfig(ConfigErrorKind::MissingCredentials {
            field: "security username",
        }));
    }
    if security.level != SecurityLevel::NoAuthNoPriv && security.auth_password.is_none() {
        return Err(Error::InvalidConfig(ConfigErrorKind::MissingCredentials {
            field: "authentication password",
        }));
    }
    if security.level == SecurityLevel::AuthPriv && security.priv_password.is_none() {
        return Err(Error::InvalidConfig(ConfigErrorKind::MissingCredentials {
            field: "privacy password",
        }));
    }
    Ok(())
}

/// Split a `host:port` hostname. Bracketed IPv6 literals are understood;
/// a bare address with multiple colons is treated as a plain host.
fn split_host_port(hostname: &str) -> Result<(String, Option<u16>)> {
    if let Some(rest) = hostname.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, "")) => Ok((host.to_string(), None)),
            Some((host, suffix)) => {
                let Some(port_text) = suffix.strip_prefix(':') else {
                    return Err(invalid_host_port(hostname));
                };
                let port = port_text
                    .parse::<u16>()
                    .map_err(|_| invalid_host_port(hostname))?;
                Ok((host.to_string(), Some(port)))
            }
            None => Err(invalid_host_port(hostname)),
        };
    }
    if hostname.matches(':').count() != 1 {
        return Ok((hostname.to_string(), None));
    }
    match hostname.split_once(':') {
        Some((host, port_text)) if !host.is_empty() => {
            let port = port_text
                .parse::<u16>()
                .map_err(|_| invalid_host_port(hostname))?;
            Ok((host.to_string(), Some(port)))
        }
        _ => Err(invalid_host_port(hostname)),
    }
}

fn invalid_host_port(input: &str) -> Error {
    Error::InvalidConfig(ConfigErrorKind::InvalidHostPort {
        input: input.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionBuilder::new("localhost").build().unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 161);
        assert_eq!(config.version, Version::V2c);
        assert_eq!(config.community, "public");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.retries, 3);
        assert!(!config.use_numeric);
    }

    #[test]
    fn test_port_from_hostname() {
        let config = SessionBuilder::new("localhost:1161").build().unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1161);
    }

    #[test]
    fn test_matching_explicit_port_is_allowed() {
        let config = SessionBuilder::new("localhost:1161")
            .port(1161)
            .build()
            .unwrap();
        assert_eq!(config.port, 1161);
    }

    #[test]
    fn test_conflicting_ports_rejected() {
        let err = SessionBuilder::new("localhost:1161")
            .port(162)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigErrorKind::ConflictingPort {
                host_port: 1161,
                explicit: 162
            })
        ));
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(matches!(
            SessionBuilder::new("localhost:xyz").build().unwrap_err(),
            Error::InvalidConfig(ConfigErrorKind::InvalidHostPort { .. })
        ));
        assert!(matches!(
            SessionBuilder::new("localhost:70000").build().unwrap_err(),
            Error::InvalidConfig(ConfigErrorKind::InvalidHostPort { .. })
        ));
    }

    #[test]
    fn test_ipv6_forms() {
        let config = SessionBuilder::new("2001:db8::1").build().unwrap();
        assert_eq!(config.host, "2001:db8::1");
        assert_eq!(config.port, 161);

        let config = SessionBuilder::new("[2001:db8::1]:1161").build().unwrap();
        assert_eq!(config.host, "2001:db8::1");
        assert_eq!(config.port, 1161);

        let config = SessionBuilder::new("[2001:db8::1]").build().unwrap();
        assert_eq!(config.host, "2001:db8::1");
        assert_eq!(config.port, 161);
    }

    #[test]
    fn test_v3_requires_credentials() {
        let err = SessionBuilder::new("localhost")
            .version(Version::V3)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigErrorKind::MissingCredentials { .. })
        ));

        let err = SessionBuilder::new("localhost")
            .version(Version::V3)
            .security(V3Security {
                username: "observer".to_string(),
                level: SecurityLevel::AuthPriv,
                auth_protocol: Some(AuthProtocol::Sha256),
                auth_password: Some("authpass123".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigErrorKind::MissingCredentials {
                field: "privacy password"
            })
        ));
    }

    #[test]
    fn test_v3_complete_credentials() {
        let config = SessionBuilder::new("localhost")
            .version(Version::V3)
            .security(V3Security {
                username: "observer".to_string(),
                level: SecurityLevel::AuthPriv,
                auth_protocol: Some(AuthProtocol::Sha256),
                auth_password: Some("authpass123".to_string()),
                priv_protocol: Some(PrivProtocol::Aes128),
                priv_password: Some("privpass123".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.version, Version::V3);
        let security = config.security.as_ref().unwrap();
        assert_eq!(security.level, SecurityLevel::AuthPriv);
    }
}
