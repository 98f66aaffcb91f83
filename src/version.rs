//! SNMP version enumeration.

use crate::error::{ConfigErrorKind, Error, Result};

/// SNMP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[derive(Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
    /// SNMPv3 (RFC 3411-3418)
    V3,
}

impl Version {
    /// Create from the caller-facing version number.
    ///
    /// Only 1, 2 and 3 are valid; anything else is a configuration error.
    pub fn from_number(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2c),
            3 => Ok(Version::V3),
            other => Err(Error::InvalidConfig(ConfigErrorKind::InvalidVersion(other))),
        }
    }

    /// Get the caller-facing version number.
    pub const fn as_number(self) -> i64 {
        match self {
            Version::V1 => 1,
            Version::V2c => 2,
            Version::V3 => 3,
        }
    }

    /// Whether this version carries v2c/v3 per-varbind exception values.
    ///
    /// SNMPv1 reports absence through the PDU error-status (noSuchName)
    /// instead; it never distinguishes a missing object from a missing
    /// instance.
    pub const fn has_exception_values(self) -> bool {
        !matches!(self, Version::V1)
    }

    /// Whether GETBULK is defined for this version.
    pub const fn supports_bulk(self) -> bool {
        !matches!(self, Version::V1)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
            Version::V3 => write!(f, "SNMPv3"),
        }
    }
}
