//! Typed SNMP values and their type tags.
//!
//! [`Value`] is the decoded varbind payload handed over by the engine,
//! including the v2c/v3 exception sentinels. [`SnmpType`] is the fixed tag
//! enumeration surfaced on result records and accepted (in long or short
//! form) on SET calls.

use crate::error::{Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Decoded SNMP value.
///
/// Covers the SMIv2 application types plus the three exception sentinels
/// that SNMPv2c/v3 agents place in individual varbinds.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed 32-bit)
    Integer(i32),
    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),
    /// NULL
    Null,
    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),
    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),
    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),
    /// Gauge32 / Unsigned32
    Gauge32(u32),
    /// TimeTicks (hundredths of a second)
    TimeTicks(u32),
    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),
    /// Counter64 (SNMPv2c/v3 only)
    Counter64(u64),
    /// noSuchObject exception: the object does not exist in the agent's MIB.
    NoSuchObject,
    /// noSuchInstance exception: the object exists but the index does not.
    NoSuchInstance,
    /// endOfMibView exception: traversal left the accessible MIB view.
    EndOfMibView,
}

impl Value {
    /// The type tag for this value.
    pub fn snmp_type(&self) -> SnmpType {
        match self {
            Value::Integer(_) => SnmpType::Integer,
            Value::OctetString(_) => SnmpType::OctetStr,
            Value::Null => SnmpType::Null,
            Value::ObjectIdentifier(_) => SnmpType::ObjectId,
            Value::IpAddress(_) => SnmpType::IpAddr,
            Value::Counter32(_) => SnmpType::Counter,
            Value::Gauge32(_) => SnmpType::Gauge,
            Value::TimeTicks(_) => SnmpType::Ticks,
            Value::Opaque(_) => SnmpType::Opaque,
            Value::Counter64(_) => SnmpType::Counter64,
            Value::NoSuchObject => SnmpType::NoSuchObject,
            Value::NoSuchInstance => SnmpType::NoSuchInstance,
            Value::EndOfMibView => SnmpType::EndOfMibView,
        }
    }

    /// Whether this is one of the v2c/v3 exception sentinels.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s.into_bytes()))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

/// SNMP type tag, as reported on result records.
///
/// The `Display` form matches the net-snmp tag names (`OCTETSTR`,
/// `INTEGER`, `TICKS`, ...). Parsing accepts both the long form and the
/// single-character short codes used by the net-snmp command line tools
/// (`s`, `i`, `u`, `t`, `a`, `o`); both map to the identical variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SnmpType {
    OctetStr,
    Integer,
    ObjectId,
    Ticks,
    Counter,
    Counter64,
    IpAddr,
    Gauge,
    Opaque,
    Null,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl SnmpType {
    /// The net-snmp tag name.
    pub const fn tag(self) -> &'static str {
        match self {
            SnmpType::OctetStr => "OCTETSTR",
            SnmpType::Integer => "INTEGER",
            SnmpType::ObjectId => "OBJECTID",
            SnmpType::Ticks => "TICKS",
            SnmpType::Counter => "COUNTER",
            SnmpType::Counter64 => "COUNTER64",
            SnmpType::IpAddr => "IPADDR",
            SnmpType::Gauge => "GAUGE",
            SnmpType::Opaque => "OPAQUE",
            SnmpType::Null => "NULL",
            SnmpType::NoSuchObject => "NOSUCHOBJECT",
            SnmpType::NoSuchInstance => "NOSUCHINSTANCE",
            SnmpType::EndOfMibView => "ENDOFMIBVIEW",
        }
    }

    /// Whether this tag is one of the exception sentinels.
    pub const fn is_exception(self) -> bool {
        matches!(
            self,
            SnmpType::NoSuchObject | SnmpType::NoSuchInstance | SnmpType::EndOfMibView
        )
    }

    /// Encode a textual value as this type.
    ///
    /// This is the SET-side conversion: the caller supplies text (or an
    /// integer already turned into text) and the chosen type decides the
    /// wire representation.
    pub fn encode(self, text: &str) -> Result<Value> {
        let invalid = || Error::InvalidValue {
            snmp_type: self,
            value: text.into(),
        };

        match self {
            SnmpType::OctetStr | SnmpType::Opaque => Ok(Value::from(text)),
            SnmpType::Integer => text.parse().map(Value::Integer).map_err(|_| invalid()),
            SnmpType::Counter => text.parse().map(Value::Counter32).map_err(|_| invalid()),
            SnmpType::Gauge => text.parse().map(Value::Gauge32).map_err(|_| invalid()),
            SnmpType::Ticks => text.parse().map(Value::TimeTicks).map_err(|_| invalid()),
            SnmpType::Counter64 => text.parse().map(Value::Counter64).map_err(|_| invalid()),
            SnmpType::ObjectId => Oid::parse(text)
                .map(Value::ObjectIdentifier)
                .map_err(|_| invalid()),
            SnmpType::IpAddr => {
                let octets: Vec<u8> = text
                    .split('.')
                    .map(|p| p.parse::<u8>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid())?;
                let octets: [u8; 4] = octets.try_into().map_err(|_| invalid())?;
                Ok(Value::IpAddress(octets))
            }
            SnmpType::Null => Ok(Value::Null),
            SnmpType::NoSuchObject | SnmpType::NoSuchInstance | SnmpType::EndOfMibView => {
                Err(invalid())
            }
        }
    }
}

impl std::fmt::Display for SnmpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for SnmpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Long tag names first, then the net-snmp CLI short codes.
        match s {
            "OCTETSTR" | "s" => Ok(SnmpType::OctetStr),
            "INTEGER" | "i" => Ok(SnmpType::Integer),
            "OBJECTID" | "o" => Ok(SnmpType::ObjectId),
            "TICKS" | "t" => Ok(SnmpType::Ticks),
            "COUNTER" | "c" => Ok(SnmpType::Counter),
            "COUNTER64" => Ok(SnmpType::Counter64),
            "IPADDR" | "a" => Ok(SnmpType::IpAddr),
            "GAUGE" | "u" => Ok(SnmpType::Gauge),
            "OPAQUE" => Ok(SnmpType::Opaque),
            "NULL" => Ok(SnmpType::Null),
            other => Err(Error::UnknownTypeTag {
                input: other.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_snmp_type_of_value() {
        assert_eq!(Value::Integer(4).snmp_type(), SnmpType::Integer);
        assert_eq!(Value::from("x").snmp_type(), SnmpType::OctetStr);
        assert_eq!(Value::TimeTicks(1).snmp_type(), SnmpType::Ticks);
        assert_eq!(Value::NoSuchInstance.snmp_type(), SnmpType::NoSuchInstance);
    }

    #[test]
    fn test_exception_detection() {
        assert!(Value::EndOfMibView.is_exception());
        assert!(!Value::Null.is_exception());
        assert!(SnmpType::NoSuchObject.is_exception());
        assert!(!SnmpType::Gauge.is_exception());
    }

    #[test]
    fn test_long_and_short_forms_agree() {
        for (long, short) in [
            ("OCTETSTR", "s"),
            ("INTEGER", "i"),
            ("GAUGE", "u"),
            ("TICKS", "t"),
            ("IPADDR", "a"),
            ("OBJECTID", "o"),
            ("COUNTER", "c"),
        ] {
            let a: SnmpType = long.parse().unwrap();
            let b: SnmpType = short.parse().unwrap();
            assert_eq!(a, b, "{long} vs {short}");
        }
        assert!("NOTATYPE".parse::<SnmpType>().is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            SnmpType::OctetStr.encode("hello").unwrap(),
            Value::from("hello")
        );
        assert_eq!(SnmpType::Integer.encode("42").unwrap(), Value::Integer(42));
        assert_eq!(
            SnmpType::ObjectId.encode(".1.3.6.1.6.1.1").unwrap(),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 6, 1, 1))
        );
        assert_eq!(
            SnmpType::IpAddr.encode("192.168.1.1").unwrap(),
            Value::IpAddress([192, 168, 1, 1])
        );
        assert!(SnmpType::Integer.encode("not a number").is_err());
        assert!(SnmpType::IpAddr.encode("1.2.3").is_err());
    }
}
