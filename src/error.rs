//! Error types for snmp-session.
//!
//! The taxonomy follows the session model rather than the wire format:
//! transport failures (connection, timeout) always fail the call, while
//! the v2c/v3 "absence" exception values are data by default and only
//! become errors under `abort_on_nonexistent`.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without
//! breaking changes.

use std::time::Duration;

use crate::oid::Oid;
use crate::value::SnmpType;
use crate::version::Version;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Version number outside {1, 2, 3}.
    InvalidVersion(i64),
    /// Hostname carried a `host:port` suffix and an explicit port was also given.
    ConflictingPort { host_port: u16, explicit: u16 },
    /// The port component of a `host:port` hostname did not parse.
    InvalidHostPort { input: Box<str> },
    /// V3 security level requires credentials that were not supplied.
    MissingCredentials { field: &'static str },
}

impl std::fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVersion(v) => write!(f, "unsupported SNMP version: {}", v),
            Self::ConflictingPort { host_port, explicit } => write!(
                f,
                "hostname specifies port {} but port {} was also given",
                host_port, explicit
            ),
            Self::InvalidHostPort { input } => {
                write!(f, "invalid port in hostname: {:?}", input)
            }
            Self::MissingCredentials { field } => {
                write!(f, "security level requires {}", field)
            }
        }
    }
}

/// OID parse error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value (not an unsigned decimal number).
    InvalidArc,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// SNMP error status codes (RFC 3416).
///
/// Carried in the response PDU; `NoSuchName` is the SNMPv1 composite
/// absence condition covering both bad object and bad instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport or connection failure reported by the engine.
    #[error("connection error: {message}")]
    Connection {
        message: Box<str>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Request timed out (after retries if configured).
    ///
    /// A specialization of the connection failure; see
    /// [`is_connection()`](Error::is_connection).
    #[error("timeout after {elapsed:?} (retries={retries})")]
    Timeout { elapsed: Duration, retries: u32 },

    /// An object name could not be resolved against the MIB.
    ///
    /// This is a resolution-time failure, distinct from the protocol-level
    /// "no such object/instance" responses.
    #[error("unknown object identifier: {name}")]
    UnknownObjectId { name: Box<str> },

    /// SNMPv1 noSuchName: the agent rejected an object or instance.
    ///
    /// v1 does not distinguish a missing object from a missing instance.
    #[error("no such name{}: index {index}", oid.as_ref().map(|o| format!(" ({})", o)).unwrap_or_default())]
    NoSuchName { oid: Option<Oid>, index: u32 },

    /// SNMPv2c/v3 noSuchObject, promoted from a response varbind under
    /// `abort_on_nonexistent`.
    #[error("no such object: {oid}")]
    NoSuchObject { oid: Oid },

    /// SNMPv2c/v3 noSuchInstance, promoted from a response varbind under
    /// `abort_on_nonexistent`.
    #[error("no such instance: {oid}")]
    NoSuchInstance { oid: Oid },

    /// endOfMibView, promoted from a response varbind under
    /// `abort_on_nonexistent`.
    #[error("end of MIB view at {oid}")]
    EndOfMibView { oid: Oid },

    /// SET without an explicit type and no type could be inferred.
    #[error("could not determine type for SET{}", oid.as_ref().map(|o| format!(" of {}", o)).unwrap_or_default())]
    UndeterminedType { oid: Option<Oid> },

    /// SET value could not be encoded as the requested type.
    #[error("cannot encode {value:?} as {snmp_type}")]
    InvalidValue {
        snmp_type: SnmpType,
        value: Box<str>,
    },

    /// A type supplied to SET was neither a known tag nor a short code.
    #[error("unknown SNMP type tag: {input:?}")]
    UnknownTypeTag { input: Box<str> },

    /// Operation not defined for the session's SNMP version.
    #[error("{operation} is not supported on {version}")]
    UnsupportedByVersion {
        operation: &'static str,
        version: Version,
    },

    /// Invalid session configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(ConfigErrorKind),

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// SNMP protocol error returned by the agent (catch-all).
    #[error("SNMP error: {status} at index {index}")]
    Agent {
        status: ErrorStatus,
        index: u32,
        oid: Option<Oid>,
    },

    /// Non-increasing OID detected during a walk (agent misbehavior).
    ///
    /// Returned when a walk receives an OID that is not lexicographically
    /// greater than the previous OID, which would otherwise loop forever.
    #[error("walk detected non-increasing OID: {previous} >= {current}")]
    NonIncreasingOid { previous: Oid, current: Oid },
}

impl Error {
    /// Create a connection error from a message.
    pub fn connection(message: impl Into<Box<str>>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error wrapping an I/O error.
    pub fn connection_io(message: impl Into<Box<str>>, source: std::io::Error) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Whether this error is a transport-level failure.
    ///
    /// True for both [`Connection`](Error::Connection) and its
    /// [`Timeout`](Error::Timeout) specialization.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Whether this error reports a nonexistent object or instance.
    pub fn is_nonexistent(&self) -> bool {
        matches!(
            self,
            Self::NoSuchName { .. } | Self::NoSuchObject { .. } | Self::NoSuchInstance { .. }
        )
    }
}
