//! Manager-side SNMP session engine.
//!
//! This crate handles the session layer of an SNMP manager: OID
//! normalization and symbolic resolution, request orchestration
//! (GET/GETNEXT/GETBULK/SET and subtree walks), version-aware error
//! mapping, and rendering responses into typed [`ResultRecord`]s. It
//! deliberately contains no sockets, no BER codec, no crypto and no MIB
//! parser: those live behind the [`engine::Engine`] adapter trait, which
//! a transport/protocol implementation supplies.
//!
//! # Quick start
//!
//! ```
//! use snmp_session::engine::MockEngine;
//! use snmp_session::session::SessionBuilder;
//! use snmp_session::value::Value;
//! use snmp_session::oid;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> snmp_session::Result<()> {
//! // An in-memory engine; a real deployment plugs in a UDP/BER engine.
//! let engine = MockEngine::new();
//! engine.define_symbol("sysDescr", oid!(1, 3, 6, 1, 2, 1, 1, 1));
//! engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("edge router"));
//!
//! let session = SessionBuilder::new("router1:161")
//!     .community("public")
//!     .open(engine)
//!     .await?;
//!
//! let record = session.get("sysDescr.0").await?;
//! assert_eq!(record.oid, "sysDescr");
//! assert_eq!(record.oid_index, "0");
//! assert_eq!(record.value, "edge router");
//! # Ok(())
//! # }
//! ```
//!
//! # Version semantics
//!
//! The same absence is reported differently across protocol versions:
//! SNMPv1 agents answer a missing object with a `noSuchName` PDU error,
//! while v2c/v3 agents answer per-varbind exception values. The session
//! normalizes both: v1's error always fails the call with
//! [`Error::NoSuchName`]; v2c/v3 exceptions come back as data records
//! unless `abort_on_nonexistent` is set, in which case they become
//! [`Error::NoSuchObject`], [`Error::NoSuchInstance`] or
//! [`Error::EndOfMibView`].
//!
//! # OID input forms
//!
//! Session operations accept heterogeneous OID spellings through
//! [`OidInput`], all resolving to the same canonical numeric OID:
//! dotted numerics with or without a leading dot (`".1.3.6.1.2.1.1.1.0"`),
//! symbolic `name.index` (`"sysDescr.0"`), `(name, index)` pairs, and
//! fully qualified paths (`".iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0"`).

pub mod easy;
pub mod engine;
pub mod error;
pub mod oid;
pub mod record;
pub mod session;
pub mod target;
pub mod value;
pub mod varbind;
pub mod version;

pub use error::{Error, Result};
pub use oid::Oid;
pub use record::ResultRecord;
pub use session::{Session, SessionBuilder, SessionConfig};
pub use target::{OidInput, ResolvedOid};
pub use value::{SnmpType, Value};
pub use varbind::VarBind;
pub use version::Version;
