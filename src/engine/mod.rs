//! Engine adapter contract.
//!
//! The session core never touches sockets or BER: it hands fully canonical
//! numeric OIDs to an [`Engine`] and gets decoded varbinds back. The engine
//! owns the wire encoding, the transport, the SNMPv3 security machinery and
//! the MIB tables; the session owns request construction, error semantics
//! and result shaping.
//!
//! [`MockEngine`] is an in-memory implementation used by the test suite and
//! useful for testing application code without a live agent.

mod mock;

pub use mock::MockEngine;

use std::future::Future;

use crate::error::{ErrorStatus, Result};
use crate::oid::Oid;
use crate::session::SessionConfig;
use crate::varbind::VarBind;

/// One PDU request, already normalized to numeric OIDs.
#[derive(Debug, Clone, PartialEq)]
pub enum PduRequest {
    /// GET: exact lookup of each OID.
    Get { oids: Vec<Oid> },
    /// GETNEXT: lexicographic successor of each OID.
    GetNext { oids: Vec<Oid> },
    /// GETBULK (v2c/v3): non-repeaters singles, then up to max_repetitions
    /// successors for each remaining OID.
    GetBulk {
        oids: Vec<Oid>,
        non_repeaters: i32,
        max_repetitions: i32,
    },
    /// SET: write each varbind.
    Set { varbinds: Vec<VarBind> },
}

impl PduRequest {
    /// The PDU kind name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PduRequest::Get { .. } => "GET",
            PduRequest::GetNext { .. } => "GETNEXT",
            PduRequest::GetBulk { .. } => "GETBULK",
            PduRequest::Set { .. } => "SET",
        }
    }

    /// Number of varbinds carried in the request.
    pub fn varbind_count(&self) -> usize {
        match self {
            PduRequest::Get { oids } | PduRequest::GetNext { oids } => oids.len(),
            PduRequest::GetBulk { oids, .. } => oids.len(),
            PduRequest::Set { varbinds } => varbinds.len(),
        }
    }
}

/// The decoded outcome of one PDU exchange.
///
/// SNMPv1 absence semantics arrive here as `error_status = NoSuchName`;
/// v2c/v3 semantics arrive as exception [`crate::value::Value`]s inside
/// `varbinds`. The session's classifier turns either into the typed error
/// taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct PduResult {
    /// PDU error-status field.
    pub error_status: ErrorStatus,
    /// PDU error-index field (1-based; 0 means the PDU as a whole).
    pub error_index: u32,
    /// Response varbinds, in agent order.
    pub varbinds: Vec<VarBind>,
}

impl PduResult {
    /// A successful result carrying the given varbinds.
    pub fn ok(varbinds: Vec<VarBind>) -> Self {
        Self {
            error_status: ErrorStatus::NoError,
            error_index: 0,
            varbinds,
        }
    }

    /// An error result with no varbinds.
    pub fn error(status: ErrorStatus, index: u32) -> Self {
        Self {
            error_status: status,
            error_index: index,
            varbinds: Vec::new(),
        }
    }

    /// Whether the PDU reported an error status.
    pub fn is_error(&self) -> bool {
        self.error_status != ErrorStatus::NoError
    }
}

/// A numeric-to-symbolic translation hit.
///
/// `prefix_len` is how many leading arcs the symbol covers, so the session
/// can render the remaining arcs as the instance index. An exact-instance
/// symbol (net-snmp's `sysUpTimeInstance`) covers the whole OID and leaves
/// the index empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Symbolic object name.
    pub name: String,
    /// Number of arcs the name covers.
    pub prefix_len: usize,
}

/// The contract the session core requires from the wrapped protocol engine.
///
/// # Clone requirement
///
/// Walk streams own a clone of the session (and thus the engine). All real
/// implementations are expected to be cheap handles over `Arc` state.
pub trait Engine: Send + Sync + Clone {
    /// Prepare the engine for the given session configuration.
    ///
    /// Fails with a connection error if the target cannot be prepared;
    /// engines may instead defer the failure to the first dispatch.
    fn open(&self, config: &SessionConfig) -> impl Future<Output = Result<()>> + Send;

    /// Perform one network exchange.
    ///
    /// One call is one attempt: the session layers timeout bounding and
    /// retry on top. Transport failures are `Error::Connection` or
    /// `Error::Timeout`; everything the agent actually said comes back as
    /// a [`PduResult`].
    fn dispatch(&self, request: PduRequest) -> impl Future<Output = Result<PduResult>> + Send;

    /// Resolve a symbolic object name to its numeric OID.
    ///
    /// Accepts short names (`sysDescr`) and fully qualified paths
    /// (`iso.org.dod.internet.mgmt.mib-2.system.sysDescr`). Returns `None`
    /// when the MIB does not know the name.
    fn resolve_object(&self, name: &str) -> Option<Oid>;

    /// Translate a numeric OID to its longest known symbolic prefix.
    fn translate(&self, oid: &Oid) -> Option<NameMatch>;

    /// Label for an enumerated INTEGER value, if the MIB defines one.
    ///
    /// `object` is the object prefix (without instance index). Used only
    /// when the session's `use_enums` flag is set.
    fn enum_label(&self, object: &Oid, value: i32) -> Option<String> {
        let _ = (object, value);
        None
    }

    /// Engine-supplied pretty rendering of a response varbind.
    ///
    /// Consulted only when the session's `use_sprint_value` flag is set,
    /// letting engines with a full net-snmp style pretty-printer take
    /// over. `None` falls back to the session's built-in formatting
    /// (TimeTicks as `d:h:m:s.cs`, raw text otherwise).
    fn sprint_value(&self, varbind: &VarBind) -> Option<String> {
        let _ = varbind;
        None
    }

    /// Release the engine handle. Called when the session is dropped.
    fn close(&self) {}
}
