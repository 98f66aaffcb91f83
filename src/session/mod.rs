//! SNMP session orchestration.
//!
//! A [`Session`] pairs a frozen [`SessionConfig`] with an opened
//! [`Engine`] handle and exposes the manager-side operations: GET,
//! GETNEXT, GETBULK, SET and walks. The session owns request
//! construction (OID normalization to canonical numeric form), the
//! timeout/retry loop, and the version-aware classification of agent
//! responses into typed errors or [`ResultRecord`]s.
//!
//! Sessions are cheap `Arc` handles: clone freely, share across tasks.
//! The engine handle is released when the last clone drops.

pub mod builder;
mod walk;

pub use builder::{AuthProtocol, PrivProtocol, SecurityLevel, SessionBuilder, V3Security};
pub use walk::{BulkWalk, Walk};

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_core::Stream;
use tokio::time::Instant;
use tracing::instrument;

use crate::engine::{Engine, PduRequest, PduResult};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::record::{OutputFlags, ResultRecord};
use crate::target::{OidInput, ResolvedOid};
use crate::value::{SnmpType, Value};
use crate::varbind::VarBind;
use crate::version::Version;

/// Frozen per-session configuration.
///
/// Built by [`SessionBuilder`]; every field except the four output flags
/// is immutable once the engine handle is opened. The flags live on as
/// atomics on the session and these fields only seed their initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Agent hostname or address, with any `host:port` suffix already split.
    pub host: String,
    /// Agent UDP port.
    pub port: u16,
    /// Protocol version.
    pub version: Version,
    /// Community string (v1/v2c).
    pub community: String,
    /// USM credentials (v3).
    pub security: Option<V3Security>,
    /// Per-attempt response timeout.
    pub timeout: Duration,
    /// Extra attempts after the first timeout.
    pub retries: u32,
    pub use_numeric: bool,
    pub use_enums: bool,
    pub use_sprint_value: bool,
    pub abort_on_nonexistent: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 161,
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
}

/// A value supplied to SET.
///
/// The distinction matters for type inference: an integer input with no
/// explicit type encodes as INTEGER, while text with no explicit type
/// makes the session ask the agent for the object's current type first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    Int(i32),
    Text(String),
}

impl SetValue {
    fn as_text(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Text(t) => t.clone(),
        }
    }
}

impl From<i32> for SetValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SetValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SetValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One varbind for [`Session::set_multiple`].
///
/// Converts from `(oid, value)` and `(oid, value, type)` tuples.
#[derive(Debug, Clone)]
pub struct SetItem {
    pub oid: OidInput,
    pub value: SetValue,
    pub snmp_type: Option<SnmpType>,
}

impl<O: Into<OidInput>, V: Into<SetValue>> From<(O, V)> for SetItem {
    fn from((oid, value): (O, V)) -> Self {
        Self {
            oid: oid.into(),
            value: value.into(),
            snmp_type: None,
        }
    }
}

impl<O: Into<OidInput>, V: Into<SetValue>> From<(O, V, SnmpType)> for SetItem {
    fn from((oid, value, snmp_type): (O, V, SnmpType)) -> Self {
        Self {
            oid: oid.into(),
            value: value.into(),
            snmp_type: Some(snmp_type),
        }
    }
}

struct Shared<E: Engine> {
    engine: E,
    config: SessionConfig,
    use_numeric: AtomicBool,
    use_enums: AtomicBool,
    use_sprint_value: AtomicBool,
    abort_on_nonexistent: AtomicBool,
}

impl<E: Engine> Drop for Shared<E> {
    fn drop(&mut self) {
        self.engine.close();
    }
}

/// An open SNMP session over an engine.
pub struct Session<E: Engine> {
    shared: Arc<Shared<E>>,
}

impl<E: Engine> Clone for Session<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E: Engine> std::fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.shared.config.host)
            .field("port", &self.shared.config.port)
            .field("version", &self.shared.config.version)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Session<E> {
    /// Open a session: validate nothing further, hand the configuration to
    /// the engine and keep the handle.
    pub async fn open(engine: E, config: SessionConfig) -> Result<Self> {
        engine.open(&config).await?;
        tracing::debug!(
            target: "snmp_session::session",
            { snmp.target = %config.host, snmp.port = config.port, snmp.version = %config.version },
            "session opened"
        );
        let shared = Shared {
            use_numeric: AtomicBool::new(config.use_numeric),
            use_enums: AtomicBool::new(config.use_enums),
            use_sprint_value: AtomicBool::new(config.use_sprint_value),
            abort_on_nonexistent: AtomicBool::new(config.abort_on_nonexistent),
            engine,
            config,
        };
        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// The frozen configuration this session was opened with.
    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// The wrapped engine handle.
    pub fn engine(&self) -> &E {
        &self.shared.engine
    }

    pub fn use_numeric(&self) -> bool {
        self.shared.use_numeric.load(Ordering::Relaxed)
    }

    pub fn set_use_numeric(&self, on: bool) {
        self.shared.use_numeric.store(on, Ordering::Relaxed);
    }

    pub fn use_enums(&self) -> bool {
        self.shared.use_enums.load(Ordering::Relaxed)
    }

    pub fn set_use_enums(&self, on: bool) {
        self.shared.use_enums.store(on, Ordering::Relaxed);
    }

    pub fn use_sprint_value(&self) -> bool {
        self.shared.use_sprint_value.load(Ordering::Relaxed)
    }

    pub fn set_use_sprint_value(&self, on: bool) {
        self.shared.use_sprint_value.store(on, Ordering::Relaxed);
    }

    pub fn abort_on_nonexistent(&self) -> bool {
        self.shared.abort_on_nonexistent.load(Ordering::Relaxed)
    }

    pub fn set_abort_on_nonexistent(&self, on: bool) {
        self.shared.abort_on_nonexistent.store(on, Ordering::Relaxed);
    }

    /// Snapshot the live output flags for one call.
    pub(crate) fn output_flags(&self) -> OutputFlags {
        OutputFlags {
            use_numeric: self.use_numeric(),
            use_enums: self.use_enums(),
            use_sprint_value: self.use_sprint_value(),
        }
    }

    fn resolve_one(&self, input: &OidInput) -> Result<ResolvedOid> {
        input.resolve(|name| self.shared.engine.resolve_object(name))
    }

    fn resolve_many(&self, inputs: &[OidInput]) -> Result<Vec<ResolvedOid>> {
        inputs.iter().map(|input| self.resolve_one(input)).collect()
    }

    /// One bounded exchange with retry on timeout.
    ///
    /// The same PDU is re-dispatched after each timed-out attempt, up to
    /// `retries` extra attempts. Protocol and connection errors never
    /// retry. Each attempt is additionally bounded by
    /// `tokio::time::timeout` so a stuck engine cannot block past the
    /// configured limit.
    pub(crate) async fn dispatch_with_retry(&self, request: PduRequest) -> Result<PduResult> {
        let timeout = self.shared.config.timeout;
        let retries = self.shared.config.retries;
        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            tracing::trace!(
                target: "snmp_session::session",
                { snmp.pdu = request.kind(), snmp.oid_count = request.varbind_count(), snmp.attempt = attempt },
                "dispatching"
            );
            let outcome =
                tokio::time::timeout(timeout, self.shared.engine.dispatch(request.clone())).await;
            match outcome {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(Error::Timeout { .. })) | Err(_) => {}
                Ok(Err(err)) => return Err(err),
            }
            if attempt > retries {
                return Err(Error::Timeout {
                    elapsed: started.elapsed(),
                    retries,
                });
            }
            tracing::debug!(
                target: "snmp_session::session",
                { snmp.target = %self.shared.config.host, snmp.pdu = request.kind(), snmp.attempt = attempt },
                "attempt timed out, retrying"
            );
        }
    }

    /// Map a PDU error-status into the typed taxonomy, pointing at the
    /// request varbind the agent's 1-based error-index names.
    fn status_error(&self, result: &PduResult, requested: &[Oid]) -> Error {
        let index = result.error_index;
        let oid = index
            .checked_sub(1)
            .and_then(|i| requested.get(i as usize))
            .cloned();
        match result.error_status {
            ErrorStatus::NoSuchName => Error::NoSuchName { oid, index },
            status => Error::Agent { status, index, oid },
        }
    }

    /// Turn a successful exchange into records, screening exceptions.
    fn shape(
        &self,
        result: PduResult,
        requested: &[Oid],
        flags: OutputFlags,
        abort: bool,
    ) -> Result<Vec<ResultRecord>> {
        if result.is_error() {
            return Err(self.status_error(&result, requested));
        }
        let mut records = Vec::with_capacity(result.varbinds.len());
        for vb in &result.varbinds {
            if abort && vb.value.is_exception() {
                return Err(match vb.value {
                    Value::NoSuchObject => Error::NoSuchObject { oid: vb.oid.clone() },
                    Value::NoSuchInstance => Error::NoSuchInstance { oid: vb.oid.clone() },
                    _ => Error::EndOfMibView { oid: vb.oid.clone() },
                });
            }
            records.push(ResultRecord::decode(vb, flags, &self.shared.engine));
        }
        Ok(records)
    }

    async fn read_many(&self, inputs: &[OidInput], next: bool) -> Result<Vec<ResultRecord>> {
        let flags = self.output_flags();
        let abort = self.abort_on_nonexistent();
        let resolved = self.resolve_many(inputs)?;
        let oids: Vec<Oid> = resolved.iter().map(|r| r.numeric.clone()).collect();
        let request = if next {
            PduRequest::GetNext { oids: oids.clone() }
        } else {
            PduRequest::Get { oids: oids.clone() }
        };
        let result = self.dispatch_with_retry(request).await?;
        self.shape(result, &oids, flags, abort)
    }

    fn single(mut records: Vec<ResultRecord>) -> Result<ResultRecord> {
        if records.len() == 1 {
            Ok(records.remove(0))
        } else {
            Err(Error::connection(format!(
                "agent answered {} varbinds to a single-varbind request",
                records.len()
            )))
        }
    }

    /// GET one object instance.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host))]
    pub async fn get(&self, oid: impl Into<OidInput>) -> Result<ResultRecord> {
        Self::single(self.read_many(&[oid.into()], false).await?)
    }

    /// GET several object instances in one PDU.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host, snmp.oid_count = oids.len()))]
    pub async fn get_many(&self, oids: &[OidInput]) -> Result<Vec<ResultRecord>> {
        self.read_many(oids, false).await
    }

    /// GETNEXT: the lexicographic successor of one OID.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host))]
    pub async fn get_next(&self, oid: impl Into<OidInput>) -> Result<ResultRecord> {
        Self::single(self.read_many(&[oid.into()], true).await?)
    }

    /// GETNEXT over several OIDs in one PDU.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host, snmp.oid_count = oids.len()))]
    pub async fn get_next_many(&self, oids: &[OidInput]) -> Result<Vec<ResultRecord>> {
        self.read_many(oids, true).await
    }

    /// GETBULK (v2c/v3 only).
    ///
    /// The first `non_repeaters` OIDs behave like GETNEXT; each remaining
    /// OID yields up to `max_repetitions` successive results.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host, snmp.oid_count = oids.len()))]
    pub async fn get_bulk(
        &self,
        oids: &[OidInput],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Vec<ResultRecord>> {
        let version = self.shared.config.version;
        if !version.supports_bulk() {
            return Err(Error::UnsupportedByVersion {
                operation: "GETBULK",
                version,
            });
        }
        let flags = self.output_flags();
        let abort = self.abort_on_nonexistent();
        let resolved = self.resolve_many(oids)?;
        let numeric: Vec<Oid> = resolved.iter().map(|r| r.numeric.clone()).collect();
        let result = self
            .dispatch_with_retry(PduRequest::GetBulk {
                oids: numeric.clone(),
                non_repeaters,
                max_repetitions,
            })
            .await?;
        self.shape(result, &numeric, flags, abort)
    }

    /// Decide the wire type for one SET varbind.
    ///
    /// Explicit type wins; an integer input with no type encodes as
    /// INTEGER; text with no type makes the session GET the object and
    /// reuse the type the agent reports.
    async fn infer_type(
        &self,
        numeric: &Oid,
        value: &SetValue,
        explicit: Option<SnmpType>,
    ) -> Result<SnmpType> {
        if let Some(snmp_type) = explicit {
            return Ok(snmp_type);
        }
        if matches!(value, SetValue::Int(_)) {
            return Ok(SnmpType::Integer);
        }
        let result = self
            .dispatch_with_retry(PduRequest::Get {
                oids: vec![numeric.clone()],
            })
            .await?;
        let current = result
            .varbinds
            .first()
            .filter(|_| !result.is_error())
            .map(|vb| vb.value.snmp_type());
        match current {
            Some(snmp_type) if !snmp_type.is_exception() && snmp_type != SnmpType::Null => {
                Ok(snmp_type)
            }
            _ => Err(Error::UndeterminedType {
                oid: Some(numeric.clone()),
            }),
        }
    }

    async fn build_set_varbind(&self, item: &SetItem) -> Result<(Oid, VarBind)> {
        let resolved = self.resolve_one(&item.oid)?;
        let snmp_type = self
            .infer_type(&resolved.numeric, &item.value, item.snmp_type)
            .await?;
        let value = snmp_type.encode(&item.value.as_text())?;
        Ok((resolved.numeric.clone(), VarBind::new(resolved.numeric, value)))
    }

    /// SET one varbind. Returns `true` on success.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host))]
    pub async fn set(
        &self,
        oid: impl Into<OidInput>,
        value: impl Into<SetValue>,
        snmp_type: Option<SnmpType>,
    ) -> Result<bool> {
        let item = SetItem {
            oid: oid.into(),
            value: value.into(),
            snmp_type,
        };
        self.set_items(&[item]).await
    }

    /// SET several varbinds in one atomic PDU. Returns `true` on success;
    /// any rejection fails the whole call with the rejecting varbind's
    /// error status and index.
    #[instrument(skip_all, fields(snmp.target = %self.shared.config.host, snmp.oid_count = items.len()))]
    pub async fn set_multiple(&self, items: &[SetItem]) -> Result<bool> {
        self.set_items(items).await
    }

    async fn set_items(&self, items: &[SetItem]) -> Result<bool> {
        let mut requested = Vec::with_capacity(items.len());
        let mut varbinds = Vec::with_capacity(items.len());
        for item in items {
            let (numeric, varbind) = self.build_set_varbind(item).await?;
            requested.push(numeric);
            varbinds.push(varbind);
        }
        let result = self
            .dispatch_with_retry(PduRequest::Set { varbinds })
            .await?;
        if result.is_error() {
            return Err(self.status_error(&result, &requested));
        }
        Ok(true)
    }
}

// Walk streams box their page futures, which pins the engine lifetime.
impl<E: Engine + 'static> Session<E> {
    /// Walk a subtree with GETNEXT paging, collecting all records.
    ///
    /// `"."` (or an empty root) walks the whole accessible MIB view.
    pub async fn walk(&self, root: impl Into<OidInput>) -> Result<Vec<ResultRecord>> {
        let mut stream = pin!(self.walk_stream(root)?);
        let mut records = Vec::new();
        while let Some(item) =
            std::future::poll_fn(|cx| stream.as_mut().poll_next(cx)).await
        {
            records.push(item?);
        }
        Ok(records)
    }

    /// Walk a subtree with GETBULK paging, collecting all records.
    pub async fn bulk_walk(
        &self,
        root: impl Into<OidInput>,
        max_repetitions: i32,
    ) -> Result<Vec<ResultRecord>> {
        let mut stream = pin!(self.bulk_walk_stream(root, max_repetitions)?);
        let mut records = Vec::new();
        while let Some(item) =
            std::future::poll_fn(|cx| stream.as_mut().poll_next(cx)).await
        {
            records.push(item?);
        }
        Ok(records)
    }

    /// A GETNEXT-paged walk as a stream.
    ///
    /// The root resolves eagerly, so an unknown symbolic root fails here
    /// rather than on first poll.
    pub fn walk_stream(
        &self,
        root: impl Into<OidInput>,
    ) -> Result<impl Stream<Item = Result<ResultRecord>> + Send> {
        let root = self.resolve_one(&root.into())?.numeric;
        Ok(Walk::new(self.clone(), root))
    }

    /// A GETBULK-paged walk as a stream (v2c/v3 only).
    pub fn bulk_walk_stream(
        &self,
        root: impl Into<OidInput>,
        max_repetitions: i32,
    ) -> Result<impl Stream<Item = Result<ResultRecord>> + Send> {
        let version = self.shared.config.version;
        if !version.supports_bulk() {
            return Err(Error::UnsupportedByVersion {
                operation: "GETBULK",
                version,
            });
        }
        let root = self.resolve_one(&root.into())?.numeric;
        Ok(BulkWalk::new(self.clone(), root, max_repetitions))
    }
}
