//! In-memory engine for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::{Engine, NameMatch, PduRequest, PduResult};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::session::SessionConfig;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;

/// An engine backed by an in-memory MIB instance store.
///
/// Answers GET/GETNEXT/GETBULK/SET against a `BTreeMap` of instances and
/// mimics the absence semantics of whichever SNMP version the session was
/// opened with: `noSuchName` error-status under v1, per-varbind exception
/// values under v2c/v3.
///
/// ```
/// use snmp_session::engine::MockEngine;
/// use snmp_session::value::Value;
/// use snmp_session::oid;
///
/// let engine = MockEngine::new();
/// engine.define_symbol("sysContact", oid!(1, 3, 6, 1, 2, 1, 1, 4));
/// engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::from("admin"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    store: BTreeMap<Oid, Value>,
    symbols: Vec<(String, Oid)>,
    enums: HashMap<(Oid, i32), String>,
    opened: Option<SessionConfig>,
    open_error: Option<String>,
    queued_timeouts: u32,
    set_error: Option<(ErrorStatus, u32)>,
    requests: Vec<PduRequest>,
    closed: bool,
}

impl MockEngine {
    /// A fresh engine with an empty store and symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Insert (or overwrite) one instance.
    pub fn insert(&self, oid: Oid, value: Value) {
        self.lock().store.insert(oid, value);
    }

    /// Read back a stored instance.
    pub fn stored(&self, oid: &Oid) -> Option<Value> {
        self.lock().store.get(oid).cloned()
    }

    /// Register a symbolic name for an object (or instance) prefix.
    pub fn define_symbol(&self, name: &str, oid: Oid) {
        self.lock().symbols.push((name.to_string(), oid));
    }

    /// Register an enum label for an object's INTEGER value.
    pub fn define_enum(&self, object: Oid, value: i32, label: &str) {
        self.lock().enums.insert((object, value), label.to_string());
    }

    /// Make the next `open` call fail with a connection error.
    pub fn fail_open(&self, message: &str) {
        self.lock().open_error = Some(message.to_string());
    }

    /// Make the next `count` dispatches time out before answering.
    pub fn queue_timeouts(&self, count: u32) {
        self.lock().queued_timeouts = count;
    }

    /// Make SET requests fail with the given PDU error.
    pub fn fail_set(&self, status: ErrorStatus, index: u32) {
        self.lock().set_error = Some((status, index));
    }

    /// The configuration the session opened this engine with.
    pub fn opened_config(&self) -> Option<SessionConfig> {
        self.lock().opened.clone()
    }

    /// Every request dispatched so far, in order.
    pub fn requests(&self) -> Vec<PduRequest> {
        self.lock().requests.clone()
    }

    /// Whether the session released the engine.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn version(inner: &Inner) -> Version {
        inner.opened.as_ref().map(|c| c.version).unwrap_or(Version::V2c)
    }

    /// Whether any registered object symbol is a prefix of the query. Under
    /// v2c/v3 this decides noSuchObject versus noSuchInstance.
    fn object_known(inner: &Inner, oid: &Oid) -> bool {
        inner
            .symbols
            .iter()
            .any(|(_, sym)| sym.len() < oid.len() && oid.starts_with(sym))
    }

    fn handle_get(inner: &Inner, oids: &[Oid]) -> PduResult {
        let mut varbinds = Vec::with_capacity(oids.len());
        for (i, oid) in oids.iter().enumerate() {
            match inner.store.get(oid) {
                Some(value) => varbinds.push(VarBind::new(oid.clone(), value.clone())),
                None if Self::version(inner) == Version::V1 => {
                    return PduResult::error(ErrorStatus::NoSuchName, i as u32 + 1);
                }
                None => {
                    let exception = if Self::object_known(inner, oid) {
                        Value::NoSuchInstance
                    } else {
                        Value::NoSuchObject
                    };
                    varbinds.push(VarBind::new(oid.clone(), exception));
                }
            }
        }
        PduResult::ok(varbinds)
    }

    fn successor(inner: &Inner, oid: &Oid) -> Option<(Oid, Value)> {
        use std::ops::Bound;
        inner
            .store
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    fn handle_get_next(inner: &Inner, oids: &[Oid]) -> PduResult {
        let mut varbinds = Vec::with_capacity(oids.len());
        for (i, oid) in oids.iter().enumerate() {
            match Self::successor(inner, oid) {
                Some((next, value)) => varbinds.push(VarBind::new(next, value)),
                None if Self::version(inner) == Version::V1 => {
                    return PduResult::error(ErrorStatus::NoSuchName, i as u32 + 1);
                }
                None => varbinds.push(VarBind::new(oid.clone(), Value::EndOfMibView)),
            }
        }
        PduResult::ok(varbinds)
    }

    fn handle_get_bulk(
        inner: &Inner,
        oids: &[Oid],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> PduResult {
        let split = (non_repeaters.max(0) as usize).min(oids.len());
        let mut varbinds = Vec::new();
        for oid in &oids[..split] {
            match Self::successor(inner, oid) {
                Some((next, value)) => varbinds.push(VarBind::new(next, value)),
                None => varbinds.push(VarBind::new(oid.clone(), Value::EndOfMibView)),
            }
        }
        let mut cursors: Vec<Oid> = oids[split..].to_vec();
        for _ in 0..max_repetitions.max(0) {
            if cursors.is_empty() {
                break;
            }
            let mut all_ended = true;
            for cursor in &mut cursors {
                match Self::successor(inner, cursor) {
                    Some((next, value)) => {
                        varbinds.push(VarBind::new(next.clone(), value));
                        *cursor = next;
                        all_ended = false;
                    }
                    None => varbinds.push(VarBind::new(cursor.clone(), Value::EndOfMibView)),
                }
            }
            if all_ended {
                break;
            }
        }
        PduResult::ok(varbinds)
    }

    fn handle_set(inner: &mut Inner, varbinds: &[VarBind]) -> PduResult {
        if let Some((status, index)) = inner.set_error {
            return PduResult::error(status, index);
        }
        for vb in varbinds {
            inner.store.insert(vb.oid.clone(), vb.value.clone());
        }
        PduResult::ok(varbinds.to_vec())
    }
}

impl Engine for MockEngine {
    async fn open(&self, config: &SessionConfig) -> Result<()> {
        let mut inner = self.lock();
        if let Some(message) = inner.open_error.take() {
            return Err(Error::connection(message));
        }
        inner.opened = Some(config.clone());
        Ok(())
    }

    async fn dispatch(&self, request: PduRequest) -> Result<PduResult> {
        let mut inner = self.lock();
        if inner.queued_timeouts > 0 {
            inner.queued_timeouts -= 1;
            return Err(Error::Timeout {
                elapsed: Duration::from_millis(0),
                retries: 0,
            });
        }
        inner.requests.push(request.clone());
        let result = match &request {
            PduRequest::Get { oids } => Self::handle_get(&inner, oids),
            PduRequest::GetNext { oids } => Self::handle_get_next(&inner, oids),
            PduRequest::GetBulk {
                oids,
                non_repeaters,
                max_repetitions,
            } => Self::handle_get_bulk(&inner, oids, *non_repeaters, *max_repetitions),
            PduRequest::Set { varbinds } => Self::handle_set(&mut inner, varbinds),
        };
        Ok(result)
    }

    fn resolve_object(&self, name: &str) -> Option<Oid> {
        let inner = self.lock();
        let hit = inner.symbols.iter().find(|(sym, _)| sym == name);
        match hit {
            Some((_, oid)) => Some(oid.clone()),
            // Fully qualified paths resolve by their final label.
            None => name.rsplit('.').next().and_then(|label| {
                inner
                    .symbols
                    .iter()
                    .find(|(sym, _)| sym == label)
                    .map(|(_, oid)| oid.clone())
            }),
        }
    }

    fn translate(&self, oid: &Oid) -> Option<NameMatch> {
        let inner = self.lock();
        inner
            .symbols
            .iter()
            .filter(|(_, sym)| !sym.is_empty() && (oid == sym || oid.starts_with(sym)))
            .max_by_key(|(_, sym)| sym.len())
            .map(|(name, sym)| NameMatch {
                name: name.clone(),
                prefix_len: sym.len(),
            })
    }

    fn enum_label(&self, object: &Oid, value: i32) -> Option<String> {
        self.lock().enums.get(&(object.clone(), value)).cloned()
    }

    fn close(&self) {
        self.lock().closed = true;
    }
}
