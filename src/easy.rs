//! One-shot convenience functions.
//!
//! Each function opens a transient [`Session`], performs a single
//! operation and releases the engine handle when the session drops.
//! Applications making more than one call against the same agent should
//! hold a [`Session`] instead.

use crate::engine::Engine;
use crate::error::Result;
use crate::record::ResultRecord;
use crate::session::{Session, SessionConfig, SetItem, SetValue};
use crate::target::OidInput;
use crate::value::SnmpType;

/// GET one object instance.
///
/// ```no_run
/// use snmp_session::easy::snmp_get;
/// use snmp_session::engine::MockEngine;
/// use snmp_session::session::SessionConfig;
///
/// # async fn demo() -> snmp_session::Result<()> {
/// let record = snmp_get(MockEngine::new(), SessionConfig::default(), "sysDescr.0").await?;
/// println!("{record}");
/// # Ok(())
/// # }
/// ```
pub async fn snmp_get<E: Engine>(
    engine: E,
    config: SessionConfig,
    oid: impl Into<OidInput>,
) -> Result<ResultRecord> {
    Session::open(engine, config).await?.get(oid).await
}

/// GET several object instances in one PDU.
pub async fn snmp_get_many<E: Engine>(
    engine: E,
    config: SessionConfig,
    oids: &[OidInput],
) -> Result<Vec<ResultRecord>> {
    Session::open(engine, config).await?.get_many(oids).await
}

/// GETNEXT: the lexicographic successor of one OID.
pub async fn snmp_get_next<E: Engine>(
    engine: E,
    config: SessionConfig,
    oid: impl Into<OidInput>,
) -> Result<ResultRecord> {
    Session::open(engine, config).await?.get_next(oid).await
}

/// GETBULK (v2c/v3 only).
pub async fn snmp_get_bulk<E: Engine>(
    engine: E,
    config: SessionConfig,
    oids: &[OidInput],
    non_repeaters: i32,
    max_repetitions: i32,
) -> Result<Vec<ResultRecord>> {
    Session::open(engine, config)
        .await?
        .get_bulk(oids, non_repeaters, max_repetitions)
        .await
}

/// SET one varbind.
pub async fn snmp_set<E: Engine>(
    engine: E,
    config: SessionConfig,
    oid: impl Into<OidInput>,
    value: impl Into<SetValue>,
    snmp_type: Option<SnmpType>,
) -> Result<bool> {
    Session::open(engine, config)
        .await?
        .set(oid, value, snmp_type)
        .await
}

/// SET several varbinds in one atomic PDU.
pub async fn snmp_set_multiple<E: Engine>(
    engine: E,
    config: SessionConfig,
    items: &[SetItem],
) -> Result<bool> {
    Session::open(engine, config).await?.set_multiple(items).await
}

/// Walk a subtree with GETNEXT paging, collecting all records.
pub async fn snmp_walk<E: Engine + 'static>(
    engine: E,
    config: SessionConfig,
    root: impl Into<OidInput>,
) -> Result<Vec<ResultRecord>> {
    Session::open(engine, config).await?.walk(root).await
}

/// Walk a subtree with GETBULK paging (v2c/v3 only).
pub async fn snmp_bulk_walk<E: Engine + 'static>(
    engine: E,
    config: SessionConfig,
    root: impl Into<OidInput>,
    max_repetitions: i32,
) -> Result<Vec<ResultRecord>> {
    Session::open(engine, config)
        .await?
        .bulk_walk(root, max_repetitions)
        .await
}
