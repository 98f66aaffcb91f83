//! Tests for the one-shot convenience functions.

mod common;

use snmp_session::easy::{
    snmp_bulk_walk, snmp_get, snmp_get_bulk, snmp_get_many, snmp_get_next, snmp_set,
    snmp_set_multiple, snmp_walk,
};
use snmp_session::error::Error;
use snmp_session::oid;
use snmp_session::session::SetItem;
use snmp_session::value::{SnmpType, Value};
use snmp_session::version::Version;

use common::{config, populated_engine, SYS_DESCR_TEXT};

#[tokio::test]
async fn test_snmp_get() {
    let record = snmp_get(populated_engine(), config(Version::V2c), "sysDescr.0")
        .await
        .unwrap();
    assert_eq!(record.oid, "sysDescr");
    assert_eq!(record.value, SYS_DESCR_TEXT);
}

#[tokio::test]
async fn test_snmp_get_releases_engine() {
    let engine = populated_engine();
    snmp_get(engine.clone(), config(Version::V2c), "sysDescr.0")
        .await
        .unwrap();
    assert!(engine.is_closed());
}

#[tokio::test]
async fn test_snmp_get_many() {
    let records = snmp_get_many(
        populated_engine(),
        config(Version::V2c),
        &["sysName.0".into(), "sysContact.0".into()],
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].oid, "sysName");
    assert_eq!(records[1].oid, "sysContact");
}

#[tokio::test]
async fn test_snmp_get_next() {
    let record = snmp_get_next(populated_engine(), config(Version::V2c), "sysObjectID.0")
        .await
        .unwrap();
    assert_eq!(record.oid, "sysUpTimeInstance");
}

#[tokio::test]
async fn test_snmp_get_bulk() {
    let records = snmp_get_bulk(
        populated_engine(),
        config(Version::V2c),
        &["ifDescr".into()],
        0,
        2,
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value, "lo");
    assert_eq!(records[1].value, "eth0");
}

#[tokio::test]
async fn test_snmp_get_bulk_v1_rejected() {
    let err = snmp_get_bulk(
        populated_engine(),
        config(Version::V1),
        &["ifDescr".into()],
        0,
        2,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedByVersion { .. }));
}

#[tokio::test]
async fn test_snmp_set() {
    let engine = populated_engine();
    let ok = snmp_set(
        engine.clone(),
        config(Version::V2c),
        "sysName.0",
        "core-sw-1",
        Some(SnmpType::OctetStr),
    )
    .await
    .unwrap();
    assert!(ok);
    assert_eq!(
        engine.stored(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
        Some(Value::from("core-sw-1"))
    );
}

#[tokio::test]
async fn test_snmp_set_multiple() {
    let engine = populated_engine();
    let items: Vec<SetItem> = vec![
        ("sysName.0", "core-sw-1").into(),
        ("ifAdminStatus.2", 1).into(),
    ];
    snmp_set_multiple(engine.clone(), config(Version::V2c), &items)
        .await
        .unwrap();
    assert_eq!(
        engine.stored(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
        Some(Value::from("core-sw-1"))
    );
    assert_eq!(
        engine.stored(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 2)),
        Some(Value::Integer(1))
    );
}

#[tokio::test]
async fn test_snmp_walk() {
    let records = snmp_walk(populated_engine(), config(Version::V2c), "1.3.6.1.2.1.1")
        .await
        .unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].oid, "sysDescr");
    assert_eq!(records[5].oid, "sysLocation");
}

#[tokio::test]
async fn test_snmp_bulk_walk() {
    let records = snmp_bulk_walk(populated_engine(), config(Version::V2c), "ifDescr", 5)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_flags_seed_from_config() {
    let mut config = config(Version::V2c);
    config.use_enums = true;
    let record = snmp_get(populated_engine(), config, "ifAdminStatus.1")
        .await
        .unwrap();
    assert_eq!(record.value, "up");
}
