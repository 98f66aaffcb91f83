//! Shared fixtures: a mock engine populated with a small system and
//! interfaces MIB, plus session helpers for each protocol version.
#![allow(dead_code)]

use snmp_session::engine::MockEngine;
use snmp_session::oid;
use snmp_session::session::{
    SecurityLevel, Session, SessionBuilder, SessionConfig, V3Security,
};
use snmp_session::value::Value;
use snmp_session::version::Version;

pub const SYS_DESCR_TEXT: &str = "Linux test agent 6.8";
pub const SYS_CONTACT_TEXT: &str = "admin@example.com";
pub const SYS_NAME_TEXT: &str = "router1";
pub const SYS_UPTIME_TICKS: u32 = 8_675_309;

/// A mock engine loaded with enough of SNMPv2-MIB / IF-MIB / IP-MIB to
/// exercise every session operation.
pub fn populated_engine() -> MockEngine {
    let engine = MockEngine::new();

    engine.define_symbol("sysDescr", oid!(1, 3, 6, 1, 2, 1, 1, 1));
    engine.define_symbol("sysObjectID", oid!(1, 3, 6, 1, 2, 1, 1, 2));
    engine.define_symbol("sysUpTime", oid!(1, 3, 6, 1, 2, 1, 1, 3));
    engine.define_symbol("sysUpTimeInstance", oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    engine.define_symbol("sysContact", oid!(1, 3, 6, 1, 2, 1, 1, 4));
    engine.define_symbol("sysName", oid!(1, 3, 6, 1, 2, 1, 1, 5));
    engine.define_symbol("sysLocation", oid!(1, 3, 6, 1, 2, 1, 1, 6));
    engine.define_symbol("ifNumber", oid!(1, 3, 6, 1, 2, 1, 2, 1));
    engine.define_symbol("ifDescr", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2));
    engine.define_symbol("ifAdminStatus", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7));
    engine.define_symbol("ifSpeed", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5));
    engine.define_symbol("ifInOctets", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10));
    engine.define_symbol("ifHCInOctets", oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6));
    engine.define_symbol("ipAdEntAddr", oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 1));
    engine.define_symbol("nsCacheTimeout", oid!(1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 2));

    engine.define_enum(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7), 1, "up");
    engine.define_enum(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7), 2, "down");

    engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from(SYS_DESCR_TEXT));
    engine.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
    );
    engine.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 3, 0),
        Value::TimeTicks(SYS_UPTIME_TICKS),
    );
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::from(SYS_CONTACT_TEXT));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from(SYS_NAME_TEXT));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("lab rack 3"));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo"));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2), Value::from("eth0"));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5, 1), Value::Gauge32(10_000_000));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 1), Value::Integer(1));
    engine.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 2), Value::Integer(2));
    engine.insert(
        oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 1),
        Value::Counter32(1_234_567),
    );
    engine.insert(
        oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6, 1),
        Value::Counter64(987_654_321_000),
    );
    engine.insert(
        oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 1, 10, 0, 0, 1),
        Value::IpAddress([10, 0, 0, 1]),
    );
    // A net-snmp style object indexed by a whole OID.
    engine.insert(
        oid!(1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 2, 1, 3, 6, 1, 2, 1, 2, 2),
        Value::Integer(60),
    );

    engine
}

pub fn config(version: Version) -> SessionConfig {
    SessionConfig {
        version,
        ..SessionConfig::default()
    }
}

/// Install a test-writer subscriber once so `RUST_LOG` surfaces session
/// tracing during test runs.
pub fn init_tracing() {
    use std::sync::Once;
    static TRACING: Once = Once::new();
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Open a session over a freshly populated engine.
pub async fn open(version: Version) -> Session<MockEngine> {
    open_with(populated_engine(), version).await
}

/// Open a session over the given engine, keeping the caller's handle
/// usable for inspection afterwards.
pub async fn open_with(engine: MockEngine, version: Version) -> Session<MockEngine> {
    init_tracing();
    match Session::open(engine, config(version)).await {
        Ok(session) => session,
        Err(err) => panic!("session open failed: {err}"),
    }
}

/// A complete authPriv v3 builder for configuration-path tests.
pub fn v3_builder(hostname: &str) -> SessionBuilder {
    SessionBuilder::new(hostname)
        .version(Version::V3)
        .security(V3Security {
            username: "observer".to_string(),
            level: SecurityLevel::AuthPriv,
            auth_protocol: Some(snmp_session::session::AuthProtocol::Sha256),
            auth_password: Some("authpass123".to_string()),
            priv_protocol: Some(snmp_session::session::PrivProtocol::Aes128),
            priv_password: Some("privpass123".to_string()),
            ..Default::default()
        })
}
