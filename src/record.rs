//! Typed result records.
//!
//! A [`ResultRecord`] is the caller-facing rendering of one response
//! varbind: symbolic (or numeric) object name, instance index, type tag
//! and a textual value. Records are immutable once produced.

use crate::engine::Engine;
use crate::oid::Oid;
use crate::value::{SnmpType, Value};
use crate::varbind::VarBind;

/// Snapshot of the session's live output flags, taken at the start of a
/// call so a flag flipped mid-call cannot produce mixed rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFlags {
    /// Always render numeric OIDs, even when the MIB knows a name.
    pub use_numeric: bool,
    /// Decode enumerated INTEGER values to their label.
    pub use_enums: bool,
    /// Format values with the pretty-printer (TimeTicks as `d:h:m:s.cs`).
    pub use_sprint_value: bool,
}

/// One decoded varbind: the typed output unit of every session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Symbolic object name, or leading-dot numeric prefix under
    /// `use_numeric` (or when the MIB has no match).
    pub oid: String,
    /// Instance index, possibly empty.
    pub oid_index: String,
    /// Type tag.
    pub snmp_type: SnmpType,
    /// Decoded value, textual or numeric-as-text.
    pub value: String,
}

impl ResultRecord {
    /// Decode a response varbind into a record.
    ///
    /// The engine's MIB decides where the object name ends and the
    /// instance index begins; without a match the whole OID is rendered
    /// numerically with an empty index.
    pub fn decode<E: Engine>(varbind: &VarBind, flags: OutputFlags, engine: &E) -> Self {
        // A match claiming more arcs than the OID has is nonsense from the
        // engine; treat it as no match and render numerically.
        let name_match = engine
            .translate(&varbind.oid)
            .filter(|m| m.prefix_len <= varbind.oid.len());
        let prefix_len = name_match
            .as_ref()
            .map(|m| m.prefix_len)
            .unwrap_or(varbind.oid.len());

        let (oid, oid_index) = match name_match {
            Some(m) if !flags.use_numeric => {
                (m.name, varbind.oid.suffix_string(m.prefix_len))
            }
            Some(m) => {
                let prefix = Oid::from_slice(&varbind.oid.arcs()[..m.prefix_len]);
                (prefix.to_dotted(), varbind.oid.suffix_string(m.prefix_len))
            }
            None => (varbind.oid.to_dotted(), String::new()),
        };

        let object = Oid::from_slice(&varbind.oid.arcs()[..prefix_len]);
        let value = render_value(varbind, &object, flags, engine);

        Self {
            oid,
            oid_index,
            snmp_type: varbind.value.snmp_type(),
            value,
        }
    }

    /// Whether this record carries one of the exception sentinels.
    pub fn is_exception(&self) -> bool {
        self.snmp_type.is_exception()
    }
}

impl std::fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.oid_index.is_empty() {
            write!(f, "{} = {}: {}", self.oid, self.snmp_type, self.value)
        } else {
            write!(
                f,
                "{}.{} = {}: {}",
                self.oid, self.oid_index, self.snmp_type, self.value
            )
        }
    }
}

fn render_value<E: Engine>(
    varbind: &VarBind,
    object: &Oid,
    flags: OutputFlags,
    engine: &E,
) -> String {
    if flags.use_sprint_value
        && let Some(pretty) = engine.sprint_value(varbind)
    {
        return pretty;
    }
    match &varbind.value {
        Value::Integer(v) => {
            if flags.use_enums
                && let Some(label) = engine.enum_label(object, *v)
            {
                return label;
            }
            v.to_string()
        }
        Value::OctetString(bytes) | Value::Opaque(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        Value::Null => String::new(),
        Value::ObjectIdentifier(oid) => oid.to_dotted(),
        Value::IpAddress(octets) => format!(
            "{}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        ),
        Value::Counter32(v) | Value::Gauge32(v) => v.to_string(),
        Value::TimeTicks(ticks) => {
            if flags.use_sprint_value {
                format_timeticks(*ticks)
            } else {
                ticks.to_string()
            }
        }
        Value::Counter64(v) => v.to_string(),
        Value::NoSuchObject => "NOSUCHOBJECT".to_string(),
        Value::NoSuchInstance => "NOSUCHINSTANCE".to_string(),
        Value::EndOfMibView => "ENDOFMIBVIEW".to_string(),
    }
}

/// net-snmp style TimeTicks rendering: days:hours:minutes:seconds.centis.
fn format_timeticks(ticks: u32) -> String {
    let centis = ticks % 100;
    let total_secs = ticks / 100;
    format!(
        "{}:{}:{}:{}.{:02}",
        total_secs / 86_400,
        (total_secs / 3_600) % 24,
        (total_secs / 60) % 60,
        total_secs % 60,
        centis
    )
}
