//! OID input normalization.
//!
//! Callers address variables in four equivalent shapes: dotted numeric
//! strings (with or without a leading dot), symbolic names with an optional
//! instance suffix (`sysDescr.0`), fully qualified symbolic paths
//! (`.iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0`), and explicit
//! `(name, index)` pairs. All of them are normalized here, at the API
//! boundary, into a [`ResolvedOid`] so nothing deeper in the call chain
//! branches on input shape.

use crate::error::{Error, OidErrorKind, Result};
use crate::oid::Oid;

/// A caller-supplied OID in any accepted form.
#[derive(Debug, Clone, PartialEq)]
pub enum OidInput {
    /// Dotted numeric, symbolic, or fully qualified symbolic text.
    Text(String),
    /// Explicit (object name, instance index) pair. Either half may carry
    /// a leading dot; the name half may itself be dotted numeric.
    Pair { name: String, index: String },
    /// An already-numeric OID.
    Numeric(Oid),
}

impl From<&str> for OidInput {
    fn from(s: &str) -> Self {
        OidInput::Text(s.to_string())
    }
}

impl From<String> for OidInput {
    fn from(s: String) -> Self {
        OidInput::Text(s)
    }
}

impl From<(&str, &str)> for OidInput {
    fn from((name, index): (&str, &str)) -> Self {
        OidInput::Pair {
            name: name.to_string(),
            index: index.to_string(),
        }
    }
}

impl From<(String, String)> for OidInput {
    fn from((name, index): (String, String)) -> Self {
        OidInput::Pair { name, index }
    }
}

impl From<Oid> for OidInput {
    fn from(oid: Oid) -> Self {
        OidInput::Numeric(oid)
    }
}

impl std::fmt::Display for OidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OidInput::Text(s) => f.write_str(s),
            OidInput::Pair { name, index } => write!(f, "({}, {})", name, index),
            OidInput::Numeric(oid) => write!(f, "{}", oid),
        }
    }
}

/// The canonical form of a caller-supplied OID.
///
/// `name` and `index` hold the symbolic split when the input was symbolic
/// (both empty for purely numeric input); `numeric` is always populated and
/// is what gets dispatched to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOid {
    /// Symbolic object name, or empty for numeric input.
    pub name: String,
    /// Instance index (dotted, no leading dot), possibly empty.
    pub index: String,
    /// The canonical numeric OID.
    pub numeric: Oid,
}

impl OidInput {
    /// Normalize into a [`ResolvedOid`], using `lookup` for symbolic names.
    ///
    /// Numeric forms bypass the lookup entirely. A symbolic name the lookup
    /// does not know fails with [`Error::UnknownObjectId`]; that is a
    /// resolution failure, not a protocol "no such object" response.
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<Oid>) -> Result<ResolvedOid> {
        match self {
            OidInput::Numeric(oid) => Ok(ResolvedOid {
                name: String::new(),
                index: String::new(),
                numeric: oid.clone(),
            }),
            OidInput::Text(text) => resolve_text(text, &lookup),
            OidInput::Pair { name, index } => resolve_pair(name, index, &lookup),
        }
    }
}

fn resolve_text(text: &str, lookup: &impl Fn(&str) -> Option<Oid>) -> Result<ResolvedOid> {
    if text.is_empty() {
        return Err(Error::invalid_oid(OidErrorKind::Empty));
    }

    let stripped = text.strip_prefix('.').unwrap_or(text);

    // Purely numeric forms (including the bare root ".") skip name lookup.
    if stripped.is_empty() || is_index(stripped) {
        return Ok(ResolvedOid {
            name: String::new(),
            index: String::new(),
            numeric: Oid::parse(stripped)?,
        });
    }

    let (name, index) = split_instance(stripped);
    let object = lookup(name).ok_or_else(|| Error::UnknownObjectId { name: name.into() })?;
    let numeric = object.extended(&parse_index(index)?);

    Ok(ResolvedOid {
        name: short_name(name).to_string(),
        index: index.to_string(),
        numeric,
    })
}

fn resolve_pair(
    name: &str,
    index: &str,
    lookup: &impl Fn(&str) -> Option<Oid>,
) -> Result<ResolvedOid> {
    if name.is_empty() {
        return Err(Error::invalid_oid(OidErrorKind::Empty));
    }

    let stripped_name = name.strip_prefix('.').unwrap_or(name);
    let stripped_index = index.strip_prefix('.').unwrap_or(index);
    let index_arcs = parse_index(stripped_index)?;

    // The name half of a pair may itself be dotted numeric.
    let (object, symbolic) = if is_index(stripped_name) {
        (Oid::parse(stripped_name)?, String::new())
    } else {
        let oid =
            lookup(stripped_name).ok_or_else(|| Error::UnknownObjectId { name: name.into() })?;
        (oid, short_name(stripped_name).to_string())
    };

    Ok(ResolvedOid {
        name: symbolic,
        index: stripped_index.to_string(),
        numeric: object.extended(&index_arcs),
    })
}

/// Split a symbolic string into (object name, instance index).
///
/// The split happens at the first dot whose remainder consists solely of
/// dot-separated numbers; that makes `sysDescr.0` split as
/// (`sysDescr`, `0`), `nsCacheTimeout.1.3.6.1.2.1.2.2` as
/// (`nsCacheTimeout`, `1.3.6.1.2.1.2.2`), and leaves index-less names such
/// as `sysUpTimeInstance` whole.
fn split_instance(s: &str) -> (&str, &str) {
    for (i, _) in s.match_indices('.') {
        let rest = &s[i + 1..];
        if is_index(rest) {
            return (&s[..i], rest);
        }
    }
    (s, "")
}

/// Whether `s` is a valid instance index: dot-separated unsigned numbers.
fn is_index(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(|part| part.parse::<u32>().is_ok())
}

fn parse_index(index: &str) -> Result<Vec<u32>> {
    if index.is_empty() {
        return Ok(Vec::new());
    }
    index
        .split('.')
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, index))
        })
        .collect()
}

/// The final label of a possibly fully qualified symbolic name.
fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn lookup(name: &str) -> Option<Oid> {
        match name.rsplit('.').next().unwrap_or(name) {
            "sysDescr" => Some(oid!(1, 3, 6, 1, 2, 1, 1, 1)),
            "nsCacheTimeout" => Some(oid!(1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 2)),
            "sysUpTimeInstance" => Some(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)),
            _ => None,
        }
    }

    #[test]
    fn test_all_forms_resolve_to_same_target() {
        let expected = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        let forms: Vec<OidInput> = vec![
            "sysDescr.0".into(),
            ("sysDescr", "0").into(),
            ".1.3.6.1.2.1.1.1.0".into(),
            "1.3.6.1.2.1.1.1.0".into(),
            ".iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0".into(),
            (".iso.org.dod.internet.mgmt.mib-2.system.sysDescr", "0").into(),
            (".1.3.6.1.2.1.1.1", "0").into(),
            expected.clone().into(),
        ];

        for form in forms {
            let resolved = form.resolve(lookup).unwrap();
            assert_eq!(resolved.numeric, expected, "form {:?}", form);
        }
    }

    #[test]
    fn test_symbolic_split_sets_name_and_index() {
        let resolved = OidInput::from("sysDescr.0").resolve(lookup).unwrap();
        assert_eq!(resolved.name, "sysDescr");
        assert_eq!(resolved.index, "0");
    }

    #[test]
    fn test_dotted_numeric_instance_index() {
        let resolved = OidInput::from("nsCacheTimeout.1.3.6.1.2.1.2.2")
            .resolve(lookup)
            .unwrap();
        assert_eq!(resolved.name, "nsCacheTimeout");
        assert_eq!(resolved.index, "1.3.6.1.2.1.2.2");
        assert_eq!(
            resolved.numeric,
            oid!(1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 2, 1, 3, 6, 1, 2, 1, 2, 2)
        );
    }

    #[test]
    fn test_index_less_symbol_stays_whole() {
        let resolved = OidInput::from("sysUpTimeInstance").resolve(lookup).unwrap();
        assert_eq!(resolved.name, "sysUpTimeInstance");
        assert_eq!(resolved.index, "");
        assert_eq!(resolved.numeric, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    }

    #[test]
    fn test_pair_index_leading_dot_stripped() {
        let resolved = OidInput::from(("nsCacheTimeout", ".1.3.6.1.2.1.2.2"))
            .resolve(lookup)
            .unwrap();
        assert_eq!(resolved.index, "1.3.6.1.2.1.2.2");
    }

    #[test]
    fn test_numeric_bypasses_lookup() {
        // The lookup would fail for every name; numeric input must not care.
        let resolved = OidInput::from("1.3.6.1.99.1")
            .resolve(|_| None)
            .unwrap();
        assert_eq!(resolved.numeric, oid!(1, 3, 6, 1, 99, 1));
        assert_eq!(resolved.name, "");
    }

    #[test]
    fn test_root_dot_resolves_to_empty_oid() {
        let resolved = OidInput::from(".").resolve(|_| None).unwrap();
        assert!(resolved.numeric.is_empty());
    }

    #[test]
    fn test_unknown_name_is_resolution_failure() {
        let err = OidInput::from("sysDescripto.0").resolve(lookup).unwrap_err();
        assert!(matches!(err, Error::UnknownObjectId { name } if &*name == "sysDescripto"));
    }

    #[test]
    fn test_fully_qualified_keeps_short_name() {
        let resolved = OidInput::from(".iso.org.dod.internet.mgmt.mib-2.system.sysDescr.0")
            .resolve(lookup)
            .unwrap();
        assert_eq!(resolved.name, "sysDescr");
        assert_eq!(resolved.index, "0");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            OidInput::from("").resolve(lookup),
            Err(Error::InvalidOid {
                kind: OidErrorKind::Empty,
                ..
            })
        ));
    }
}
