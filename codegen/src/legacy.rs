//! Legacy support matrix and resolver.
//!
//! The matrix records, per `segment -> key`, which request operations were
//! historically supported. Each trait maps to an object whose values are
//! either flag records (`{"add": .., "alt": .., "extract": ..}`) or
//! structural entries without operation metadata; only objects carrying an
//! `extract` key count as flag records.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::model::{AdminType, Operation, OperationPolicy, OperationSet};

/// One flag record of the legacy matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SupportEntry {
    /// Supported on add requests.
    #[serde(default)]
    pub add: bool,
    /// Supported on alter requests.
    #[serde(default, alias = "alter")]
    pub alt: bool,
    /// Supported on extract requests.
    pub extract: bool,
}

/// Read-only lookup of legacy support records.
pub trait SupportMatrix {
    /// Returns the flag records for a lower-cased `(segment, key)`, or `None`
    /// if the matrix has no entry for the trait at all.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::LegacyMatrix`] if a flag record is malformed.
    fn entries(&self, segment: &str, key: &str) -> Result<Option<Vec<SupportEntry>>>;
}

/// A support matrix backed by a parsed JSON document.
#[derive(Debug, Clone)]
pub struct JsonSupportMatrix {
    admin_type: String,
    root: Map<String, Value>,
}

impl JsonSupportMatrix {
    /// Wraps a parsed matrix document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::LegacyMatrix`] if the document or any segment
    /// is not a JSON object.
    pub fn from_value(admin_type: &AdminType, value: Value) -> Result<Self> {
        let malformed = |message: String| SchemaError::LegacyMatrix {
            admin_type: admin_type.name().to_string(),
            message,
        };
        let Value::Object(root) = value else {
            return Err(malformed("top level is not an object".to_string()));
        };
        if let Some((segment, _)) = root.iter().find(|(_, v)| !v.is_object()) {
            return Err(malformed(format!("segment {segment} is not an object")));
        }
        Ok(Self {
            admin_type: admin_type.name().to_string(),
            root,
        })
    }

    /// Reads and parses the matrix file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not JSON, or is not shaped
    /// as a matrix.
    pub fn load(admin_type: &AdminType, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| SchemaError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(admin_type, value)
    }
}

impl SupportMatrix for JsonSupportMatrix {
    fn entries(&self, segment: &str, key: &str) -> Result<Option<Vec<SupportEntry>>> {
        let Some(record) = self
            .root
            .get(segment)
            .and_then(|s| s.get(key))
            .and_then(Value::as_object)
        else {
            return Ok(None);
        };
        record
            .iter()
            .filter(|(_, v)| v.as_object().is_some_and(|o| o.contains_key("extract")))
            .map(|(source, v)| {
                serde_json::from_value(v.clone()).map_err(|e| SchemaError::LegacyMatrix {
                    admin_type: self.admin_type.clone(),
                    message: format!("{segment}.{key}.{source}: {e}"),
                })
            })
            .collect::<Result<Vec<SupportEntry>>>()
            .map(Some)
    }
}

/// An in-memory support matrix, for tests and for callers that build the
/// matrix themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticSupportMatrix {
    records: BTreeMap<(String, String), Vec<SupportEntry>>,
}

impl StaticSupportMatrix {
    /// Creates an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag record for `(segment, key)`.
    pub fn with(mut self, segment: &str, key: &str, entry: SupportEntry) -> Self {
        self.records
            .entry((segment.to_string(), key.to_string()))
            .or_default()
            .push(entry);
        self
    }
}

impl SupportMatrix for StaticSupportMatrix {
    fn entries(&self, segment: &str, key: &str) -> Result<Option<Vec<SupportEntry>>> {
        Ok(self
            .records
            .get(&(segment.to_string(), key.to_string()))
            .cloned())
    }
}

/// The admin-type facts the resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    /// Allowed-operation policy of the admin type.
    pub policy: OperationPolicy,
    /// Options-like types always expose `alter` and `extract`.
    pub options_like: bool,
    /// Permission-like types always expose `alter`.
    pub permission_like: bool,
}

impl From<&AdminType> for ResolverPolicy {
    fn from(admin_type: &AdminType) -> Self {
        Self {
            policy: admin_type.policy(),
            options_like: admin_type.is_options_like(),
            permission_like: admin_type.is_permission_like(),
        }
    }
}

/// Folds flag records into the set of supported request operations.
pub fn resolve(entries: &[SupportEntry], policy: &ResolverPolicy) -> OperationSet {
    let mut ops = OperationSet::new();
    for entry in entries {
        if policy.policy.permits(Operation::Add) && entry.add {
            ops.insert(Operation::Add);
        }
        if entry.alt || policy.options_like || policy.permission_like {
            ops.insert(Operation::Alter);
        }
        if entry.extract || policy.options_like {
            ops.insert(Operation::Extract);
        }
    }
    ops
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(add: bool, alt: bool, extract: bool) -> SupportEntry {
        SupportEntry { add, alt, extract }
    }

    #[test]
    fn json_matrix_filters_structural_entries() {
        let doc = json!({
            "base": {
                "owner": {
                    "racf": {"add": true, "alt": false, "extract": true},
                    "note": "structural",
                    "layout": {"offset": 4}
                }
            }
        });
        let matrix = JsonSupportMatrix::from_value(&AdminType::new("user"), doc).unwrap();
        let entries = matrix.entries("base", "owner").unwrap().unwrap();
        assert_eq!(entries, vec![entry(true, false, true)]);
        assert!(matrix.entries("base", "missing").unwrap().is_none());
        assert!(matrix.entries("tso", "owner").unwrap().is_none());
    }

    #[test]
    fn json_matrix_rejects_non_object_segments() {
        let doc = json!({"base": [1, 2]});
        let err = JsonSupportMatrix::from_value(&AdminType::new("user"), doc).unwrap_err();
        assert!(matches!(err, SchemaError::LegacyMatrix { .. }));
    }

    #[test]
    fn missing_add_flag_reads_false() {
        let doc = json!({"base": {"owner": {"racf": {"alt": true, "extract": true}}}});
        let matrix = JsonSupportMatrix::from_value(&AdminType::new("user"), doc).unwrap();
        assert_eq!(
            matrix.entries("base", "owner").unwrap().unwrap(),
            vec![entry(false, true, true)]
        );
    }

    #[test]
    fn mistyped_flag_record_is_an_error() {
        let doc = json!({"base": {"owner": {"racf": {"add": 1, "alt": "yes", "extract": null}}}});
        let matrix = JsonSupportMatrix::from_value(&AdminType::new("user"), doc).unwrap();
        let err = matrix.entries("base", "owner").unwrap_err();
        let SchemaError::LegacyMatrix { admin_type, message } = &err else {
            panic!("expected a legacy matrix error, got {err:?}");
        };
        assert_eq!(admin_type, "user");
        assert!(message.starts_with("base.owner.racf:"), "{message}");
    }

    #[test]
    fn add_requires_policy() {
        let full = ResolverPolicy::from(&AdminType::new("user"));
        let restricted = ResolverPolicy::from(&AdminType::new("group_connection"));
        let entries = [entry(true, true, true)];

        let ops = resolve(&entries, &full);
        assert!(ops.contains(&Operation::Add));
        let ops = resolve(&entries, &restricted);
        assert!(!ops.contains(&Operation::Add));
        assert!(ops.contains(&Operation::Alter));
    }

    #[test]
    fn options_like_always_alter_and_extract() {
        let options = ResolverPolicy::from(&AdminType::new("racf_options"));
        let ops = resolve(&[entry(false, false, false)], &options);
        let expected: OperationSet = [Operation::Alter, Operation::Extract].into_iter().collect();
        assert_eq!(ops, expected);
    }

    #[test]
    fn permission_like_always_alter() {
        let permission = ResolverPolicy::from(&AdminType::new("permission"));
        let ops = resolve(&[entry(false, false, false)], &permission);
        let expected: OperationSet = [Operation::Alter].into_iter().collect();
        assert_eq!(ops, expected);
    }

    #[test]
    fn no_entries_resolve_empty() {
        let full = ResolverPolicy::from(&AdminType::new("user"));
        assert!(resolve(&[], &full).is_empty());
    }
}
