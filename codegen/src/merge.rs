//! Aggregator and merger.
//!
//! Folds per-admin-type fragments into generated `$defs` entries and unions
//! the result with the hand-maintained base schema.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::assemble::{Bucket, SchemaFragment};

/// Top-level key holding schema definitions.
pub const DEFS_KEY: &str = "$defs";

/// Generated definitions plus the audit codes seen while building them.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Definition name → JSON Schema object.
    pub defs: Map<String, Value>,
    /// Unique operator codes of all validated (add/alter/common) entries.
    pub operator_codes: BTreeSet<String>,
}

impl Aggregate {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the definitions of one admin type.
    ///
    /// Empty buckets produce no definition, except that a non-empty set of
    /// pattern properties always yields the common definition so the
    /// wildcard rules reach the document.
    pub fn add_fragment(&mut self, fragment: &SchemaFragment) {
        let prefix = fragment.admin_type().camel_name();
        let mut patterns = Map::new();
        for (name, entry) in fragment.bucket(Bucket::Pattern) {
            if let Some(code) = &entry.operator_code {
                self.operator_codes.insert(code.clone());
            }
            patterns.insert(name.clone(), entry.to_json(true));
        }

        for bucket in [Bucket::AddOnly, Bucket::AlterOnly, Bucket::Common] {
            let entries = fragment.bucket(bucket);
            let keep_for_patterns = bucket == Bucket::Common && !patterns.is_empty();
            if entries.is_empty() && !keep_for_patterns {
                continue;
            }
            let mut properties = Map::new();
            for (name, entry) in entries {
                if let Some(code) = &entry.operator_code {
                    self.operator_codes.insert(code.clone());
                }
                properties.insert(name.clone(), entry.to_json(false));
            }
            let mut def = Map::new();
            def.insert("properties".to_string(), Value::Object(properties));
            if !patterns.is_empty() {
                def.insert(
                    "patternProperties".to_string(),
                    Value::Object(patterns.clone()),
                );
            }
            def.insert("additionalProperties".to_string(), json!(false));
            self.insert_def(&prefix, bucket, Value::Object(def));
        }

        let extract_only = fragment.bucket(Bucket::ExtractOnly);
        if !extract_only.is_empty() {
            let properties: Map<String, Value> = extract_only
                .iter()
                .map(|(name, entry)| (name.clone(), entry.to_json(false)))
                .collect();
            self.insert_def(
                &prefix,
                Bucket::ExtractOnly,
                json!({ "properties": properties }),
            );
        }
    }

    fn insert_def(&mut self, prefix: &str, bucket: Bucket, def: Value) {
        if let Some(suffix) = bucket.def_suffix() {
            self.defs.insert(format!("{prefix}{suffix}"), def);
        }
    }

    /// The generated document: `{"$defs": {...}}`.
    pub fn into_document(self) -> Value {
        let mut doc = Map::new();
        doc.insert(DEFS_KEY.to_string(), Value::Object(self.defs));
        Value::Object(doc)
    }
}

/// Aggregates every fragment, in order.
pub fn aggregate(fragments: &[SchemaFragment]) -> Aggregate {
    let mut aggregate = Aggregate::new();
    for fragment in fragments {
        aggregate.add_fragment(fragment);
    }
    aggregate
}

/// Object levels unioned by [`merge_shallow`]: the document itself, each
/// top-level section, and each entry of a section.
const MERGE_DEPTH: usize = 3;

/// Shallow union of two documents; `right` wins on conflict.
///
/// Top-level sections present on both sides as objects are merged key by
/// key, and so are their object-valued entries (`$defs.x` from both sides
/// becomes the union of both `x`). Anything nested deeper is replaced
/// wholesale. Wherever either side is not an object, `right` replaces `left`.
pub fn merge_shallow(left: Value, right: Value) -> Value {
    merge_to_depth(left, right, MERGE_DEPTH)
}

fn merge_to_depth(left: Value, right: Value, depth: usize) -> Value {
    if depth == 0 {
        return right;
    }
    match (left, right) {
        (Value::Object(mut merged), Value::Object(incoming)) => {
            for (key, value) in incoming {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_to_depth(existing, value, depth - 1),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, right) => right,
    }
}
