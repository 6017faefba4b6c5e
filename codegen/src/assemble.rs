//! Category assembler.
//!
//! Sorts classified traits into the five buckets of a per-admin-type schema
//! fragment. Every trait lands in exactly one bucket.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map, Value};

use crate::mapping::{map_schema_type, operator_code, SchemaRef};
use crate::model::{is_extract_only, AdminType, Operation, OperationPolicy, OperationSet, TraitDecl};

/// Key under which a trait entry carries its audit code.
pub const OPERATOR_CODE_KEY: &str = "operatorCode";

/// A schema category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Only valid on add requests.
    AddOnly,
    /// Only valid on alter requests.
    AlterOnly,
    /// Valid on add and alter requests (or the type does not distinguish).
    Common,
    /// Read-only; documented but never validated.
    ExtractOnly,
    /// Wildcard trait families, keyed by regular expression.
    Pattern,
}

impl Bucket {
    /// All buckets in fragment order.
    pub const ALL: [Bucket; 5] = [
        Self::AddOnly,
        Self::AlterOnly,
        Self::Common,
        Self::ExtractOnly,
        Self::Pattern,
    ];

    /// Fragment key, e.g. `addOnlyTraits`.
    pub fn key(self) -> &'static str {
        match self {
            Self::AddOnly => "addOnlyTraits",
            Self::AlterOnly => "alterOnlyTraits",
            Self::Common => "commonTraits",
            Self::ExtractOnly => "extractOnlyTraits",
            Self::Pattern => "patternProperties",
        }
    }

    /// Suffix of the generated `$defs` name, e.g. `AddOnlyTraits`.
    pub fn def_suffix(self) -> Option<&'static str> {
        match self {
            Self::AddOnly => Some("AddOnlyTraits"),
            Self::AlterOnly => Some("AlterOnlyTraits"),
            Self::Common => Some("CommonTraits"),
            Self::ExtractOnly => Some("ExtractOnlyTraits"),
            Self::Pattern => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Picks the bucket for a trait from its final supported operations.
///
/// Extract-only wins over the wildcard rule, so a read-only wildcard family
/// is documented rather than validated.
pub fn bucket_for(decl: &TraitDecl, supported: &OperationSet, policy: OperationPolicy) -> Bucket {
    if is_extract_only(supported) {
        return Bucket::ExtractOnly;
    }
    if decl.is_wildcard() {
        return Bucket::Pattern;
    }
    if !policy.permits(Operation::Add) {
        return Bucket::Common;
    }
    let add = supported.contains(&Operation::Add);
    let alter = supported.contains(&Operation::Alter);
    match (add, alter) {
        (true, false) => Bucket::AddOnly,
        (false, true) => Bucket::AlterOnly,
        _ => Bucket::Common,
    }
}

/// One trait's schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitEntry {
    /// Administrative key.
    pub racf_key: String,
    /// Shared trait-type definition.
    pub schema_ref: SchemaRef,
    /// Set for `PSEUDO_BOOLEAN` traits.
    pub pseudo_boolean: bool,
    /// Audit code; absent on extract-only entries.
    pub operator_code: Option<String>,
}

impl TraitEntry {
    /// Builds the entry for `decl` as it will sit in `bucket`.
    pub fn new(decl: &TraitDecl, bucket: Bucket) -> Self {
        let code = (bucket != Bucket::ExtractOnly)
            .then(|| operator_code(&decl.trait_type, &decl.operators));
        Self {
            racf_key: decl.key.clone(),
            schema_ref: map_schema_type(&decl.trait_type, &decl.operators),
            pseudo_boolean: decl.trait_type.is_pseudo_boolean(),
            operator_code: code,
        }
    }

    /// JSON form of the entry; `with_code` keeps the audit code.
    pub fn to_json(&self, with_code: bool) -> Value {
        let mut entry = Map::new();
        entry.insert("racfKey".to_string(), json!(self.racf_key));
        entry.insert("$ref".to_string(), json!(self.schema_ref.reference()));
        if self.pseudo_boolean {
            entry.insert("pseudoBoolean".to_string(), json!(true));
        }
        if let (true, Some(code)) = (with_code, &self.operator_code) {
            entry.insert(OPERATOR_CODE_KEY.to_string(), json!(code));
        }
        Value::Object(entry)
    }
}

/// What happened when a trait was offered to a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The trait was new.
    Inserted,
    /// An identical entry was already present in the same bucket.
    Duplicate,
    /// A different entry (or bucket) was already recorded; the first is kept.
    Conflict {
        /// Bucket holding the first entry.
        existing: Bucket,
    },
}

/// Per-admin-type bucketed trait collection.
#[derive(Debug, Clone)]
pub struct SchemaFragment {
    admin_type: AdminType,
    buckets: BTreeMap<Bucket, BTreeMap<String, TraitEntry>>,
    unresolved: Vec<String>,
}

impl SchemaFragment {
    /// Creates an empty fragment.
    pub fn new(admin_type: AdminType) -> Self {
        Self {
            admin_type,
            buckets: Bucket::ALL.iter().map(|&b| (b, BTreeMap::new())).collect(),
            unresolved: Vec::new(),
        }
    }

    /// The admin type this fragment describes.
    pub fn admin_type(&self) -> &AdminType {
        &self.admin_type
    }

    /// Entries of one bucket, keyed by property name.
    pub fn bucket(&self, bucket: Bucket) -> &BTreeMap<String, TraitEntry> {
        static EMPTY: BTreeMap<String, TraitEntry> = BTreeMap::new();
        self.buckets.get(&bucket).unwrap_or(&EMPTY)
    }

    /// Finds which bucket holds `name`, if any.
    pub fn locate(&self, name: &str) -> Option<Bucket> {
        self.buckets
            .iter()
            .find(|(_, entries)| entries.contains_key(name))
            .map(|(&bucket, _)| bucket)
    }

    /// Total number of traits across all buckets.
    pub fn trait_count(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    /// Names of traits whose type tag could not be mapped.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Adds an entry unless `name` is already recorded somewhere in the fragment.
    pub fn insert(&mut self, bucket: Bucket, name: &str, entry: TraitEntry) -> InsertOutcome {
        if let Some(existing) = self.locate(name) {
            let same = existing == bucket && self.bucket(existing).get(name) == Some(&entry);
            return if same {
                InsertOutcome::Duplicate
            } else {
                InsertOutcome::Conflict { existing }
            };
        }
        if entry.schema_ref == SchemaRef::Unresolved {
            self.unresolved.push(name.to_string());
        }
        self.buckets
            .entry(bucket)
            .or_default()
            .insert(name.to_string(), entry);
        InsertOutcome::Inserted
    }

    /// JSON form of the whole fragment with audit codes, for documentation.
    ///
    /// Admin types that never distinguish `add` omit the add-only and
    /// alter-only buckets.
    pub fn to_json(&self) -> Value {
        let distinguishes_add = self.admin_type.policy().permits(Operation::Add);
        let mut doc = Map::new();
        for bucket in Bucket::ALL {
            if !distinguishes_add && matches!(bucket, Bucket::AddOnly | Bucket::AlterOnly) {
                continue;
            }
            let entries: Map<String, Value> = self
                .bucket(bucket)
                .iter()
                .map(|(name, entry)| (name.clone(), entry.to_json(true)))
                .collect();
            doc.insert(bucket.key().to_string(), Value::Object(entries));
        }
        Value::Object(doc)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::extractor::pattern_property_name;
    use crate::model::{OperatorSet, TraitType};

    fn decl(name: &str, tag: &str, flags: [bool; 4]) -> TraitDecl {
        TraitDecl {
            segment: "base".to_string(),
            name: name.to_string(),
            property_name: pattern_property_name(name),
            key: name.rsplit(':').next().unwrap().trim_end_matches('*').to_string(),
            trait_type: TraitType::new(tag),
            operators: OperatorSet::from_flags(flags),
        }
    }

    fn ops(list: &[Operation]) -> OperationSet {
        list.iter().copied().collect()
    }

    #[test]
    fn extract_only_beats_wildcard() {
        let d = decl("base:auditflags*", "STRING", [true, false, false, false]);
        let bucket = bucket_for(&d, &ops(&[Operation::Extract]), OperationPolicy::Full);
        assert_eq!(bucket, Bucket::ExtractOnly);
    }

    #[test]
    fn wildcard_goes_to_pattern_properties() {
        let d = decl("base:auditflags*", "STRING", [true, false, false, false]);
        let all = ops(&[Operation::Add, Operation::Alter, Operation::Extract]);
        assert_eq!(bucket_for(&d, &all, OperationPolicy::Full), Bucket::Pattern);
        assert_eq!(bucket_for(&d, &all, OperationPolicy::AlterExtract), Bucket::Pattern);
    }

    #[test]
    fn add_and_alter_split() {
        let d = decl("base:owner", "STRING", [true, false, false, false]);
        let policy = OperationPolicy::Full;
        assert_eq!(
            bucket_for(&d, &ops(&[Operation::Add, Operation::Extract]), policy),
            Bucket::AddOnly
        );
        assert_eq!(
            bucket_for(&d, &ops(&[Operation::Alter, Operation::Extract]), policy),
            Bucket::AlterOnly
        );
        assert_eq!(
            bucket_for(&d, &ops(&[Operation::Add, Operation::Alter]), policy),
            Bucket::Common
        );
        assert_eq!(bucket_for(&d, &ops(&[]), policy), Bucket::Common);
    }

    #[test]
    fn restricted_policy_is_always_common() {
        let d = decl("base:owner", "STRING", [true, false, false, false]);
        let bucket = bucket_for(
            &d,
            &ops(&[Operation::Alter, Operation::Extract]),
            OperationPolicy::AlterExtract,
        );
        assert_eq!(bucket, Bucket::Common);
    }

    #[test]
    fn extract_only_entries_carry_no_operator_code() {
        let d = decl("base:last_logon", "STRING", [false; 4]);
        let entry = TraitEntry::new(&d, Bucket::ExtractOnly);
        assert!(entry.operator_code.is_none());
        assert!(entry.to_json(true).get(OPERATOR_CODE_KEY).is_none());

        let entry = TraitEntry::new(&d, Bucket::Common);
        assert_eq!(entry.operator_code.as_deref(), Some("stringN/A"));
    }

    #[test]
    fn entry_json_shape() {
        let d = decl("base:protected", "PSEUDO_BOOLEAN", [true, false, false, false]);
        let entry = TraitEntry::new(&d, Bucket::AlterOnly);
        let value = entry.to_json(false);
        assert_eq!(
            value,
            json!({
                "racfKey": "protected",
                "$ref": "#/$defs/traitTypeSetOnlyBoolean",
                "pseudoBoolean": true
            })
        );
    }

    #[test]
    fn fragment_keeps_first_entry_on_collision() {
        let mut fragment = SchemaFragment::new(AdminType::new("user"));
        let d = decl("base:owner", "STRING", [true, false, false, false]);
        let entry = TraitEntry::new(&d, Bucket::AlterOnly);

        assert_eq!(
            fragment.insert(Bucket::AlterOnly, "base:owner", entry.clone()),
            InsertOutcome::Inserted
        );
        assert_eq!(
            fragment.insert(Bucket::AlterOnly, "base:owner", entry.clone()),
            InsertOutcome::Duplicate
        );
        assert_eq!(
            fragment.insert(Bucket::Common, "base:owner", entry),
            InsertOutcome::Conflict {
                existing: Bucket::AlterOnly
            }
        );
        assert_eq!(fragment.trait_count(), 1);
        assert_eq!(fragment.locate("base:owner"), Some(Bucket::AlterOnly));
    }

    #[test]
    fn fragment_tracks_unresolved_types() {
        let mut fragment = SchemaFragment::new(AdminType::new("user"));
        let d = decl("base:created", "DATE", [true, false, false, false]);
        fragment.insert(Bucket::Common, "base:created", TraitEntry::new(&d, Bucket::Common));
        assert_eq!(fragment.unresolved(), ["base:created".to_string()]);
    }

    #[test]
    fn restricted_fragment_json_has_three_buckets() {
        let fragment = SchemaFragment::new(AdminType::new("permission"));
        let value = fragment.to_json();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["commonTraits", "extractOnlyTraits", "patternProperties"]
        );
    }
}
