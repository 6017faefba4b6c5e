//! Core data model: admin types, trait declarations, and operation sets.
//!
//! Two distinct vocabularies meet here. Key-map declarations speak in
//! *operators* (`set`, `add`, `remove`, `delete`), which describe how a trait
//! value may be modified. Requests speak in *operations* (`add`, `alter`,
//! `extract`), which describe which request kinds may mention the trait.

use std::collections::BTreeSet;
use std::fmt;

/// Request-level operation.
///
/// The derived ordering is lexical (`add` < `alter` < `extract`), so a
/// [`BTreeSet`] of operations iterates in the same order the labels sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Creating a new profile with the trait.
    Add,
    /// Modifying the trait on an existing profile.
    Alter,
    /// Reading the trait back.
    Extract,
}

impl Operation {
    /// The request label for this operation.
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Alter => "alter",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A deduplicated, sorted set of request operations.
pub type OperationSet = BTreeSet<Operation>;

/// Returns true if `ops` is exactly `{extract}`.
pub fn is_extract_only(ops: &OperationSet) -> bool {
    ops.len() == 1 && ops.contains(&Operation::Extract)
}

/// Declaration-level operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Replace the value.
    Set,
    /// Add to a list value.
    Add,
    /// Remove from a list value.
    Remove,
    /// Delete the value entirely.
    Delete,
}

impl Operator {
    /// All operators in declaration-tuple order.
    pub const ALL: [Operator; 4] = [Self::Set, Self::Add, Self::Remove, Self::Delete];

    /// The operator label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Delete => "delete",
        }
    }
}

/// The four declaration flags of a trait, in `{set, add, remove, delete}` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorSet {
    /// `set` flag.
    pub set: bool,
    /// `add` flag.
    pub add: bool,
    /// `remove` flag.
    pub remove: bool,
    /// `delete` flag.
    pub delete: bool,
}

impl OperatorSet {
    /// Builds a set from the declaration tuple.
    pub fn from_flags(flags: [bool; 4]) -> Self {
        Self {
            set: flags[0],
            add: flags[1],
            remove: flags[2],
            delete: flags[3],
        }
    }

    /// Returns true if the operator flag is raised.
    pub fn contains(&self, op: Operator) -> bool {
        match op {
            Operator::Set => self.set,
            Operator::Add => self.add,
            Operator::Remove => self.remove,
            Operator::Delete => self.delete,
        }
    }

    /// Returns true if no flag is raised.
    pub fn is_empty(&self) -> bool {
        !(self.set || self.add || self.remove || self.delete)
    }

    /// Returns true if `op` is the only raised flag.
    pub fn is_only(&self, op: Operator) -> bool {
        Operator::ALL
            .iter()
            .all(|&other| self.contains(other) == (other == op))
    }

    /// Raised operators in declaration-tuple order.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        Operator::ALL
            .into_iter()
            .filter(move |&op| self.contains(op))
    }
}

/// Broad schema category of a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `BOOLEAN`, `PSEUDO_BOOLEAN`.
    Boolean,
    /// `REPEAT` groups.
    Repeat,
    /// `STRING`.
    String,
    /// `UINT`.
    Uint,
    /// Anything else.
    Unknown,
}

/// A `TRAIT_TYPE_*` tag as written in the key map, e.g. `STRING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitType {
    tag: String,
}

impl TraitType {
    /// Wraps a raw tag (the part after `TRAIT_TYPE_`).
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The tag normalized to lower case.
    pub fn lower(&self) -> String {
        self.tag.to_lowercase()
    }

    /// The tag exactly as declared.
    pub fn raw(&self) -> &str {
        &self.tag
    }

    /// Classifies the tag by substring, checked in boolean/repeat/string/uint order.
    pub fn kind(&self) -> TypeKind {
        let lower = self.lower();
        if lower.contains("boolean") {
            TypeKind::Boolean
        } else if lower.contains("repeat") {
            TypeKind::Repeat
        } else if lower.contains("string") {
            TypeKind::String
        } else if lower.contains("uint") {
            TypeKind::Uint
        } else {
            TypeKind::Unknown
        }
    }

    /// Returns true for `PSEUDO_BOOLEAN` traits.
    pub fn is_pseudo_boolean(&self) -> bool {
        self.lower() == "pseudo_boolean"
    }
}

/// Operation policy of an admin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPolicy {
    /// `add`, `alter`, and `extract` are all meaningful.
    Full,
    /// Only `alter` and `extract`; profiles of this type are never "added".
    AlterExtract,
}

impl OperationPolicy {
    /// Returns true if the policy allows `op`.
    pub fn permits(self, op: Operation) -> bool {
        match self {
            Self::Full => true,
            Self::AlterExtract => op != Operation::Add,
        }
    }
}

/// A category of administrable entity, identified by its snake_case name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AdminType {
    name: String,
}

impl AdminType {
    /// Creates an admin type from a name such as `"group_connection"` or
    /// `"racf options"`; spaces are folded into underscores.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_lowercase().replace(' ', "_"),
        }
    }

    /// Snake-case name, e.g. `group_connection`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uppercase-underscore token used in key-map identifiers, e.g. `GROUP_CONNECTION`.
    pub fn token(&self) -> String {
        self.name.to_uppercase()
    }

    /// Short code naming this admin type's legacy support matrix.
    pub fn legacy_code(&self) -> String {
        match self.name.as_str() {
            "group_connection" => "gc".to_string(),
            "permission" => "perm".to_string(),
            "racf_options" => "s".to_string(),
            "resource" => "p".to_string(),
            other => other.chars().next().map(String::from).unwrap_or_default(),
        }
    }

    /// File name of the legacy support matrix, e.g. `u_admin.json`.
    pub fn legacy_file_name(&self) -> String {
        format!("{}_admin.json", self.legacy_code())
    }

    /// Which request operations this admin type distinguishes.
    pub fn policy(&self) -> OperationPolicy {
        match self.name.as_str() {
            "racf_options" | "permission" | "group_connection" => OperationPolicy::AlterExtract,
            _ => OperationPolicy::Full,
        }
    }

    /// System-wide options: every modifiable trait is alterable and extractable.
    pub fn is_options_like(&self) -> bool {
        self.name == "racf_options"
    }

    /// Permissions: every modifiable trait is alterable.
    pub fn is_permission_like(&self) -> bool {
        self.name == "permission"
    }

    /// lowerCamelCase prefix for generated definition names, e.g. `groupConnection`.
    pub fn camel_name(&self) -> String {
        crate::mapping::to_lower_camel_case(&self.name)
    }
}

impl fmt::Display for AdminType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One trait declaration as extracted from a key map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDecl {
    /// Lower-cased owning segment.
    pub segment: String,
    /// Qualified name as declared, e.g. `base:owner`.
    pub name: String,
    /// Schema property name; equals `name` unless the name is a wildcard.
    pub property_name: String,
    /// Administrative key, e.g. `owner`.
    pub key: String,
    /// Declared type tag.
    pub trait_type: TraitType,
    /// Declared operator flags.
    pub operators: OperatorSet,
}

impl TraitDecl {
    /// Returns true if the declared name contains the wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        self.name.contains(crate::extractor::WILDCARD_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_sort_lexically() {
        let ops: OperationSet = [Operation::Extract, Operation::Add, Operation::Alter]
            .into_iter()
            .collect();
        let labels: Vec<&str> = ops.iter().map(|op| op.label()).collect();
        assert_eq!(labels, vec!["add", "alter", "extract"]);
    }

    #[test]
    fn operator_set_only() {
        let set_only = OperatorSet::from_flags([true, false, false, false]);
        assert!(set_only.is_only(Operator::Set));
        assert!(!set_only.is_only(Operator::Delete));
        assert!(OperatorSet::default().is_empty());
        assert!(!OperatorSet::default().is_only(Operator::Set));
    }

    #[test]
    fn admin_type_naming() {
        let gc = AdminType::new("group connection");
        assert_eq!(gc.name(), "group_connection");
        assert_eq!(gc.token(), "GROUP_CONNECTION");
        assert_eq!(gc.legacy_file_name(), "gc_admin.json");
        assert_eq!(gc.camel_name(), "groupConnection");
        assert_eq!(gc.policy(), OperationPolicy::AlterExtract);

        let user = AdminType::new("user");
        assert_eq!(user.legacy_code(), "u");
        assert_eq!(user.policy(), OperationPolicy::Full);
        assert_eq!(AdminType::new("racf_options").legacy_code(), "s");
        assert_eq!(AdminType::new("resource").legacy_code(), "p");
        assert_eq!(AdminType::new("permission").legacy_code(), "perm");
    }

    #[test]
    fn type_kind_by_substring() {
        assert_eq!(TraitType::new("PSEUDO_BOOLEAN").kind(), TypeKind::Boolean);
        assert!(TraitType::new("PSEUDO_BOOLEAN").is_pseudo_boolean());
        assert_eq!(TraitType::new("REPEAT").kind(), TypeKind::Repeat);
        assert_eq!(TraitType::new("UINT").kind(), TypeKind::Uint);
        assert_eq!(TraitType::new("DATE").kind(), TypeKind::Unknown);
    }
}
