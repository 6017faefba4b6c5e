//! Key-map → JSON Schema mapping tables.
//!
//! Deterministic mappings from a trait's type tag and operator flags to the
//! shared `traitType*` definitions of the base schema, plus the naming helpers
//! used for generated definition names.

use crate::model::{Operator, OperatorSet, TraitType, TypeKind};

/// Marker used where no schema reference or operator label applies.
pub const NOT_APPLICABLE: &str = "N/A";

/// A shared trait-type definition of the base schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRef {
    /// Boolean that can only be deleted.
    DelOnlyBoolean,
    /// Boolean that can only be set.
    SetOnlyBoolean,
    /// Boolean.
    Boolean,
    /// List with every operator.
    List,
    /// List supporting only add/remove.
    AddRemoveList,
    /// List without delete.
    NoDeleteList,
    /// List without remove.
    NoRemoveList,
    /// List without add.
    NoAddList,
    /// String that can only be set.
    SetOnlyString,
    /// String.
    String,
    /// Unsigned integer that can only be set.
    SetOnlyUint,
    /// Unsigned integer.
    Uint,
    /// The type tag matches no known category.
    Unresolved,
}

impl SchemaRef {
    /// Name of the definition under the base schema's `$defs`.
    pub fn def_name(self) -> Option<&'static str> {
        let name = match self {
            Self::DelOnlyBoolean => "traitTypeDelOnlyBoolean",
            Self::SetOnlyBoolean => "traitTypeSetOnlyBoolean",
            Self::Boolean => "traitTypeBoolean",
            Self::List => "traitTypeList",
            Self::AddRemoveList => "traitTypeAddRemoveList",
            Self::NoDeleteList => "traitTypeNoDeleteList",
            Self::NoRemoveList => "traitTypeNoRemoveList",
            Self::NoAddList => "traitTypeNoAddList",
            Self::SetOnlyString => "traitTypeSetOnlyString",
            Self::String => "traitTypeString",
            Self::SetOnlyUint => "traitTypeSetOnlyUint",
            Self::Uint => "traitTypeUint",
            Self::Unresolved => return None,
        };
        Some(name)
    }

    /// The `$ref` value, or [`NOT_APPLICABLE`] for [`SchemaRef::Unresolved`].
    pub fn reference(self) -> String {
        match self.def_name() {
            Some(name) => format!("#/$defs/{name}"),
            None => NOT_APPLICABLE.to_string(),
        }
    }
}

/// Maps a type tag and operator flags to a shared trait-type definition.
pub fn map_schema_type(trait_type: &TraitType, ops: &OperatorSet) -> SchemaRef {
    match trait_type.kind() {
        TypeKind::Boolean => {
            if ops.is_only(Operator::Delete) {
                SchemaRef::DelOnlyBoolean
            } else if ops.is_only(Operator::Set) {
                SchemaRef::SetOnlyBoolean
            } else {
                SchemaRef::Boolean
            }
        }
        TypeKind::Repeat => SchemaRef::List,
        TypeKind::String => map_string(ops),
        TypeKind::Uint => {
            if ops.is_only(Operator::Set) {
                SchemaRef::SetOnlyUint
            } else {
                SchemaRef::Uint
            }
        }
        TypeKind::Unknown => SchemaRef::Unresolved,
    }
}

fn map_string(ops: &OperatorSet) -> SchemaRef {
    if !(ops.add || ops.remove) {
        return if ops.is_only(Operator::Set) {
            SchemaRef::SetOnlyString
        } else {
            SchemaRef::String
        };
    }
    if !ops.set {
        SchemaRef::AddRemoveList
    } else if !ops.delete {
        SchemaRef::NoDeleteList
    } else if !ops.remove {
        SchemaRef::NoRemoveList
    } else if !ops.add {
        SchemaRef::NoAddList
    } else {
        SchemaRef::List
    }
}

/// Audit code for a trait: lower-case tag followed by its operator labels.
///
/// Each label is quoted and wrapped in backticks, so `STRING` with
/// `{set, delete}` gives ``string`"set"``"delete"` ``; a trait with no
/// operators gives `stringN/A`.
pub fn operator_code(trait_type: &TraitType, ops: &OperatorSet) -> String {
    let mut code = trait_type.lower();
    if ops.is_empty() {
        code.push_str(NOT_APPLICABLE);
    }
    for op in ops.operators() {
        code.push_str("`\"");
        code.push_str(op.label());
        code.push_str("\"`");
    }
    code
}

/// Converts a snake_case name to PascalCase: `group_connection` → `GroupConnection`.
pub fn to_camel_case(s: &str) -> String {
    s.to_lowercase()
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Converts a snake_case name to lowerCamelCase: `group_connection` → `groupConnection`.
pub fn to_lower_camel_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(flags: [bool; 4]) -> OperatorSet {
        OperatorSet::from_flags(flags)
    }

    #[test]
    fn boolean_mappings() {
        let t = TraitType::new("BOOLEAN");
        assert_eq!(map_schema_type(&t, &ops([false, false, false, true])), SchemaRef::DelOnlyBoolean);
        assert_eq!(map_schema_type(&t, &ops([true, false, false, false])), SchemaRef::SetOnlyBoolean);
        assert_eq!(map_schema_type(&t, &ops([true, false, false, true])), SchemaRef::Boolean);
        let pseudo = TraitType::new("PSEUDO_BOOLEAN");
        assert_eq!(map_schema_type(&pseudo, &ops([true, false, false, false])), SchemaRef::SetOnlyBoolean);
    }

    #[test]
    fn repeat_is_always_list() {
        let t = TraitType::new("REPEAT");
        assert_eq!(map_schema_type(&t, &ops([false, false, false, false])), SchemaRef::List);
        assert_eq!(map_schema_type(&t, &ops([true, true, true, true])), SchemaRef::List);
    }

    #[test]
    fn string_list_mappings() {
        let t = TraitType::new("STRING");
        assert_eq!(map_schema_type(&t, &ops([false, true, true, false])), SchemaRef::AddRemoveList);
        assert_eq!(map_schema_type(&t, &ops([false, false, true, true])), SchemaRef::AddRemoveList);
        assert_eq!(map_schema_type(&t, &ops([true, true, true, false])), SchemaRef::NoDeleteList);
        assert_eq!(map_schema_type(&t, &ops([true, true, false, true])), SchemaRef::NoRemoveList);
        assert_eq!(map_schema_type(&t, &ops([true, false, true, true])), SchemaRef::NoAddList);
        assert_eq!(map_schema_type(&t, &ops([true, true, true, true])), SchemaRef::List);
    }

    #[test]
    fn string_scalar_mappings() {
        let t = TraitType::new("STRING");
        assert_eq!(map_schema_type(&t, &ops([true, false, false, false])), SchemaRef::SetOnlyString);
        assert_eq!(map_schema_type(&t, &ops([true, false, false, true])), SchemaRef::String);
        assert_eq!(map_schema_type(&t, &ops([false, false, false, false])), SchemaRef::String);
    }

    #[test]
    fn uint_mappings() {
        let t = TraitType::new("UINT");
        assert_eq!(map_schema_type(&t, &ops([true, false, false, false])), SchemaRef::SetOnlyUint);
        assert_eq!(map_schema_type(&t, &ops([true, false, false, true])), SchemaRef::Uint);
    }

    #[test]
    fn unknown_tags_are_unresolved() {
        let t = TraitType::new("DATE");
        let mapped = map_schema_type(&t, &ops([true, false, false, false]));
        assert_eq!(mapped, SchemaRef::Unresolved);
        assert_eq!(mapped.reference(), NOT_APPLICABLE);
    }

    #[test]
    fn references_point_into_defs() {
        assert_eq!(
            SchemaRef::SetOnlyString.reference(),
            "#/$defs/traitTypeSetOnlyString"
        );
    }

    #[test]
    fn operator_codes() {
        let t = TraitType::new("STRING");
        assert_eq!(operator_code(&t, &ops([true, false, false, true])), r#"string`"set"``"delete"`"#);
        assert_eq!(operator_code(&t, &ops([false; 4])), "stringN/A");
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel_case("group_connection"), "GroupConnection");
        assert_eq!(to_lower_camel_case("group_connection"), "groupConnection");
        assert_eq!(to_lower_camel_case("racf_options"), "racfOptions");
        assert_eq!(to_lower_camel_case("user"), "user");
        assert_eq!(to_lower_camel_case("USER"), "user");
    }
}
