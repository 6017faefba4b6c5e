//! Operation classifier.

use crate::error::Result;
use crate::legacy::{resolve, ResolverPolicy, SupportMatrix};
use crate::model::{Operation, OperationSet, TraitDecl};

/// Outcome of classifying one trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The supported request operations.
    Supported(OperationSet),
    /// The trait is modifiable but the matrix has no record of it.
    Unknown,
}

/// Determines which request operations a trait supports.
///
/// A trait with no declaration flags is read-only: it is extract-only no
/// matter what the matrix says, and the matrix is not consulted. Otherwise the
/// matrix records for `(segment, key)` decide.
///
/// # Errors
///
/// Returns an error if the matrix holds a malformed record for the trait.
pub fn classify(
    decl: &TraitDecl,
    policy: &ResolverPolicy,
    matrix: &dyn SupportMatrix,
) -> Result<Classification> {
    if decl.operators.is_empty() {
        return Ok(Classification::Supported(
            [Operation::Extract].into_iter().collect(),
        ));
    }
    let classification = match matrix.entries(&decl.segment, &decl.key.to_lowercase())? {
        Some(entries) => Classification::Supported(resolve(&entries, policy)),
        None => Classification::Unknown,
    };
    Ok(classification)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::legacy::{StaticSupportMatrix, SupportEntry};
    use crate::model::{AdminType, OperatorSet, TraitType};

    fn decl(key: &str, flags: [bool; 4]) -> TraitDecl {
        TraitDecl {
            segment: "base".to_string(),
            name: format!("base:{key}"),
            property_name: format!("base:{key}"),
            key: key.to_string(),
            trait_type: TraitType::new("STRING"),
            operators: OperatorSet::from_flags(flags),
        }
    }

    fn all_supported() -> SupportEntry {
        SupportEntry {
            add: true,
            alt: true,
            extract: true,
        }
    }

    #[test]
    fn read_only_traits_are_forced_extract_only() {
        let matrix = StaticSupportMatrix::new().with("base", "lastlogon", all_supported());
        let policy = ResolverPolicy::from(&AdminType::new("user"));
        let result = classify(&decl("lastlogon", [false; 4]), &policy, &matrix).unwrap();
        assert_eq!(
            result,
            Classification::Supported([Operation::Extract].into_iter().collect())
        );
    }

    #[test]
    fn read_only_traits_need_no_matrix_entry() {
        let matrix = StaticSupportMatrix::new();
        let policy = ResolverPolicy::from(&AdminType::new("user"));
        let result = classify(&decl("lastlogon", [false; 4]), &policy, &matrix).unwrap();
        assert!(matches!(result, Classification::Supported(_)));
    }

    #[test]
    fn modifiable_traits_follow_matrix() {
        let matrix = StaticSupportMatrix::new().with("base", "owner", all_supported());
        let policy = ResolverPolicy::from(&AdminType::new("user"));
        let result = classify(&decl("owner", [true, false, false, false]), &policy, &matrix).unwrap();
        let expected: OperationSet = [Operation::Add, Operation::Alter, Operation::Extract]
            .into_iter()
            .collect();
        assert_eq!(result, Classification::Supported(expected));
    }

    #[test]
    fn missing_matrix_entry_is_unknown() {
        let matrix = StaticSupportMatrix::new();
        let policy = ResolverPolicy::from(&AdminType::new("user"));
        let result = classify(&decl("owner", [true, false, false, false]), &policy, &matrix).unwrap();
        assert_eq!(result, Classification::Unknown);
    }

    #[test]
    fn options_like_gains_alter_and_extract() {
        let matrix = StaticSupportMatrix::new().with("base", "owner", SupportEntry::default());
        let policy = ResolverPolicy::from(&AdminType::new("racf_options"));
        let result = classify(&decl("owner", [true, false, false, true]), &policy, &matrix).unwrap();
        let expected: OperationSet = [Operation::Alter, Operation::Extract].into_iter().collect();
        assert_eq!(result, Classification::Supported(expected));
    }
}
