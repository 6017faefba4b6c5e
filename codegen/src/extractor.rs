//! Trait record extractor.
//!
//! A trait declaration inside a segment map looks like
//!
//! ```text
//! {"base:owner", "owner",
//!  TRAIT_TYPE_STRING, {true, false, false, false}},
//! ```
//!
//! The name/key pair and the type/flags pair may share a line or be split
//! across two. Declarations without an exact four-boolean tuple are skipped.

use regex::Regex;

use crate::model::{OperatorSet, TraitDecl, TraitType};

/// Marks a trait name as a family of traits.
pub const WILDCARD_MARKER: char = '*';

/// Replacement for [`WILDCARD_MARKER`]: one or more legal name characters, to end of string.
pub const PATTERN_PROPERTY_SUFFIX: &str = "[a-zA-Z0-9@#$]+$";

/// Rewrites a wildcard name into a pattern-property name.
///
/// `base:auditflags*` becomes `base:auditflags[a-zA-Z0-9@#$]+$`.
pub fn pattern_property_name(name: &str) -> String {
    name.replace(WILDCARD_MARKER, PATTERN_PROPERTY_SUFFIX)
}

fn trait_pattern(segment: &str) -> Option<Regex> {
    let pattern = format!(
        concat!(
            r#""({}:[a-z0-9_*]*)",[^\n]*"([a-z0-9_]*)",[ \t]*\n?"#,
            r#"[^\n]*?TRAIT_TYPE_([A-Z_]+),[^\n]*"#,
            r#"\{{(true|false),\s*(true|false),\s*(true|false),\s*(true|false)\}}"#,
        ),
        regex::escape(segment)
    );
    Regex::new(&pattern).ok()
}

/// Extracts every well-formed trait declaration of `segment` from `section`.
///
/// `segment` may be given in either case; names are matched lower-cased.
pub fn extract_traits(section: &str, segment: &str) -> Vec<TraitDecl> {
    let segment = segment.to_lowercase();
    let Some(re) = trait_pattern(&segment) else {
        return Vec::new();
    };

    re.captures_iter(section)
        .map(|caps| {
            let name = caps[1].to_string();
            let flags = [
                &caps[4] == "true",
                &caps[5] == "true",
                &caps[6] == "true",
                &caps[7] == "true",
            ];
            TraitDecl {
                segment: segment.clone(),
                property_name: pattern_property_name(&name),
                name,
                key: caps[2].to_string(),
                trait_type: TraitType::new(&caps[3]),
                operators: OperatorSet::from_flags(flags),
            }
        })
        .collect()
}
