//! Wildcard validator.
//!
//! Wildcard trait families belong in `patternProperties`; a regex-shaped
//! name under the `properties` of a request category would only ever match
//! itself literally. Extract-only definitions never validate, so a read-only
//! wildcard family is documented there under its rewritten name.

use keymap_codegen::extractor::{PATTERN_PROPERTY_SUFFIX, WILDCARD_MARKER};
use regex::Regex;
use serde_json::Value;

use crate::defs::generated_defs;
use crate::report::ConformanceReport;

const CHECK: &str = "schema/wildcard";

fn is_wildcard_name(name: &str) -> bool {
    name.contains(WILDCARD_MARKER) || name.contains(PATTERN_PROPERTY_SUFFIX)
}

/// Validates wildcard isolation and that every pattern property compiles.
pub fn validate(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let mut misplaced = Vec::new();
    let mut invalid = Vec::new();
    for def in generated_defs(doc) {
        if let Some(properties) = def.properties().filter(|_| def.is_validated()) {
            misplaced.extend(
                properties
                    .keys()
                    .filter(|name| is_wildcard_name(name))
                    .map(|name| format!("{}.{name}", def.name)),
            );
        }
        if let Some(patterns) = def.pattern_properties() {
            for pattern in patterns.keys() {
                if let Err(e) = Regex::new(pattern) {
                    invalid.push(format!("{}: {pattern}: {e}", def.name));
                }
            }
        }
    }

    report.expect_none(
        CHECK,
        "No wildcard trait appears as a literal property",
        format!("{} wildcard traits listed as literal properties", misplaced.len()),
        misplaced,
    );
    report.expect_none(
        CHECK,
        "All pattern properties are valid regular expressions",
        format!("{} pattern properties do not compile", invalid.len()),
        invalid,
    );
    report
}
