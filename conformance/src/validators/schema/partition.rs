//! Partition validator.
//!
//! Within one admin type, a trait name may appear in only one of the
//! add-only, alter-only, common, and extract-only definitions.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::defs::generated_defs;
use crate::report::ConformanceReport;

const CHECK: &str = "schema/partition";

/// Validates that no trait is listed in two categories of the same admin type.
pub fn validate(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    // (admin prefix, trait name) -> definitions listing it
    let mut seen: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    for def in generated_defs(doc) {
        let Some(properties) = def.properties() else {
            continue;
        };
        for name in properties.keys() {
            seen.entry((def.admin_prefix, name.as_str()))
                .or_default()
                .push(def.name);
        }
    }

    let overlaps: Vec<String> = seen
        .iter()
        .filter(|(_, defs)| defs.len() > 1)
        .map(|((_, name), defs)| format!("{name}: {}", defs.join(", ")))
        .collect();

    report.expect_none(
        CHECK,
        "Every trait appears in exactly one category",
        format!("{} traits appear in more than one category", overlaps.len()),
        overlaps,
    );
    report
}
