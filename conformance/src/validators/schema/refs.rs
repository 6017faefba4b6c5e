//! Reference validator.
//!
//! Every trait entry points at a shared `traitType*` definition that the
//! base schema must provide. Unmapped types surface here as `N/A`.

use keymap_codegen::mapping::NOT_APPLICABLE;
use serde_json::{Map, Value};

use crate::defs::{defs, generated_defs};
use crate::report::ConformanceReport;

const CHECK: &str = "schema/refs";
const LOCAL_PREFIX: &str = "#/$defs/";

fn dangling(
    def_name: &str,
    entries: &Map<String, Value>,
    available: Option<&Map<String, Value>>,
) -> Vec<String> {
    entries
        .iter()
        .filter_map(|(name, entry)| {
            let target = entry.get("$ref")?.as_str()?;
            let resolves = target
                .strip_prefix(LOCAL_PREFIX)
                .is_some_and(|def| available.is_some_and(|defs| defs.contains_key(def)));
            (!resolves).then(|| format!("{def_name}.{name} -> {target}"))
        })
        .collect()
}

/// Validates that every trait `$ref` resolves inside the document.
pub fn validate(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let available = defs(doc);

    let mut unresolved = Vec::new();
    for def in generated_defs(doc) {
        for entries in [def.properties(), def.pattern_properties()].into_iter().flatten() {
            unresolved.extend(dangling(def.name, entries, available));
        }
    }

    let unmapped = unresolved
        .iter()
        .filter(|line| line.ends_with(NOT_APPLICABLE))
        .count();
    report.expect_none(
        CHECK,
        "All trait type references resolve",
        format!(
            "{} trait type references do not resolve ({unmapped} unmapped types)",
            unresolved.len()
        ),
        unresolved,
    );
    report
}
