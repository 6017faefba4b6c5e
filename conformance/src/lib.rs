//! Key-map schema conformance suite.
//!
//! Checks a generated master schema document for the properties request
//! validation relies on.
//!
//! # Conformance Scope
//!
//! | Check | Requirement |
//! |-------|-------------|
//! | `schema/partition` | A trait appears in one category per admin type |
//! | `schema/operator-code` | No literal property keeps its operator code |
//! | `schema/wildcard` | Wildcard traits only as compilable pattern properties |
//! | `schema/closure` | Request categories are closed, extract-only stays open |
//! | `schema/refs` | Every trait type reference resolves |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use keymap_conformance::run_all;
//!
//! let report = run_all(Path::new("schemas/sear_schema.json")).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod defs;
pub mod report;
pub mod validators;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs every check against an in-memory document.
///
/// Checks run in this order:
/// 1. Partition
/// 2. Operator-code stripping
/// 3. Wildcard isolation
/// 4. Closure
/// 5. Reference resolution
pub fn validate_document(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.extend(validators::schema::partition::validate(doc));
    report.extend(validators::schema::operator_code::validate(doc));
    report.extend(validators::schema::wildcard::validate(doc));
    report.extend(validators::schema::closure::validate(doc));
    report.extend(validators::schema::refs::validate(doc));
    report
}

/// Reads the master schema at `schema` and runs every check.
///
/// # Errors
///
/// Returns an error only if the file cannot be read or is not JSON.
pub fn run_all(schema: &Path) -> Result<ConformanceReport> {
    let content = std::fs::read_to_string(schema)
        .with_context(|| format!("Failed to read {}", schema.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", schema.display()))?;
    tracing::debug!(path = %schema.display(), "Checking master schema");
    Ok(validate_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keymap_codegen::assemble::{bucket_for, TraitEntry};
    use keymap_codegen::extractor::extract_traits;
    use keymap_codegen::merge::{aggregate, merge_shallow};
    use keymap_codegen::model::{Operation, OperationSet};
    use keymap_codegen::{AdminType, SchemaFragment};
    use serde_json::json;

    const SOURCE: &str = r#"{"base:owner", "owner",
     TRAIT_TYPE_STRING, {true, false, false, false}},
    {"base:last_logon", "lastlogon",
     TRAIT_TYPE_STRING, {false, false, false, false}},
    {"base:auditflags*", "audit",
     TRAIT_TYPE_BOOLEAN, {true, false, false, true}},
    {"base:logonhours*", "logonhours",
     TRAIT_TYPE_STRING, {false, false, false, false}},"#;

    fn generated_document() -> Value {
        let user = AdminType::new("user");
        let mut fragment = SchemaFragment::new(user.clone());
        let alter: OperationSet = [Operation::Alter, Operation::Extract].into_iter().collect();
        let extract: OperationSet = [Operation::Extract].into_iter().collect();
        for decl in extract_traits(SOURCE, "base") {
            let ops = if decl.operators.is_empty() { &extract } else { &alter };
            let bucket = bucket_for(&decl, ops, user.policy());
            fragment.insert(bucket, &decl.property_name, TraitEntry::new(&decl, bucket));
        }
        let base = json!({"$defs": {
            "traitTypeSetOnlyString": {},
            "traitTypeString": {},
            "traitTypeBoolean": {}
        }});
        merge_shallow(base, aggregate(&[fragment]).into_document())
    }

    #[test]
    fn generated_document_conforms() {
        let report = validate_document(&generated_document());
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "Conformance failures: {:#?}", failures);
        assert_eq!(report.count(Severity::Warning), 0);
    }

    #[test]
    fn read_only_wildcard_is_extract_only() {
        let doc = generated_document();
        let extract = &doc["$defs"]["userExtractOnlyTraits"]["properties"];
        assert!(extract.get("base:logonhours[a-zA-Z0-9@#$]+$").is_some());
        assert!(validators::schema::wildcard::validate(&doc).all_passed());
    }

    #[test]
    fn missing_base_definitions_fail_refs() {
        let mut doc = generated_document();
        if let Some(defs) = doc.get_mut("$defs").and_then(Value::as_object_mut) {
            defs.remove("traitTypeSetOnlyString");
        }
        let report = validate_document(&doc);
        assert_eq!(report.count(Severity::Failure), 1);
    }
}
