//! Closure validator.
//!
//! Request categories reject unknown traits; extract-only definitions only
//! document read-only traits and stay open.

use serde_json::Value;

use crate::defs::generated_defs;
use crate::report::{ConformanceReport, TestResult};

const CHECK: &str = "schema/closure";

/// Validates `additionalProperties` on every generated definition.
pub fn validate(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let generated = generated_defs(doc);

    if generated.is_empty() {
        report.push(TestResult::warn(CHECK, "No generated trait definitions found"));
        return report;
    }

    let open: Vec<String> = generated
        .iter()
        .filter(|def| def.is_validated())
        .filter(|def| def.body.get("additionalProperties") != Some(&Value::Bool(false)))
        .map(|def| def.name.to_string())
        .collect();
    report.expect_none(
        CHECK,
        "All request categories set additionalProperties: false",
        format!("{} request categories accept unknown traits", open.len()),
        open,
    );

    let closed_extract: Vec<String> = generated
        .iter()
        .filter(|def| !def.is_validated())
        .filter(|def| def.body.get("additionalProperties").is_some())
        .map(|def| def.name.to_string())
        .collect();
    if closed_extract.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            "Extract-only definitions carry no additionalProperties restriction",
        ));
    } else {
        report.push(
            TestResult::warn(
                CHECK,
                format!(
                    "{} extract-only definitions restrict additionalProperties",
                    closed_extract.len()
                ),
            )
            .with_details(closed_extract),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use serde_json::json;

    #[test]
    fn closed_categories_pass() {
        let doc = json!({"$defs": {
            "userCommonTraits": {"properties": {}, "additionalProperties": false},
            "userExtractOnlyTraits": {"properties": {}}
        }});
        let report = validate(&doc);
        assert!(report.all_passed());
        assert_eq!(report.count(Severity::Warning), 0);
    }

    #[test]
    fn open_category_fails() {
        let doc = json!({"$defs": {"userAddOnlyTraits": {"properties": {}}}});
        assert!(!validate(&doc).all_passed());
    }

    #[test]
    fn closed_extract_only_warns() {
        let doc = json!({"$defs": {
            "userExtractOnlyTraits": {"properties": {}, "additionalProperties": false}
        }});
        let report = validate(&doc);
        assert!(report.all_passed());
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn empty_document_warns() {
        let report = validate(&json!({"$defs": {}}));
        assert_eq!(report.count(Severity::Warning), 1);
    }
}
