//! Operator-code validator.
//!
//! Operator codes are an audit aid of the generator and must not leak into
//! literal trait properties.

use keymap_codegen::assemble::OPERATOR_CODE_KEY;
use serde_json::Value;

use crate::defs::generated_defs;
use crate::report::ConformanceReport;

const CHECK: &str = "schema/operator-code";

/// Validates that no entry under `properties` carries an operator code.
pub fn validate(doc: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let mut leaked = Vec::new();
    for def in generated_defs(doc) {
        let Some(properties) = def.properties() else {
            continue;
        };
        for (name, entry) in properties {
            if entry.get(OPERATOR_CODE_KEY).is_some() {
                leaked.push(format!("{}.{name}", def.name));
            }
        }
    }

    report.expect_none(
        CHECK,
        "No trait property retains an operator code",
        format!("{} trait properties retain an operator code", leaked.len()),
        leaked,
    );
    report
}
