//! Index of the generated trait definitions inside a master schema.

use keymap_codegen::merge::DEFS_KEY;
use keymap_codegen::Bucket;
use serde_json::{Map, Value};

/// One generated `<adminType><Bucket>` definition.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedDef<'a> {
    /// Full definition name, e.g. `userAlterOnlyTraits`.
    pub name: &'a str,
    /// Admin-type prefix, e.g. `user`.
    pub admin_prefix: &'a str,
    /// Category the definition holds.
    pub bucket: Bucket,
    /// The definition object.
    pub body: &'a Value,
}

impl<'a> GeneratedDef<'a> {
    /// The definition's `properties`, if it has any.
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.body.get("properties").and_then(Value::as_object)
    }

    /// The definition's `patternProperties`, if it has any.
    pub fn pattern_properties(&self) -> Option<&'a Map<String, Value>> {
        self.body.get("patternProperties").and_then(Value::as_object)
    }

    /// Returns true for the closed request categories (add-only, alter-only, common).
    pub fn is_validated(&self) -> bool {
        self.bucket != Bucket::ExtractOnly
    }
}

/// Returns the document's `$defs` object, if present.
pub fn defs(doc: &Value) -> Option<&Map<String, Value>> {
    doc.get(DEFS_KEY).and_then(Value::as_object)
}

/// Lists every definition whose name ends in a generated bucket suffix.
///
/// Shared definitions such as `traitTypeString` are not included.
pub fn generated_defs(doc: &Value) -> Vec<GeneratedDef<'_>> {
    let Some(defs) = defs(doc) else {
        return Vec::new();
    };
    defs.iter()
        .filter_map(|(name, body)| {
            Bucket::ALL.iter().find_map(move |&bucket| {
                let suffix = bucket.def_suffix()?;
                let admin_prefix = name.strip_suffix(suffix).filter(|p| !p.is_empty())?;
                Some(GeneratedDef {
                    name,
                    admin_prefix,
                    bucket,
                    body,
                })
            })
        })
        .collect()
}
