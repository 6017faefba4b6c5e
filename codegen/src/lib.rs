//! Key-map trait schema generator.
//!
//! Reads the `key_map_<admin_type>.hpp` headers that declare every
//! administrative trait, consults each admin type's legacy support matrix,
//! and produces the JSON Schema `$defs` that request validation uses: one
//! closed object per admin type and request category (add-only, alter-only,
//! common), plus open documentation-only objects for extract-only traits.
//!
//! # Pipeline
//!
//! 1. [`locator`] finds the segments of an admin type.
//! 2. [`extractor`] pulls each segment's trait declarations.
//! 3. [`legacy`] and [`classify`] decide which request operations a trait supports.
//! 4. [`mapping`] picks the shared trait-type definition.
//! 5. [`assemble`] buckets traits into a [`SchemaFragment`].
//! 6. [`merge`] turns fragments into `$defs` and unions them with the base schema.
//!
//! # Entry Point
//!
//! ```no_run
//! use keymap_codegen::{generate, GeneratorConfig};
//!
//! let report = generate(&GeneratorConfig::default()).expect("Schema generation failed");
//! println!("{} definitions", report.definition_count);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod assemble;
pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod extractor;
pub mod legacy;
pub mod locator;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod sources;

use std::collections::BTreeSet;

use anyhow::Context;
use serde_json::Value;

pub use assemble::{Bucket, SchemaFragment};
pub use config::GeneratorConfig;
pub use error::SchemaError;
pub use legacy::{JsonSupportMatrix, StaticSupportMatrix, SupportMatrix};
pub use model::AdminType;

use assemble::{bucket_for, InsertOutcome, TraitEntry};
use classify::{classify, Classification};
use legacy::ResolverPolicy;
use mapping::SchemaRef;
use merge::{aggregate, merge_shallow, DEFS_KEY};
use model::OperationSet;

/// Per-admin-type line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminTypeSummary {
    /// Admin type name.
    pub admin_type: String,
    /// Segment matches processed (duplicates included).
    pub segment_count: usize,
    /// Distinct traits placed in the fragment.
    pub trait_count: usize,
}

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// One entry per admin type, in processing order.
    pub admin_types: Vec<AdminTypeSummary>,
    /// Number of generated `$defs` entries.
    pub definition_count: usize,
    /// Unique operator codes of validated traits.
    pub operator_codes: BTreeSet<String>,
    /// Files written.
    pub files: Vec<String>,
}

/// Builds one admin type's fragment from its key-map source text.
///
/// In strict mode a missing legacy entry, an unmappable type tag, or two
/// differing declarations of one trait name abort the fragment; otherwise
/// each is logged and processing continues.
///
/// # Errors
///
/// Returns [`SchemaError::MissingLegacyEntry`], [`SchemaError::UnresolvedType`],
/// or [`SchemaError::TraitCollision`] in strict mode.
pub fn generate_fragment(
    admin_type: &AdminType,
    source: &str,
    matrix: &dyn SupportMatrix,
    strict: bool,
) -> error::Result<(SchemaFragment, usize)> {
    let section = locator::declaration_section(source);
    let segments = locator::locate_segments(section, admin_type);
    if segments.is_empty() {
        tracing::warn!(admin_type = %admin_type, "No segments declared");
    }

    let policy = ResolverPolicy::from(admin_type);
    let mut fragment = SchemaFragment::new(admin_type.clone());

    for segment in &segments {
        let traits = extractor::extract_traits(section, segment);
        if traits.is_empty() {
            tracing::warn!(admin_type = %admin_type, segment = %segment, "Segment declares no traits");
        }
        for decl in traits {
            let supported = match classify(&decl, &policy, matrix)? {
                Classification::Supported(ops) => ops,
                Classification::Unknown if strict => {
                    return Err(SchemaError::MissingLegacyEntry {
                        admin_type: admin_type.name().to_string(),
                        segment: decl.segment.clone(),
                        key: decl.key.to_lowercase(),
                    });
                }
                Classification::Unknown => {
                    tracing::warn!(trait_name = %decl.name, "No legacy support entry; no operations assumed");
                    OperationSet::new()
                }
            };

            let bucket = bucket_for(&decl, &supported, admin_type.policy());
            let entry = TraitEntry::new(&decl, bucket);
            if entry.schema_ref == SchemaRef::Unresolved {
                if strict {
                    return Err(SchemaError::UnresolvedType {
                        trait_name: decl.name.clone(),
                        type_tag: decl.trait_type.raw().to_string(),
                    });
                }
                tracing::warn!(trait_name = %decl.name, type_tag = decl.trait_type.raw(), "Unresolved trait type");
            }

            match fragment.insert(bucket, &decl.property_name, entry) {
                InsertOutcome::Inserted => {}
                InsertOutcome::Duplicate => {
                    tracing::debug!(trait_name = %decl.name, "Repeated declaration ignored");
                }
                InsertOutcome::Conflict { existing } => {
                    if strict {
                        return Err(SchemaError::TraitCollision {
                            admin_type: admin_type.name().to_string(),
                            trait_name: decl.name.clone(),
                        });
                    }
                    tracing::warn!(
                        trait_name = %decl.name,
                        kept = %existing,
                        "Conflicting declaration ignored; first one kept"
                    );
                }
            }
        }
    }

    if fragment.trait_count() == 0 {
        tracing::warn!(admin_type = %admin_type, "Empty schema fragment");
    }
    Ok((fragment, segments.len()))
}

/// Checks that `path` has extension `expected`, failing in strict mode and
/// warning otherwise.
fn require_extension(path: &std::path::Path, expected: &'static str, strict: bool) -> anyhow::Result<()> {
    match emit::check_extension(path, expected) {
        Ok(()) => Ok(()),
        Err(e) if strict => Err(e.into()),
        Err(e) => {
            tracing::warn!("{e}");
            Ok(())
        }
    }
}

/// Loads the base schema, which must be a JSON object whose `$defs`, if
/// present, is an object too.
fn load_base_schema(config: &GeneratorConfig) -> anyhow::Result<Value> {
    let path = &config.base_schema;
    let base = emit::read_json(path)?;
    let defs_ok = base
        .get(DEFS_KEY)
        .map(Value::is_object)
        .unwrap_or(true);
    if !base.is_object() || !defs_ok {
        return Err(SchemaError::BaseSchema {
            path: path.clone(),
            message: format!("expected an object with an object-valued {DEFS_KEY}"),
        }
        .into());
    }
    Ok(base)
}

/// Runs the whole pipeline described by `config` and writes the master schema.
///
/// Admin types are processed one at a time in file-name order.
///
/// # Errors
///
/// Returns an error if a source, matrix, or the base schema cannot be read,
/// if the output cannot be written, or on any strict-mode violation.
pub fn generate(config: &GeneratorConfig) -> anyhow::Result<GenerationReport> {
    let mut report = GenerationReport::default();
    require_extension(&config.output, "json", config.strict)?;

    let sources = sources::discover_sources(config)?;
    if sources.is_empty() {
        tracing::warn!(dir = %config.key_map_dir.display(), "No key-map sources found");
    }

    let mut fragments = Vec::with_capacity(sources.len());
    for source in &sources {
        let admin_type = &source.admin_type;
        require_extension(&source.path, "hpp", config.strict)?;
        tracing::info!(admin_type = %admin_type, path = %source.path.display(), "Converting key map");

        let matrix_path = config.legacy_dir.join(admin_type.legacy_file_name());
        let matrix = JsonSupportMatrix::load(admin_type, &matrix_path)
            .with_context(|| format!("Failed to load legacy matrix for {admin_type}"))?;
        let text = std::fs::read_to_string(&source.path)
            .with_context(|| format!("Failed to read {}", source.path.display()))?;

        let (fragment, segment_count) = generate_fragment(admin_type, &text, &matrix, config.strict)
            .with_context(|| format!("Failed to convert {}", source.path.display()))?;

        if let Some(dir) = &config.fragments_dir {
            let path = dir.join(format!("{}.json", admin_type.name()));
            emit::write_json(&path, &fragment.to_json())?;
            report.files.push(path.display().to_string());
        }

        report.admin_types.push(AdminTypeSummary {
            admin_type: admin_type.name().to_string(),
            segment_count,
            trait_count: fragment.trait_count(),
        });
        fragments.push(fragment);
    }

    let mut aggregate = aggregate(&fragments);
    report.definition_count = aggregate.defs.len();
    report.operator_codes = std::mem::take(&mut aggregate.operator_codes);

    let base = load_base_schema(config)?;
    let master = merge_shallow(base, aggregate.into_document());
    emit::write_json(&config.output, &master)?;
    report.files.push(config.output.display().to_string());
    tracing::info!(
        definitions = report.definition_count,
        output = %config.output.display(),
        "Wrote master schema"
    );

    Ok(report)
}
