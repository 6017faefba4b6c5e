//! Error types for the schema generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning key-map sources into schema definitions.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or serialized.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// The document being processed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The generator configuration file is invalid.
    #[error("Invalid configuration {path}: {message}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// The legacy support matrix is not shaped as `segment -> key -> flags`,
    /// or one of its flag records is mistyped.
    #[error("Malformed legacy support matrix for {admin_type}: {message}")]
    LegacyMatrix {
        /// Admin type the matrix belongs to.
        admin_type: String,
        /// What was wrong with it.
        message: String,
    },

    /// A declared trait has no entry in the legacy support matrix.
    #[error("No legacy support entry for {segment}:{key} ({admin_type})")]
    MissingLegacyEntry {
        /// Admin type being processed.
        admin_type: String,
        /// Lower-cased segment name.
        segment: String,
        /// Lower-cased administrative key.
        key: String,
    },

    /// A path does not carry the extension its role requires.
    #[error("Expected a .{expected} file, got {path}")]
    UnexpectedExtension {
        /// The offending path.
        path: PathBuf,
        /// The required extension, without the dot.
        expected: &'static str,
    },

    /// A trait's type tag matches none of the known schema types.
    #[error("Trait {trait_name} has unresolvable type tag {type_tag}")]
    UnresolvedType {
        /// Trait name as declared.
        trait_name: String,
        /// The raw type tag.
        type_tag: String,
    },

    /// The same trait name was declared twice with different shapes.
    #[error("Conflicting declarations for trait {trait_name} in {admin_type}")]
    TraitCollision {
        /// Admin type being processed.
        admin_type: String,
        /// The colliding trait name.
        trait_name: String,
    },

    /// The base schema document is not a JSON object with a `$defs` object.
    #[error("Invalid base schema {path}: {message}")]
    BaseSchema {
        /// The base schema file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;
