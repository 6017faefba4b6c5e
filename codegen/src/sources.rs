//! Key-map source discovery.
//!
//! The admin type of a key map is encoded in its file name:
//! `key_map_group_connection.hpp` describes `group_connection`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::model::AdminType;

/// File-name prefix shared by all admin-type key maps.
pub const KEY_MAP_PREFIX: &str = "key_map_";

/// One admin type's key-map source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapSource {
    /// Admin type derived from the file name.
    pub admin_type: AdminType,
    /// Path to the source.
    pub path: PathBuf,
}

/// Derives the admin type from a key-map file name.
///
/// Returns `None` when the name does not start with [`KEY_MAP_PREFIX`].
pub fn admin_type_from_file_name(file_name: &str) -> Option<AdminType> {
    let rest = file_name.strip_prefix(KEY_MAP_PREFIX)?;
    let name = rest.split('.').next().filter(|n| !n.is_empty())?;
    Some(AdminType::new(name))
}

/// Lists the key-map sources directly inside `config.key_map_dir`, sorted by
/// file name, skipping the ignore list and files that are not key maps.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover_sources(config: &GeneratorConfig) -> Result<Vec<KeyMapSource>> {
    let dir: &Path = &config.key_map_dir;
    let mut sources = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if config.is_ignored(&file_name) {
            tracing::debug!(file = %file_name, "Skipping ignored key map");
            continue;
        }
        match admin_type_from_file_name(&file_name) {
            Some(admin_type) => sources.push(KeyMapSource {
                admin_type,
                path: entry.path().to_path_buf(),
            }),
            None => tracing::debug!(file = %file_name, "Skipping non key-map file"),
        }
    }

    Ok(sources)
}
