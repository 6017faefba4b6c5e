//! Generator configuration.
//!
//! Every path the generator touches, the directory driver's ignore list, and
//! the strictness switch live here, so nothing about the repository layout is
//! baked into the pipeline. Values can come from a TOML file:
//!
//! ```toml
//! key_map_dir = "sear/key_map"
//! legacy_dir = "dev_tools/old_json"
//! base_schema = "schemas/parameters.json"
//! output = "schemas/sear_schema.json"
//! fragments_dir = "dev_tools/schema"
//! ignore = ["key_map.cpp", "key_map.hpp", "key_map_structs.hpp"]
//! strict = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SchemaError};

/// Key-map files that are infrastructure rather than admin-type maps.
pub const DEFAULT_IGNORE: [&str; 3] = ["key_map.cpp", "key_map.hpp", "key_map_structs.hpp"];

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory holding `key_map_<admin_type>.hpp` sources.
    pub key_map_dir: PathBuf,
    /// Directory holding `<code>_admin.json` legacy support matrices.
    pub legacy_dir: PathBuf,
    /// Hand-maintained base schema merged under the generated definitions.
    pub base_schema: PathBuf,
    /// Where the master schema document is written.
    pub output: PathBuf,
    /// When set, each admin type's fragment is also written here as `<admin_type>.json`.
    pub fragments_dir: Option<PathBuf>,
    /// File names in `key_map_dir` to skip.
    pub ignore: Vec<String>,
    /// Fail on wrong extensions, unmapped types, missing matrix entries, and
    /// conflicting duplicate traits instead of warning.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            key_map_dir: PathBuf::from("sear/key_map"),
            legacy_dir: PathBuf::from("dev_tools/old_json"),
            base_schema: PathBuf::from("schemas/parameters.json"),
            output: PathBuf::from("schemas/sear_schema.json"),
            fragments_dir: None,
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            strict: true,
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML configuration; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SchemaError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// Returns true if `file_name` is on the ignore list.
    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == file_name)
    }
}
