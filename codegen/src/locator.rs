//! Segment locator.
//!
//! Finds segment names in the declaration section of a key map. A segment is
//! announced by an identifier of the form
//! `<ADMIN_TYPE>_<SEGMENT>_SEGMENT_MAP` or `<ADMIN_TYPE>_<SEGMENT>_KEY_MAP`.

use regex::Regex;

use crate::model::AdminType;

/// Everything from this marker onward is the segment table, not declarations.
pub const SECTION_TERMINATOR: &str = "segment_key_mapping_t";

/// Returns the declaration section: the text before the first [`SECTION_TERMINATOR`].
pub fn declaration_section(source: &str) -> &str {
    source.split(SECTION_TERMINATOR).next().unwrap_or(source)
}

/// Returns the segment names declared for `admin_type`, in encounter order.
///
/// Duplicates are preserved: each match yields one entry. Names ending in
/// `SEGMENT` are the segment-table identifiers themselves and are skipped.
pub fn locate_segments(section: &str, admin_type: &AdminType) -> Vec<String> {
    let pattern = format!(
        r"\b{}_([A-Z]*)_(?:SEGMENT|KEY)_MAP",
        regex::escape(&admin_type.token())
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.captures_iter(section)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.ends_with("SEGMENT"))
        .map(str::to_string)
        .collect()
}
