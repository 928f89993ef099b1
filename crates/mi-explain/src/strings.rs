//! Localized string resources
//!
//! Templates are looked up by key and treated as opaque by the rest of the
//! pipeline; swapping the table swaps the language.

use ahash::AHashMap;
use once_cell::sync::Lazy;

use mi_core::RowId;

static STRINGS: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut table = AHashMap::new();
    table.insert("inspection.header", "Selected datapoints");
    table.insert("inspection.row_label", "Row {0}");
    table.insert("feature_list.header", "Feature List");
    table.insert("feature_list.search_placeholder", "Search");
    table.insert("feature_list.apply", "Apply");
    table
});

/// Look up a localized string by key; unknown keys fall back to the key
/// itself
pub fn localized<'a>(key: &'a str) -> &'a str {
    STRINGS.get(key).copied().unwrap_or(key)
}

/// Format a localized template with a single argument
pub fn format_string(key: &str, argument: &str) -> String {
    localized(key).replace("{0}", argument)
}

/// Display name for a row in the inspection grid
pub fn format_row_label(id: RowId) -> String {
    format_string("inspection.row_label", &id.to_string())
}
