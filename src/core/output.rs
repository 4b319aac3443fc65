//! Plain `NAME=value` rendering of flattened entries.

use std::fmt::Write;

use crate::core::data::OutputEntry;

/// One `NAME=value` line per entry, in order, each terminated by a newline.
pub fn render_entries(entries: &[OutputEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{entry}");
    }
    out
}
