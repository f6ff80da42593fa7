//! Shared helpers for parser tests: fixture loading, DOM-to-JSON
//! snapshots and token diffs.

use std::fmt::Write;

pub mod fixtures;
pub mod tree_json;

/// Differing lines listed at most this many times in a [`token_diff`].
const MAX_REPORTED: usize = 8;

/// Line-by-line report of two formatted token streams.
///
/// Each differing index is printed as a `-` (expected) and `+` (actual)
/// pair; `<none>` stands in for a missing line. Returns an empty string when
/// the streams are equal.
pub fn token_diff(expected: &[String], actual: &[String]) -> String {
    let mut out = String::new();
    let differing: Vec<usize> = (0..expected.len().max(actual.len()))
        .filter(|&i| expected.get(i) != actual.get(i))
        .collect();
    if differing.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "{} differing token(s); expected {} tokens, got {}",
        differing.len(),
        expected.len(),
        actual.len()
    );
    for &i in differing.iter().take(MAX_REPORTED) {
        let _ = writeln!(out, "  #{i} - {}", expected.get(i).map_or("<none>", String::as_str));
        let _ = writeln!(out, "  #{i} + {}", actual.get(i).map_or("<none>", String::as_str));
    }
    if differing.len() > MAX_REPORTED {
        let _ = writeln!(out, "  ... {} more", differing.len() - MAX_REPORTED);
    }
    out
}
