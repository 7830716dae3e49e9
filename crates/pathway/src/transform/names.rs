//! Full-name decomposition.

/// Split a full name into first name and last name.
///
/// The first whitespace-separated token is the first name; the remaining
/// tokens joined by single spaces form the last name. Returns `None` for a
/// blank name.
pub fn split_name(full: &str) -> Option<(String, String)> {
    let mut tokens = full.split_whitespace();
    let first = tokens.next()?.to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    Some((first, last))
}
