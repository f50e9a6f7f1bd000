//! Envelope parsing: from a delivery-address header to a folder name.

/// Characters that bound an address's local part on the left.
const fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '<' | '>' | ':' | ',' | ';' | '"' | '(' | ')')
}

/// Derives the lower-cased folder name for a raw delivery-address header.
///
/// The name is the local part of the first address-like token: the text
/// right before an `@`, back to the nearest whitespace or address
/// delimiter. Without such a token the whole value is used, trimmed. An
/// empty or whitespace-only header gives an empty name.
///
/// ```
/// use mailsort_core::folder_name;
///
/// assert_eq!(folder_name("Alice Smith <Alice@Example.com>"), "alice");
/// assert_eq!(folder_name("postmaster"), "postmaster");
/// assert_eq!(folder_name("  "), "");
/// ```
#[must_use]
pub fn folder_name(raw: &str) -> String {
    local_part(raw).map_or_else(|| raw.trim().to_lowercase(), str::to_lowercase)
}

/// Finds the first non-empty local part preceding an `@`.
fn local_part(raw: &str) -> Option<&str> {
    raw.match_indices('@').find_map(|(at, _)| {
        let before = &raw[..at];
        let start = before
            .char_indices()
            .rev()
            .find(|&(_, c)| is_delimiter(c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        let local = &before[start..];
        (!local.is_empty()).then_some(local)
    })
}
