//! Catalog search helpers and pagination bounds.

/// Maximum page size a caller may request when paginating the catalog.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Trim a free-text search term; blank input means "no search".
pub fn normalize_search(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

/// Build a `%term%` pattern for `ILIKE ... ESCAPE '\'`.
///
/// `%`, `_` and `\` in user input are escaped so they match literally.
///
/// ```
/// use archive_core::search::like_pattern;
/// assert_eq!(like_pattern("iot"), "%iot%");
/// assert_eq!(like_pattern("100%"), "%100\\%%");
/// ```
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Clamp an optional page size. `None` stays `None` (unbounded listing).
pub fn clamp_optional_limit(limit: Option<i64>, max: i64) -> Option<i64> {
    limit.map(|l| l.clamp(1, max))
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
