//! Tracked-universe parsing.

/// Resolves the configured comma-separated ticker list into the tracked set.
///
/// Tokens are trimmed, upper-cased and de-duplicated; empty tokens are
/// dropped. The result is sorted ascending so every run materializes the
/// universe in the same order. An empty or all-whitespace input yields an
/// empty set; the caller decides whether that is an error.
pub fn resolve_tracked_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = raw
        .split(',')
        .map(|token| token.trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .collect();

    symbols.sort();
    symbols.dedup();
    symbols
}
