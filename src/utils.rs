use chrono::Utc;

/// Today's date (UTC) formatted for the briefing header, e.g. "August 7, 2026".
pub fn formatted_today() -> String {
    Utc::now().format("%B %-d, %Y").to_string()
}

/// Normalize watchlist symbols to canonical form: trimmed, uppercased,
/// empties dropped. Input order is preserved.
pub fn normalize_symbols(symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
