// src/utils/text.rs

/// Clean user-supplied rich text using the ammonia library.
///
/// Whitelist-based sanitization: safe tags (like <b>, <p>) survive,
/// dangerous tags (<script>, <iframe>) and attributes (onclick) are
/// stripped. Applied to article descriptions and comment bodies before
/// storage as a fail-safe against stored XSS.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input)
}

/// Normalizes a comma-separated tag string: trims each entry and drops
/// empties, so "crops, , soil " becomes "crops,soil".
pub fn normalize_tags(input: &str) -> String {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
