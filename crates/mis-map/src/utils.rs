//! Header normalization shared by suggestion, restore and projection.

/// Splits a header into lowercase, singularized tokens.
///
/// Tokens break on any non-alphanumeric character and on lower-to-upper
/// camel-case boundaries (`netSales` -> `net`, `sales`).
pub fn header_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in raw.chars() {
        if !ch.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            flush(&mut current, &mut tokens);
        }
        prev_lower = ch.is_lowercase();
        current.extend(ch.to_lowercase());
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(singularize(current));
        current.clear();
    }
}

/// Strips common English plural suffixes from tokens longer than three characters.
pub fn singularize(token: &str) -> String {
    if token.chars().count() <= 3 {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if token.ends_with('s') && !["ss", "us", "is"].iter().any(|end| token.ends_with(end)) {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Normalized form: tokens joined with `_`.
pub fn normalize_header(raw: &str) -> String {
    header_tokens(raw).join("_")
}

/// Compact form used for fuzzy comparison: tokens with no separator.
pub fn compact(tokens: &[String]) -> String {
    tokens.concat()
}

/// Finds a column by name: exact match first, then trimmed ASCII case-insensitive.
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    if let Some(idx) = headers.iter().position(|h| h == name) {
        return Some(idx);
    }
    let wanted = name.trim();
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
}

/// True when `needle` occurs as a contiguous run inside `haystack`.
pub fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}
