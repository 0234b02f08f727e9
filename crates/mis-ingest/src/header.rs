//! Header cleanup shared by the CSV and workbook readers.

use std::collections::BTreeSet;

/// Trims, strips a BOM and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Makes header names non-empty and unique.
///
/// Blank names become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
/// suffixes in order of appearance.
pub fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut used = BTreeSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let base = normalize_header(header);
        let base = if base.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            base
        };
        let mut name = base.clone();
        let mut suffix = 1usize;
        while used.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_repeated_headers_are_renamed() {
        let headers = unique_headers(vec![
            " Revenue ".into(),
            String::new(),
            "Revenue".into(),
            "Revenue".into(),
        ]);
        assert_eq!(headers, vec!["Revenue", "Unnamed: 1", "Revenue.1", "Revenue.2"]);
    }

    #[test]
    fn inner_whitespace_is_collapsed() {
        assert_eq!(normalize_header("\u{feff}Net   Sales"), "Net Sales");
    }
}
