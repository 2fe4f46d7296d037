/// Name recorded when a multi-payee split yields no usable names.
pub const FALLBACK_PAYEE: &str = "未知";

const ABSENT_NAME_TOKENS: [&str; 4] = ["无", "none", "未知", "unknown"];

/// Splits a raw payee field into individual names. Separators are the ASCII
/// comma, the fullwidth comma, and the forward slash. Segments are trimmed,
/// empties dropped, order preserved, duplicates kept.
pub fn split_payees(raw: &str) -> Vec<String> {
    raw.split([',', '，', '/'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a name denotes an actual person. Empty strings and the known
/// placeholder tokens all count as absent.
pub fn is_effective_person(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    !ABSENT_NAME_TOKENS.contains(&lowered.as_str())
}

/// Canonical key for aggregation grouping: all whitespace removed, case kept.
pub fn aggregation_key(name: &str) -> String {
    name.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Canonical key for duplicate matching: whitespace removed and lowercased.
pub fn dedupe_key(name: &str) -> String {
    aggregation_key(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{aggregation_key, dedupe_key, is_effective_person, split_payees};

    #[test]
    fn split_handles_mixed_separators_and_trims() {
        assert_eq!(
            split_payees("张三, 李四／x"),
            vec!["张三".to_string(), "李四／x".to_string()]
        );
        assert_eq!(
            split_payees("张三，李四/王五"),
            vec!["张三".to_string(), "李四".to_string(), "王五".to_string()]
        );
    }

    #[test]
    fn split_drops_empty_segments_and_keeps_duplicates() {
        assert_eq!(
            split_payees(",张三,,张三,"),
            vec!["张三".to_string(), "张三".to_string()]
        );
        assert!(split_payees("  ,, / ").is_empty());
    }

    #[test]
    fn split_preserves_internal_whitespace() {
        assert_eq!(split_payees("Mary Ann,Bob"), vec![
            "Mary Ann".to_string(),
            "Bob".to_string()
        ]);
    }

    #[test]
    fn placeholder_tokens_are_not_effective_persons() {
        for token in ["", "  ", "无", "None", "NONE", "未知", "Unknown", " unknown "] {
            assert!(!is_effective_person(token));
        }
        assert!(is_effective_person("张三"));
        assert!(is_effective_person("Nonexistent"));
    }

    #[test]
    fn keys_strip_whitespace_and_dedupe_key_lowercases() {
        assert_eq!(aggregation_key("张 三"), "张三");
        assert_eq!(aggregation_key("Mary Ann"), "MaryAnn");
        assert_eq!(dedupe_key("Mary Ann"), "maryann");
    }
}
