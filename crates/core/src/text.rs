//! Reply truncation.
//!
//! Every reply leaving the runtime goes through [`truncate_reply`]. Limits
//! are measured in bytes and cuts always land on a `char` boundary.

/// Appended to any output cut short by a size cap.
pub const TRUNCATION_SUFFIX: &str = "…(truncated)";

/// Largest index `<= index` that lies on a char boundary of `s`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Cut `s` to at most `max_bytes`, returning the kept prefix and whether
/// anything was dropped.
pub fn clip_bytes(s: &str, max_bytes: usize) -> (&str, bool) {
    if s.len() <= max_bytes {
        return (s, false);
    }
    (&s[..floor_char_boundary(s, max_bytes)], true)
}

/// Trim `text` and, if it is longer than `max_bytes`, cut it so that the
/// result including [`TRUNCATION_SUFFIX`] fits in `max_bytes`.
///
/// Idempotent for any `max_bytes` larger than the suffix. When the cap is
/// not larger than the suffix the text is cut without a suffix.
pub fn truncate_reply(text: &str, max_bytes: usize) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= max_bytes {
        return trimmed.to_string();
    }
    if max_bytes <= TRUNCATION_SUFFIX.len() {
        let (kept, _) = clip_bytes(trimmed, max_bytes);
        return kept.trim_end().to_string();
    }
    let (kept, _) = clip_bytes(trimmed, max_bytes - TRUNCATION_SUFFIX.len());
    format!("{kept}{TRUNCATION_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_only_trimmed() {
        assert_eq!(truncate_reply("  hello \n", 100), "hello");
    }

    #[test]
    fn long_text_fits_cap_with_suffix() {
        let text = "a".repeat(500);
        let out = truncate_reply(&text, 100);
        assert_eq!(out.len(), 100);
        assert!(out.ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn truncation_is_idempotent() {
        let inputs = [
            "x".repeat(1000),
            "héllo wörld ".repeat(50),
            "🦀".repeat(300),
            format!("{}   {}", "a".repeat(40), "b".repeat(40)),
        ];
        for input in &inputs {
            for cap in [TRUNCATION_SUFFIX.len() + 1, 20, 64, 99, 100, 4000] {
                let once = truncate_reply(input, cap);
                let twice = truncate_reply(&once, cap);
                assert_eq!(once, twice, "cap {cap}");
                assert!(once.len() <= cap);
            }
        }
    }

    #[test]
    fn multibyte_cut_stays_on_boundary() {
        let text = "é".repeat(100); // 2 bytes each
        let out = truncate_reply(&text, 51);
        assert!(out.ends_with(TRUNCATION_SUFFIX));
        let body = out.strip_suffix(TRUNCATION_SUFFIX).unwrap();
        assert!(body.chars().all(|c| c == 'é'));
    }

    #[test]
    fn tiny_cap_cuts_without_suffix() {
        let out = truncate_reply("abcdefghijklmnopqrstuvwxyz", 5);
        assert_eq!(out, "abcde");
    }

    #[test]
    fn clip_reports_truncation() {
        assert_eq!(clip_bytes("abc", 10), ("abc", false));
        assert_eq!(clip_bytes("abcdef", 3), ("abc", true));
        assert_eq!(clip_bytes("日本語", 4), ("日", true));
    }
}
