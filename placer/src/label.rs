use std::sync::OnceLock;

use regex::Regex;

static LABEL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    LABEL_PATTERN
        .get_or_init(|| Regex::new(r"^.*_([0-9A-Za-z]+)_.*$").expect("label pattern is valid"))
}

/// Pull the label out of a `prefix_LABEL_suffix` file stem.
///
/// Prefix and suffix may themselves contain underscores; the rightmost
/// underscore-delimited alphanumeric segment wins.
pub fn extract_label(stem: &str) -> Option<&str> {
    pattern()
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mjsynth_style_stem() {
        assert_eq!(extract_label("1_pontifically_58805"), Some("pontifically"));
        assert_eq!(extract_label("x_AB_y"), Some("AB"));
    }

    #[test]
    fn rightmost_segment_wins() {
        assert_eq!(extract_label("a_b_c_d"), Some("c"));
        assert_eq!(extract_label("pre_ABC_42_"), Some("42"));
    }

    #[test]
    fn skips_non_alphanumeric_segments() {
        assert_eq!(extract_label("a_b_c-d_e"), Some("b"));
        assert_eq!(extract_label("x_AB__y"), Some("AB"));
    }

    #[test]
    fn rejects_malformed_stems() {
        assert_eq!(extract_label("nounderscore"), None);
        assert_eq!(extract_label("one_underscore"), None);
        assert_eq!(extract_label("a__b"), None);
        assert_eq!(extract_label("a_b-c_d"), None);
        assert_eq!(extract_label(""), None);
    }
}
