//! Shared text helpers

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold accented characters to their ASCII base form.
///
/// NFKD-decomposes the string and drops combining marks, so "Società" becomes
/// "Societa". Characters without an ASCII decomposition pass through.
pub fn ascii_fold(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collapse runs of doubled spaces left behind by character replacement.
pub fn collapse_double_spaces(s: &str) -> String {
    let mut out = s.to_string();
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fold() {
        assert_eq!(ascii_fold("Società"), "Societa");
        assert_eq!(ascii_fold("Gëorge Washington"), "George Washington");
        assert_eq!(ascii_fold("plain ascii"), "plain ascii");
    }

    #[test]
    fn test_collapse_double_spaces() {
        assert_eq!(collapse_double_spaces("a  b    c"), "a b c");
        assert_eq!(collapse_double_spaces("a b"), "a b");
    }
}
