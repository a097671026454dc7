//! Node name normalization and slug derivation.
//!
//! Node names are compared in normalized form everywhere, including the
//! tethered-slot lookup in the planner. Slugs are derived from document
//! titles with the same character rules plus segment collapsing.

/// Normalize a node name for comparison and storage: lowercase, ASCII
/// letters/digits kept, everything else mapped to `-`, runs collapsed,
/// leading/trailing separators trimmed.
pub fn normalize_name(raw: &str) -> String {
    collapse(raw, '-')
}

/// Derive a URL slug from a human-readable title. Same rules as
/// [`normalize_name`]; kept separate so the two call sites can diverge
/// without touching each other.
pub fn slugify(title: &str) -> String {
    collapse(title, '-')
}

fn collapse(raw: &str, sep: char) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Main Content"), "main-content");
        assert_eq!(normalize_name("main"), "main");
        assert_eq!(normalize_name("  Weird -- Name! "), "weird-name");
        assert_eq!(normalize_name("MAIN"), "main");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Ünicode stripped?"), "nicode-stripped");
        assert_eq!(slugify(""), "");
    }
}
