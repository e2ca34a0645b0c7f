//! Small shared helpers

/// Normalize a free-text category: trim and lowercase.
///
/// The same function must be applied when a buyer's text is stored as a
/// request category and when a seller looks up matching menus, otherwise
/// matches silently fail.
pub fn normalize_category(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_category;

    #[test]
    fn normalization_is_idempotent() {
        assert_eq!(normalize_category(" Nasi Padang "), "nasi padang");
        assert_eq!(normalize_category("nasi padang"), "nasi padang");
        assert_eq!(
            normalize_category(normalize_category(" Nasi Padang ").as_str()),
            "nasi padang"
        );
    }

    #[test]
    fn empty_and_whitespace_collapse() {
        assert_eq!(normalize_category(""), "");
        assert_eq!(normalize_category("   "), "");
    }
}
