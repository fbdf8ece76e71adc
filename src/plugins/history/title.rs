/// Title of a conversation that has no messages yet.
pub const UNTITLED: &str = "Untitled Conversation";

const TITLE_MAX_CHARS: usize = 30;
const TITLE_ELLIPSIS: &str = "...";

/// Title derived from the first message of a conversation.
///
/// Longer than 30 characters: the first 30 plus `...`; otherwise verbatim.
pub(super) fn title_from_first_message(content: &str) -> String {
    if content.chars().count() <= TITLE_MAX_CHARS {
        return content.to_string();
    }
    content.chars().take(TITLE_MAX_CHARS).collect::<String>() + TITLE_ELLIPSIS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_used_verbatim() {
        assert_eq!(title_from_first_message("Ijarah lease"), "Ijarah lease");
    }

    #[test]
    fn test_exactly_thirty_chars_not_truncated() {
        let content = "a".repeat(30);
        assert_eq!(title_from_first_message(&content), content);
    }

    #[test]
    fn test_long_content_truncated_with_ellipsis() {
        let title = title_from_first_message("Vehicle cost $60,000, 3-year lease with delivery");
        assert_eq!(title, "Vehicle cost $60,000, 3-year l...");
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let content = "مرابحة ".repeat(6);
        let title = title_from_first_message(&content);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 33);
    }
}
