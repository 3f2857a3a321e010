//! Message Input
//!
//! Splits `---`-delimited batch files into individual messages.

/// Split file content into messages separated by `---`.
///
/// Segments are trimmed and empty segments dropped; file order is
/// preserved. Each resulting message gets its own independent
/// pipeline run.
pub fn split_messages(content: &str) -> Vec<String> {
    content
        .split("---")
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_message() {
        assert_eq!(split_messages("just one message"), vec!["just one message"]);
    }

    #[test]
    fn test_multiple_messages_in_file_order() {
        let content = "first message\n---\nsecond message\n---\nthird message";
        assert_eq!(
            split_messages(content),
            vec!["first message", "second message", "third message"]
        );
    }

    #[test]
    fn test_blank_segments_dropped() {
        let content = "---\n\nfirst\n---\n   \n---\nsecond\n---";
        assert_eq!(split_messages(content), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_file() {
        assert!(split_messages("").is_empty());
        assert!(split_messages("---\n---").is_empty());
    }
}
