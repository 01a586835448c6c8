//! Small text helpers shared by the prompt builders.

/// At most `max_chars` characters of `text`, cut on a char boundary.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Summary block for a slice of papers, one numbered entry per paper.
pub(crate) fn papers_context(papers: &[papermill_core::request::PaperRecord], limit: usize) -> String {
    papers
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, paper)| {
            format!(
                "Paper {}:\nTitle: {}\nAuthors: {}\nYear: {}\nAbstract: {}\n",
                i + 1,
                paper.title,
                paper.authors.as_deref().unwrap_or("Unknown"),
                paper
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                if paper.abstract_text.is_empty() {
                    "N/A"
                } else {
                    &paper.abstract_text
                },
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("hello", 10), "hello");
        assert_eq!(excerpt("hello", 3), "hel");
        // multi-byte characters must not be split
        assert_eq!(excerpt("héllo", 2), "hé");
    }
}
