use super::model::Block;

const ELLIPSIS: char = '…';

/// Joins the span text of every text block, one paragraph per block.
///
/// Image and unknown blocks contribute nothing. The text is taken as-is;
/// run it on blocks returned by [`ContentSanitizer::document`] so that the
/// spans are already sanitized.
///
/// [`ContentSanitizer::document`]: crate::ContentSanitizer::document
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text(text) => Some(
                text.children
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        })
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Shortens `text` to at most `max_chars` characters, ending with `…` if cut.
///
/// # Examples
///
/// ```
/// use content_sanitize::document::excerpt;
///
/// assert_eq!(excerpt("Sunday service", 20), "Sunday service");
/// assert_eq!(excerpt("お盆法要のご案内", 4), "お盆法…");
/// ```
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut cut: String = text.chars().take(max_chars - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}
