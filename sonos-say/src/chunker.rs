//! Text splitting for length-limited TTS endpoints.

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Prefers to cut at the last whitespace inside each window; the whitespace
/// starts the following chunk, so the chunks concatenate back to `text`
/// exactly. A window with no usable whitespace is cut hard. The final
/// remainder is always pushed, and may be empty for empty input.
pub fn text_chunks(max_chars: usize, text: &str) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start + max_chars < chars.len() {
        let end = start + max_chars;
        // Whitespace at `start` itself doesn't count.
        let cut = (start + 1..end)
            .rev()
            .find(|&i| chars[i].1.is_whitespace())
            .unwrap_or(end);

        chunks.push(&text[byte_at(start)..byte_at(cut)]);
        start = cut;
    }

    chunks.push(&text[byte_at(start)..]);
    chunks
}
