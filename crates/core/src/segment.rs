//! Sentence chunks for interactive display of a translation.

fn is_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？' | '!' | '?')
}

/// Splits `text` after each sentence terminator, keeping the whitespace that
/// follows a terminator in the same chunk. The chunks concatenate back to
/// `text` exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        while chars.next_if(|(_, next)| next.is_whitespace()).is_some() {}
        let end = chars.peek().map_or(text.len(), |(i, _)| *i);
        chunks.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
