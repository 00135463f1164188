//! Line cleaning and span-preserving tokenization.

/// Splits input into lines, dropping blank and whitespace-only lines.
///
/// Both `\n` and `\r\n` line endings are accepted.
pub fn clean_lines(data: &str) -> Vec<&str> {
    data.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// A whitespace-delimited token and its byte span in the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) text: &'a str,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

pub(crate) fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(begin)) => {
                tokens.push(Token {
                    text: &line[begin..idx],
                    start: begin,
                    end: idx,
                });
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(begin) = start {
        tokens.push(Token {
            text: &line[begin..],
            start: begin,
            end: line.len(),
        });
    }

    tokens
}

/// Returns the source text from the start of `first` to the end of `last`.
pub(crate) fn span<'a>(line: &'a str, first: &Token<'_>, last: &Token<'_>) -> &'a str {
    &line[first.start..last.end.max(first.end)]
}
