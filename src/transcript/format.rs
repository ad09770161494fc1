//! Message text formatting
//!
//! Server transcripts may carry `**bold**` emphasis pairs and newlines.
//! Everything else is data: the output is a list of plain-text spans, so
//! markup-looking characters in server content can never become markup.

/// Emphasis marker, both opening and closing.
const STRONG_MARKER: &str = "**";

/// One run of text with a single style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub strong: bool,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: true,
        }
    }
}

/// One visual line of a formatted message
pub type FormattedLine = Vec<TextSpan>;

/// Split message text into lines of styled spans
///
/// Recognizes exactly two patterns: `**...**` pairs become strong spans and
/// `\n` starts a new line. An unterminated `**` stays literal.
pub fn format_text(text: &str) -> Vec<FormattedLine> {
    text.split('\n').map(format_line).collect()
}

fn format_line(line: &str) -> FormattedLine {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find(STRONG_MARKER) {
        let after_open = &rest[open + STRONG_MARKER.len()..];
        match after_open.find(STRONG_MARKER) {
            Some(close) => {
                if open > 0 {
                    spans.push(TextSpan::plain(&rest[..open]));
                }
                spans.push(TextSpan::strong(&after_open[..close]));
                rest = &after_open[close + STRONG_MARKER.len()..];
            }
            None => break,
        }
    }

    if !rest.is_empty() {
        spans.push(TextSpan::plain(rest));
    }
    spans
}
