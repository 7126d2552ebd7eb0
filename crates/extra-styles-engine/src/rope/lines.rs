use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The line text, newline included.
    pub text: String,
}

impl LineRef {
    /// The line text without its trailing line ending.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\n', '\r'])
    }
}

/// The line containing byte `offset`. An offset at the very end of the
/// rope belongs to the last line, or to an empty line after a trailing
/// newline.
pub fn line_at(rope: &Rope, offset: usize) -> LineRef {
    let offset = offset.min(rope.len());
    let line = rope.line_of_offset(offset);
    let start = rope.offset_of_line(line);
    let end = rope.offset_of_line(line + 1);
    LineRef {
        span: Span { start, end },
        text: rope.slice_to_cow(start..end).into_owned(),
    }
}
