use xi_rope::Rope;

use super::span::Span;

/// Owned text under `sp`, clamped to the rope. A span left over from before
/// an edit yields whatever is still in range.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let len = rope.len();
    let start = sp.start.min(len);
    let end = sp.end.min(len).max(start);
    rope.slice_to_cow(start..end).into_owned()
}
