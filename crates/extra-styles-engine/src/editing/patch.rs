/// What an edit changed, for callers that redraw incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit coordinates.
    pub changed: Vec<std::ops::Range<usize>>,
    pub version: u64,
}
