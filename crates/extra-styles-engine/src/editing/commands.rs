use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
    /// Several replacements applied as one edit. Ranges are in pre-edit
    /// coordinates, sorted and non-overlapping.
    ReplaceRanges {
        edits: Vec<(std::ops::Range<usize>, String)>,
    },
}

/// Compile a command into a delta over a buffer of `len` bytes.
pub(crate) fn compile_command(len: usize, cmd: &Cmd) -> Delta<RopeInfo> {
    let mut builder = Builder::new(len);
    match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(len);
            builder.replace(at..at, Rope::from(text));
        }
        Cmd::DeleteRange { range } => {
            builder.delete(clamp(range, len));
        }
        Cmd::ReplaceRange { range, text } => {
            builder.replace(clamp(range, len), Rope::from(text));
        }
        Cmd::ReplaceRanges { edits } => {
            for (range, text) in edits {
                builder.replace(clamp(range, len), Rope::from(text));
            }
        }
    }
    builder.build()
}

fn clamp(range: &std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = range.start.min(len);
    start..range.end.min(len).max(start)
}

/// Byte ranges of inserted text in post-edit coordinates.
pub(crate) fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<std::ops::Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            xi_rope::delta::DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            xi_rope::delta::DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                changed.push(start..end);
                cursor = end;
            }
        }
    }
    changed
}

/// Map a pre-edit offset through a command. Offsets inside a replaced
/// range move to the end of its replacement.
pub(crate) fn transform_offset(cmd: &Cmd, offset: usize) -> usize {
    let shift = |offset: usize, range: &std::ops::Range<usize>, inserted: usize| -> isize {
        if offset < range.start {
            0
        } else if offset < range.end || (offset == range.end && range.start == range.end) {
            (range.start + inserted) as isize - offset as isize
        } else {
            inserted as isize - (range.end - range.start) as isize
        }
    };

    let delta = match cmd {
        Cmd::InsertText { at, text } => shift(offset, &(*at..*at), text.len()),
        Cmd::DeleteRange { range } => shift(offset, range, 0),
        Cmd::ReplaceRange { range, text } => shift(offset, range, text.len()),
        Cmd::ReplaceRanges { edits } => edits
            .iter()
            .map(|(range, text)| shift(offset, range, text.len()))
            .sum(),
    };
    offset.saturating_add_signed(delta)
}
