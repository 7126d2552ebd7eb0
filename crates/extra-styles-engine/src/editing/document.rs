use extra_styles_syntax::SyntaxNode;
use xi_rope::Rope;

use crate::editing::commands::{changed_ranges, compile_command, transform_offset};
use crate::editing::{Cmd, Patch, Selection};
use crate::rope::Span;

/// An open Markdown document: rope buffer, selections and syntax tree.
///
/// The rope is the single source of truth. The syntax tree is rebuilt from
/// it after every edit, and selections are carried through each edit.
pub struct Document {
    /// xi-rope buffer containing the entire document
    pub(crate) buffer: Rope,
    /// Selection ranges as byte offsets. Never empty; the first is primary.
    pub(crate) selections: Vec<Selection>,
    /// Version counter incremented on each edit (enables change detection)
    pub(crate) version: u64,
    /// Lossless syntax tree for the current buffer
    pub(crate) tree: SyntaxNode,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            tree: extra_styles_syntax::parse(text),
            buffer,
            selections: vec![Selection::cursor(len)],
            version: 0,
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply command to document.
    ///
    /// The delta is applied to the buffer, the tree is re-parsed, and every
    /// selection is mapped through the edit.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = compile_command(self.buffer.len(), &cmd);
        let changed = changed_ranges(&delta);

        self.buffer = delta.apply(&self.buffer);
        self.reparse();

        let len = self.buffer.len();
        for sel in &mut self.selections {
            sel.anchor = transform_offset(&cmd, sel.anchor).min(len);
            sel.head = transform_offset(&cmd, sel.head).min(len);
        }

        self.version += 1;
        Patch {
            changed,
            version: self.version,
        }
    }

    fn reparse(&mut self) {
        self.tree = extra_styles_syntax::parse(&self.buffer.to_string());
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Replace all selections. Offsets are clamped to the document; an
    /// empty list leaves a cursor at the start.
    pub fn set_selections(&mut self, selections: Vec<Selection>) {
        let len = self.buffer.len();
        self.selections = selections
            .into_iter()
            .map(|sel| Selection::new(sel.anchor.min(len), sel.head.min(len)))
            .collect();
        if self.selections.is_empty() {
            self.selections.push(Selection::cursor(0));
        }
    }

    /// Collapse to a single cursor.
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selections(vec![Selection::cursor(pos)]);
    }

    /// Position of the primary cursor.
    pub fn cursor(&self) -> usize {
        self.selections.first().map_or(0, |sel| sel.head)
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn tree(&self) -> &SyntaxNode {
        &self.tree
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Everything a decoration pass needs to read, for the given visible
    /// ranges.
    pub fn view_state<'a>(&'a self, visible_ranges: &'a [Span]) -> ViewState<'a> {
        ViewState {
            doc: &self.buffer,
            tree: &self.tree,
            visible_ranges,
            selections: &self.selections,
        }
    }
}

/// Read-only view of an editor at one moment, as seen by a render pass.
#[derive(Clone, Copy)]
pub struct ViewState<'a> {
    pub doc: &'a Rope,
    pub tree: &'a SyntaxNode,
    pub visible_ranges: &'a [Span],
    pub selections: &'a [Selection],
}

#[cfg(test)]
mod tests {
    use super::*;
    use extra_styles_syntax::SyntaxKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn lossless_round_trip() {
        let text = "# Title\n\nSome `_styled_` text\n";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.cursor(), text.len());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(Document::from_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn edits_reparse_the_tree() {
        let mut doc = Document::from_text("plain\n");
        assert!(
            doc.tree()
                .descendants()
                .all(|n| n.kind() != SyntaxKind::CODE_TEXT)
        );

        doc.apply(Cmd::ReplaceRange {
            range: 0..5,
            text: "`_plain_`".to_string(),
        });

        let code: Vec<_> = doc
            .tree()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CODE_TEXT)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(code, vec!["_plain_"]);
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn selections_follow_edits() {
        let mut doc = Document::from_text("abc def\n");
        doc.set_selections(vec![Selection::cursor(1), Selection::new(4, 7)]);

        doc.apply(Cmd::InsertText {
            at: 0,
            text: ">> ".to_string(),
        });

        assert_eq!(
            doc.selections(),
            &[Selection::cursor(4), Selection::new(7, 10)]
        );
    }

    #[test]
    fn selections_are_clamped() {
        let mut doc = Document::from_text("abc");
        doc.set_selections(vec![Selection::new(1, 50)]);
        assert_eq!(doc.selections(), &[Selection::new(1, 3)]);

        doc.set_selections(Vec::new());
        assert_eq!(doc.selections(), &[Selection::cursor(0)]);
    }
}
