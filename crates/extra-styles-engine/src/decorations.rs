//! The decoration pass: find styled code spans in the visible part of the
//! document and build replacement widgets for them.

use extra_styles_config::Settings;
use extra_styles_syntax::{SyntaxKind, SyntaxNode};
use regex::Regex;
use rowan::WalkEvent;

use crate::editing::ViewState;
use crate::editing::selection::any_touches;
use crate::grammar::{Grammar, ParseResult};
use crate::render;
use crate::rope::{Span, slice_to_string};
use crate::widget::StyleWidget;

/// Default test applied to composite type names to find code span content.
pub const INLINE_CODE_PATTERN: &str = ".*?_?inline-code_?.*";

/// Type-name segment to CSS class for styles a code span is nested in.
pub const CLASS_HINTS: [(&str, &str); 5] = [
    ("strong", "cm-strong"),
    ("em", "cm-em"),
    ("highlight", "cm-highlight"),
    ("strikethrough", "cm-strikethrough"),
    ("comment", "cm-comment"),
];

/// A widget replacing the raw text in `range`.
#[derive(Debug, Clone)]
pub struct Decoration {
    /// The code span content plus one boundary byte on each side.
    pub range: Span,
    pub inclusive: bool,
    pub block: bool,
    pub widget: StyleWidget,
}

/// Decorations sorted by range, at most one per range.
#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn new(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| d.range);
        decorations.dedup_by_key(|d| d.range);
        Self { decorations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn ranges(&self) -> Vec<Span> {
        self.decorations.iter().map(|d| d.range).collect()
    }

    /// The decoration covering byte `pos`, if any.
    pub fn at(&self, pos: usize) -> Option<&Decoration> {
        self.decorations
            .iter()
            .find(|d| d.range.start <= pos && pos < d.range.end)
    }

    pub(crate) fn into_vec(self) -> Vec<Decoration> {
        self.decorations
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}

/// Type name of `node` joined with those of the inline styles around it,
/// outermost first: `inline-code_strong_em` for code inside `**_..._**`.
pub fn composite_type_name(node: &SyntaxNode) -> String {
    let mut styles: Vec<&str> = node
        .ancestors()
        .skip(1)
        .filter(|n| n.kind().is_inline_style())
        .map(|n| n.kind().type_name())
        .collect();
    styles.reverse();

    let mut name = node.kind().type_name().to_string();
    for style in styles {
        name.push('_');
        name.push_str(style);
    }
    name
}

/// CSS classes for the styles named in a composite type name.
///
/// Segments are compared whole, so `comment` does not also yield `cm-em`.
pub fn class_hints(type_name: &str) -> Vec<String> {
    let segments: Vec<&str> = type_name.split('_').collect();
    CLASS_HINTS
        .iter()
        .filter(|(segment, _)| segments.contains(segment))
        .map(|(_, class)| class.to_string())
        .collect()
}

/// Computes decoration sets. Holds the inline-code predicate.
#[derive(Debug, Clone)]
pub struct DecorationEngine {
    inline_code: Regex,
}

impl Default for DecorationEngine {
    fn default() -> Self {
        Self {
            inline_code: Regex::new(INLINE_CODE_PATTERN).expect("Invalid inline-code regex"),
        }
    }
}

impl DecorationEngine {
    /// Use a different test for which type names count as inline code.
    pub fn with_predicate(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            inline_code: Regex::new(pattern)?,
        })
    }

    /// Walk the visible part of the tree and build one decoration for each
    /// styled code span that no selection touches.
    pub fn compute(&self, view: ViewState<'_>, grammar: &Grammar, settings: &Settings) -> DecorationSet {
        let mut decorations = Vec::new();

        for &visible in view.visible_ranges {
            let mut walk = view.tree.preorder();
            while let Some(event) = walk.next() {
                let WalkEvent::Enter(node) = event else {
                    continue;
                };
                let range = Span::from(node.text_range());
                if !range.touches(visible) {
                    walk.skip_subtree();
                    continue;
                }
                if let Some(decoration) = self.decorate(&node, range, view, grammar, settings) {
                    decorations.push(decoration);
                }
            }
        }

        DecorationSet::new(decorations)
    }

    fn decorate(
        &self,
        node: &SyntaxNode,
        range: Span,
        view: ViewState<'_>,
        grammar: &Grammar,
        settings: &Settings,
    ) -> Option<Decoration> {
        // Delimiter glyphs are never replaced on their own.
        if node.kind().type_name().contains("formatting") {
            return None;
        }
        let type_name = composite_type_name(node);
        if !self.inline_code.is_match(&type_name) {
            return None;
        }

        // The replacement also covers the backtick on either side.
        let replaced = range.widen(1);
        if any_touches(view.selections, replaced) {
            return None;
        }

        let text = slice_to_string(view.doc, range);
        match grammar.parse(&text) {
            ParseResult::Styled {
                style_name,
                inner_text,
                open_len,
            } => {
                let widget = StyleWidget::new(
                    style_name,
                    inner_text,
                    grammar.fingerprint().clone(),
                    class_hints(&type_name),
                    range.start + open_len,
                );
                let element = widget.to_dom();
                render::render_into(&element, settings, widget.style_name(), widget.inner_text());
                Some(Decoration {
                    range: replaced,
                    inclusive: false,
                    block: false,
                    widget,
                })
            }
            ParseResult::Error { message } => {
                log::error!("Cannot style code span at {}..{}: {message}", range.start, range.end);
                None
            }
            ParseResult::NoMatch => None,
        }
    }
}

/// One decoration pass with the default inline-code predicate.
pub fn compute_decorations(view: ViewState<'_>, grammar: &Grammar, settings: &Settings) -> DecorationSet {
    DecorationEngine::default().compute(view, grammar, settings)
}
