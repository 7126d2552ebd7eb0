//! Token and node kinds, shared by the lexer and the parser as in
//! rust-analyzer.

/// Kinds up to [`SyntaxKind::EOF`] are lexer tokens; the rest are nodes the
/// grammar builds.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    WHITESPACE,
    NEWLINE,
    TEXT,
    GT,
    DASH,
    STAR,
    PLUS,
    BACKTICK,
    TILDE,
    UNDERSCORE,
    EQ,
    PERCENT,
    HASH,
    /// Returned by the parser past the last token; never in a tree.
    EOF,

    ROOT,
    BLOCK_QUOTE,
    LIST_ITEM,
    PARAGRAPH,
    HEADING,
    THEMATIC_BREAK,
    FENCED_CODE,
    /// A whole code span: opening marker, content and closing marker.
    CODE_SPAN,
    /// The backtick run on either side of a code span.
    CODE_MARKER,
    /// What sits strictly between the two markers.
    CODE_TEXT,
    EMPHASIS,
    STRONG,
    STRIKETHROUGH,
    HIGHLIGHT,
    COMMENT,
}

impl SyntaxKind {
    /// Every kind, in discriminant order.
    pub const ALL: [SyntaxKind; 29] = {
        use SyntaxKind::*;
        [
            WHITESPACE, NEWLINE, TEXT, GT, DASH, STAR, PLUS, BACKTICK, TILDE, UNDERSCORE, EQ,
            PERCENT, HASH, EOF, ROOT, BLOCK_QUOTE, LIST_ITEM, PARAGRAPH, HEADING, THEMATIC_BREAK,
            FENCED_CODE, CODE_SPAN, CODE_MARKER, CODE_TEXT, EMPHASIS, STRONG, STRIKETHROUGH,
            HIGHLIGHT, COMMENT,
        ]
    };

    /// The name a live-preview host gives nodes of this kind.
    ///
    /// Decoration code matches on these strings (`inline-code`,
    /// `formatting`), so only [`SyntaxKind::CODE_MARKER`] may contain
    /// `formatting`.
    pub fn type_name(self) -> &'static str {
        use SyntaxKind::*;
        match self {
            WHITESPACE => "whitespace",
            NEWLINE => "newline",
            TEXT => "text",
            GT => "gt",
            DASH => "dash",
            STAR => "star",
            PLUS => "plus",
            BACKTICK => "backtick",
            TILDE => "tilde",
            UNDERSCORE => "underscore",
            EQ => "eq",
            PERCENT => "percent",
            HASH => "hash",
            EOF => "eof",
            ROOT => "document",
            BLOCK_QUOTE => "quote",
            LIST_ITEM => "list",
            PARAGRAPH => "paragraph",
            HEADING => "header",
            THEMATIC_BREAK => "hr",
            FENCED_CODE => "codeblock",
            CODE_SPAN => "code-span",
            CODE_MARKER => "formatting-code",
            CODE_TEXT => "inline-code",
            EMPHASIS => "em",
            STRONG => "strong",
            STRIKETHROUGH => "strikethrough",
            HIGHLIGHT => "highlight",
            COMMENT => "comment",
        }
    }

    /// Inline containers whose names join a nested code span's type name.
    pub fn is_inline_style(self) -> bool {
        matches!(
            self,
            Self::EMPHASIS | Self::STRONG | Self::STRIKETHROUGH | Self::HIGHLIGHT | Self::COMMENT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        // Raw kinds only ever come from `kind_to_raw`.
        SyntaxKind::ALL[usize::from(raw.0)]
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
