//! # extra-styles-syntax
//!
//! Lossless Markdown syntax tree built with [Rowan] and [Logos], laid out the
//! way rust-analyzer builds its trees.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//!
//! The live preview swaps styled code spans for widgets while the raw text
//! stays editable underneath, so it needs byte ranges for a span's backticks,
//! its content and every emphasis or highlight around it. Nothing is dropped
//! on the way in: the tree's text is always the source text.
//!
//! ```text
//! source ──lexer──▶ tokens ──grammar──▶ events ──sink──▶ SyntaxNode
//! ```
//!
//! - [`lexer`]: Logos tokens, one per Markdown glyph or text run
//! - [`parser`]: markers, events and the grammar rules
//! - [`syntax_kind`]: kinds and the type names decorations match on
//!
//! ```
//! use extra_styles_syntax::{SyntaxKind, parse};
//!
//! let tree = parse("Some `_underlined_` text\n");
//! assert_eq!(tree.text().to_string(), "Some `_underlined_` text\n");
//!
//! let code = tree
//!     .descendants()
//!     .find(|n| n.kind() == SyntaxKind::CODE_TEXT)
//!     .unwrap();
//! assert_eq!(code.text().to_string(), "_underlined_");
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
