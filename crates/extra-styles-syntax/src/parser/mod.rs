//! # Parser
//!
//! Grammar functions walk the token stream and emit a flat list of
//! [`Event`]s; the [`Sink`] replays them into the Rowan tree afterwards. No
//! tree node exists until parsing is done, so a construct that turns out to
//! be unclosed is simply abandoned and its tokens stay where they are.
//!
//! Nodes are opened through [`Marker`]s:
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::PARAGRAPH);
//! ```
//!
//! A marker dropped without being completed or abandoned panics.
//!
//! The entry point is [`parse`]:
//!
//! ```
//! use extra_styles_syntax::{SyntaxKind, parse};
//!
//! let tree = parse("a `_u_`\n");
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        Sink::new(self.tokens).finish(&self.events)
    }

    /// Reserve a node starting at the current token.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker { pos, done: false }
    }

    /// Current token kind, `EOF` past the end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.kind_at(self.pos + n)
    }

    /// Kind of the token at absolute index `index`.
    pub fn kind_at(&self, index: usize) -> SyntaxKind {
        self.tokens
            .get(index)
            .map_or(SyntaxKind::EOF, |t| t.kind)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn bump(&mut self) {
        if !self.at_end() {
            self.events.push(Event::token(self.current()));
            self.pos += 1;
        }
    }

    /// Absolute index of the current token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Kind of the token before the current one, `EOF` at the start.
    pub fn prev(&self) -> SyntaxKind {
        self.pos
            .checked_sub(1)
            .map_or(SyntaxKind::EOF, |i| self.kind_at(i))
    }
}

/// A node under construction. Must end in [`Marker::complete`] or
/// [`Marker::abandon`].
#[must_use = "Markers must be completed or abandoned"]
pub struct Marker {
    pos: usize,
    done: bool,
}

impl Marker {
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.done = true;
        let slot = &mut p.events[self.pos];
        debug_assert!(slot.is_placeholder());
        *slot = Event::start(kind);
        p.events.push(Event::Finish);
    }

    /// Drop the node. Tokens consumed since [`Parser::start`] stay in the
    /// enclosing node.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.done = true;
        if self.pos + 1 == p.events.len() && p.events[self.pos].is_placeholder() {
            p.events.pop();
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.done && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Parse Markdown source into a lossless syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    Parser::new(&tokens).parse()
}
