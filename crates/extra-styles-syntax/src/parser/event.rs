//! Flat events emitted by the grammar and replayed by the [`Sink`].
//!
//! ```text
//! Start(CODE_SPAN)
//!   Start(CODE_MARKER)  Token(BACKTICK)  Finish
//!   Start(CODE_TEXT)    Token(UNDERSCORE) Token(TEXT) Token(UNDERSCORE)  Finish
//!   Start(CODE_MARKER)  Token(BACKTICK)  Finish
//! Finish
//! ```
//!
//! [`Sink`]: super::sink::Sink

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Open a node of `kind`.
    Start { kind: SyntaxKind },

    /// Attach the next raw token as a leaf of `kind`.
    Token { kind: SyntaxKind },

    /// Close the innermost open node.
    Finish,

    /// Reserved by [`Parser::start`](super::Parser::start). Becomes a
    /// `Start` on completion; an abandoned one is skipped by the sink.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Event::Placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn constructors() {
        assert_eq!(
            Event::start(SyntaxKind::CODE_SPAN),
            Event::Start {
                kind: SyntaxKind::CODE_SPAN
            }
        );
        assert_eq!(
            Event::token(SyntaxKind::BACKTICK),
            Event::Token {
                kind: SyntaxKind::BACKTICK
            }
        );
        assert!(Event::Placeholder.is_placeholder());
        assert!(!Event::Finish.is_placeholder());
    }
}
