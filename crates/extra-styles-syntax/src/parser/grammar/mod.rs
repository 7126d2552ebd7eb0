//! Grammar rules. Each takes `&mut Parser`, looks at tokens with
//! `current`/`nth`/`at`, consumes them with `bump`/`eat` and wraps them in
//! nodes through markers.
//!
//! - [`block`]: headings, paragraphs, quotes, list items, fenced code
//! - [`inline`]: code spans and the emphasis, strong, strikethrough,
//!   highlight and comment runs that can wrap them
//!
//! Rules never fail. Input that does not fit a construct stays in the
//! enclosing node as plain tokens, so every byte ends up in the tree.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// The whole document: a ROOT node holding every top-level block.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() {
        block::block(p);
    }
    m.complete(p, SyntaxKind::ROOT);
}
