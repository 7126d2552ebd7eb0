//! Block grammar. Each block is chosen by how its first line starts; inline
//! content inside it is handed to [`inline`].

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// What a line opens, judged from its first tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStart {
    Heading,
    Quote,
    ListItem,
    ThematicBreak,
    Fence,
    Text,
}

fn classify(p: &Parser<'_, '_>) -> LineStart {
    match p.current() {
        SyntaxKind::HASH if is_heading(p) => LineStart::Heading,
        SyntaxKind::GT => LineStart::Quote,
        SyntaxKind::DASH | SyntaxKind::STAR if is_thematic_break(p) => LineStart::ThematicBreak,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS if is_list_marker(p, 0) => {
            LineStart::ListItem
        }
        SyntaxKind::WHITESPACE if is_list_marker(p, 1) => LineStart::ListItem,
        SyntaxKind::BACKTICK | SyntaxKind::TILDE if run_len(p, 0) >= 3 => LineStart::Fence,
        _ => LineStart::Text,
    }
}

/// Parse one block, skipping blank lines before it.
pub fn block(p: &mut Parser<'_, '_>) {
    while p.eat(SyntaxKind::NEWLINE) {}
    if p.at_end() {
        return;
    }

    match classify(p) {
        LineStart::Heading => heading(p),
        LineStart::Quote => block_quote(p),
        LineStart::ListItem => list_item(p),
        LineStart::ThematicBreak => thematic_break(p),
        LineStart::Fence => fenced_code(p),
        LineStart::Text => paragraph(p),
    }
}

/// Number of consecutive tokens like the one at `offset`.
fn run_len(p: &Parser<'_, '_>, offset: usize) -> usize {
    let kind = p.nth(offset);
    (offset..).take_while(|&i| p.nth(i) == kind).count()
}

/// One to six `#` followed by a space or the end of the line.
fn is_heading(p: &Parser<'_, '_>) -> bool {
    let level = run_len(p, 0);
    (1..=6).contains(&level)
        && matches!(
            p.nth(level),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

fn is_list_marker(p: &Parser<'_, '_>, offset: usize) -> bool {
    matches!(
        p.nth(offset),
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS
    ) && p.nth(offset + 1) == SyntaxKind::WHITESPACE
}

/// Three or more of the same `-` or `*`, optionally spaced, alone on the line.
fn is_thematic_break(p: &Parser<'_, '_>) -> bool {
    let marker = p.current();
    let mut count = 0;
    for i in 0.. {
        match p.nth(i) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => break,
            SyntaxKind::WHITESPACE => {}
            kind if kind == marker => count += 1,
            _ => return false,
        }
    }
    count >= 3
}

/// Consume to the end of the line, newline included, without inline parsing.
fn rest_of_line(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        p.bump();
    }
    p.eat(SyntaxKind::NEWLINE);
}

/// Inline content to the end of the line, then the newline.
fn inline_line(p: &mut Parser<'_, '_>) {
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);
}

fn heading(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while p.eat(SyntaxKind::HASH) {}
    p.eat(SyntaxKind::WHITESPACE);
    inline_line(p);
    m.complete(p, SyntaxKind::HEADING);
}

/// Consecutive `>` lines, each with its own inline content.
fn block_quote(p: &mut Parser<'_, '_>) {
    let m = p.start();
    loop {
        p.eat(SyntaxKind::WHITESPACE);
        p.bump();
        p.eat(SyntaxKind::WHITESPACE);
        inline_line(p);

        let continues = p.at(SyntaxKind::GT)
            || (p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::GT);
        if !continues {
            break;
        }
    }
    m.complete(p, SyntaxKind::BLOCK_QUOTE);
}

fn list_item(p: &mut Parser<'_, '_>) {
    let m = p.start();
    // Indent, marker, then the space after it.
    p.eat(SyntaxKind::WHITESPACE);
    p.bump();
    p.bump();
    inline_line(p);
    m.complete(p, SyntaxKind::LIST_ITEM);
}

fn thematic_break(p: &mut Parser<'_, '_>) {
    let m = p.start();
    rest_of_line(p);
    m.complete(p, SyntaxKind::THEMATIC_BREAK);
}

/// Everything up to a closing fence of the same glyph that is at least as
/// long as the opening one, or the end of input. The content is never parsed
/// inline, so backticks inside it do not form code spans.
fn fenced_code(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let fence = p.current();
    let open_len = run_len(p, 0);
    rest_of_line(p);

    while !p.at_end() {
        let closing = p.at(fence) && run_len(p, 0) >= open_len;
        rest_of_line(p);
        if closing {
            break;
        }
    }
    m.complete(p, SyntaxKind::FENCED_CODE);
}

/// Lines of text until a blank line or a line that opens another block.
fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();
    loop {
        inline::inline_until_newline(p);
        if !p.eat(SyntaxKind::NEWLINE)
            || p.at_end()
            || p.at(SyntaxKind::NEWLINE)
            || classify(p) != LineStart::Text
        {
            break;
        }
    }
    m.complete(p, SyntaxKind::PARAGRAPH);
}
