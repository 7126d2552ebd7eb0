//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within blocks: code spans and the
//! delimiter-run styles that may wrap them. Unlike blocks, inline parsing is
//! driven by **special characters** rather than line-start patterns.
//!
//! ## Dispatch Logic
//!
//! The [`inline_element`] function checks the current token:
//!
//! | Token | Possible Element |
//! |-------|-----------------|
//! | `` ` `` | Code span |
//! | `*`, `_` | Emphasis or strong |
//! | `~~` | Strikethrough |
//! | `==` | Highlight |
//! | `%%` | Comment |
//! | (other) | Plain text |
//!
//! ## Code Spans
//!
//! A code span is built from three children so consumers can tell the
//! delimiter glyphs from the content:
//!
//! ```text
//! CODE_SPAN
//!   CODE_MARKER   "`"
//!   CODE_TEXT     "_styled_"
//!   CODE_MARKER   "`"
//! ```
//!
//! Code spans bind tighter than every other inline construct: a closing
//! delimiter inside a code span never closes the surrounding emphasis.
//!
//! ## Error Tolerance
//!
//! Every construct looks ahead for its closing delimiter on the same line
//! before opening a node. When none exists the opening delimiters are
//! consumed as plain tokens, so unclosed markup never produces a node and
//! every byte is still preserved.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse inline content until newline or EOF.
///
/// This is the main entry point called by block parsers. It consumes tokens
/// until it hits a newline, dispatching to specific inline element handlers.
pub fn inline_until_newline(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        inline_element(p, None);
    }
}

/// Parse a single inline element.
///
/// `limit` is the absolute token position the element must not reach; it is
/// set when parsing the content of an enclosing construct.
fn inline_element(p: &mut Parser<'_, '_>, limit: Option<usize>) {
    match p.current() {
        SyntaxKind::BACKTICK => code_span(p, limit),
        SyntaxKind::STAR => emphasis_or_strong(p, SyntaxKind::STAR, limit),
        SyntaxKind::UNDERSCORE => emphasis_or_strong(p, SyntaxKind::UNDERSCORE, limit),
        SyntaxKind::TILDE => paired(p, SyntaxKind::TILDE, SyntaxKind::STRIKETHROUGH, limit),
        SyntaxKind::EQ => paired(p, SyntaxKind::EQ, SyntaxKind::HIGHLIGHT, limit),
        SyntaxKind::PERCENT => paired(p, SyntaxKind::PERCENT, SyntaxKind::COMMENT, limit),
        _ => {
            // Plain text - just consume the token
            p.bump();
        }
    }
}

/// Length of the run of `kind` tokens starting `offset` tokens ahead.
fn run_len(p: &Parser<'_, '_>, kind: SyntaxKind, offset: usize) -> usize {
    let mut n = 0;
    while p.nth(offset + n) == kind {
        n += 1;
    }
    n
}

/// True when the token `offset` ahead ends the current inline scope.
fn at_scope_end(p: &Parser<'_, '_>, offset: usize, limit: Option<usize>) -> bool {
    if matches!(p.nth(offset), SyntaxKind::EOF | SyntaxKind::NEWLINE) {
        return true;
    }
    limit.is_some_and(|limit| p.position() + offset >= limit)
}

/// Find the closing backtick run for a code span opened by `open_count`
/// backticks at the current position.
///
/// Returns the offset of the closing run relative to the current position.
fn find_code_close(p: &Parser<'_, '_>, open_count: usize, limit: Option<usize>) -> Option<usize> {
    let mut i = open_count;
    while !at_scope_end(p, i, limit) {
        if p.nth(i) == SyntaxKind::BACKTICK {
            let run = run_len(p, SyntaxKind::BACKTICK, i);
            if run == open_count {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Skip over a code span starting `offset` tokens ahead, if there is one.
///
/// Returns the offset just past the span, or past the backtick run when the
/// run does not open a complete span.
fn skip_backticks(p: &Parser<'_, '_>, offset: usize, limit: Option<usize>) -> usize {
    let run = run_len(p, SyntaxKind::BACKTICK, offset);
    let mut i = run;
    while !at_scope_end(p, offset + i, limit) {
        if p.nth(offset + i) == SyntaxKind::BACKTICK {
            let close = run_len(p, SyntaxKind::BACKTICK, offset + i);
            if close == run {
                return offset + i + close;
            }
            i += close;
        } else {
            i += 1;
        }
    }
    offset + run
}

/// Find a closing run of exactly `count` `delimiter` tokens, starting the
/// search `count` tokens ahead.
///
/// Code spans are skipped as a whole so their content never closes the
/// enclosing construct.
fn find_run_close(
    p: &Parser<'_, '_>,
    delimiter: SyntaxKind,
    count: usize,
    limit: Option<usize>,
) -> Option<usize> {
    let mut i = count;
    while !at_scope_end(p, i, limit) {
        match p.nth(i) {
            SyntaxKind::BACKTICK => i = skip_backticks(p, i, limit),
            k if k == delimiter => {
                let run = run_len(p, delimiter, i);
                if run == count {
                    return Some(i);
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    None
}

/// Parse a code span `code`.
fn code_span(p: &mut Parser<'_, '_>, limit: Option<usize>) {
    let open_count = run_len(p, SyntaxKind::BACKTICK, 0);

    let Some(close_at) = find_code_close(p, open_count, limit) else {
        // Unclosed - the backticks are plain text
        for _ in 0..open_count {
            p.bump();
        }
        return;
    };

    let m = p.start();
    code_marker(p, open_count);

    // The token after the opening run is never a backtick, so the content
    // always holds at least one token.
    let text = p.start();
    for _ in open_count..close_at {
        p.bump();
    }
    text.complete(p, SyntaxKind::CODE_TEXT);

    code_marker(p, open_count);
    m.complete(p, SyntaxKind::CODE_SPAN);
}

fn code_marker(p: &mut Parser<'_, '_>, count: usize) {
    let m = p.start();
    for _ in 0..count {
        p.bump();
    }
    m.complete(p, SyntaxKind::CODE_MARKER);
}

/// Parse the content of a construct up to (not including) `end`.
fn content_until(p: &mut Parser<'_, '_>, end: usize) {
    while p.position() < end && !p.at_end() {
        inline_element(p, Some(end));
    }
}

/// Parse emphasis *text* or strong **text** (or underscore variants).
fn emphasis_or_strong(p: &mut Parser<'_, '_>, delimiter: SyntaxKind, limit: Option<usize>) {
    // Intraword underscores (snake_case) never open emphasis
    if delimiter == SyntaxKind::UNDERSCORE && p.prev() == SyntaxKind::TEXT {
        p.bump();
        return;
    }

    let run = run_len(p, delimiter, 0);
    let counts: &[usize] = if run >= 2 { &[2, 1] } else { &[1] };

    for &count in counts {
        let close_at = match find_run_close(p, delimiter, count, limit) {
            // Empty content is not a construct
            Some(at) if at > count => at,
            _ => continue,
        };
        if delimiter == SyntaxKind::UNDERSCORE && p.nth(close_at + count) == SyntaxKind::TEXT {
            continue;
        }

        let m = p.start();
        for _ in 0..count {
            p.bump();
        }
        let end = p.position() + close_at - count;
        content_until(p, end);
        for _ in 0..count {
            p.bump();
        }

        let kind = if count == 2 {
            SyntaxKind::STRONG
        } else {
            SyntaxKind::EMPHASIS
        };
        m.complete(p, kind);
        return;
    }

    // No matching close - plain text
    p.bump();
}

/// Parse a construct delimited by a doubled glyph: `~~x~~`, `==x==`, `%%x%%`.
fn paired(p: &mut Parser<'_, '_>, delimiter: SyntaxKind, kind: SyntaxKind, limit: Option<usize>) {
    if p.nth(1) != delimiter || run_len(p, delimiter, 0) != 2 {
        p.bump();
        return;
    }

    let close_at = match find_run_close(p, delimiter, 2, limit) {
        // Empty content is not a construct
        Some(at) if at > 2 => at,
        _ => {
            p.bump();
            return;
        }
    };

    let m = p.start();
    p.bump();
    p.bump();
    let end = p.position() + close_at - 2;
    content_until(p, end);
    p.bump();
    p.bump();
    m.complete(p, kind);
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn find_node(tree: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
        tree.descendants().find(|n| n.kind() == kind)
    }

    fn texts_of(tree: &SyntaxNode, kind: SyntaxKind) -> Vec<String> {
        tree.descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[test]
    fn parse_code_span() {
        let tree = parse("Use `code` here.\n");
        let code = find_node(&tree, SyntaxKind::CODE_SPAN).unwrap();
        assert_eq!(code.text().to_string(), "`code`");
        assert_eq!(texts_of(&tree, SyntaxKind::CODE_TEXT), vec!["code"]);
    }

    #[test]
    fn code_span_children_split_markers_from_text() {
        let tree = parse("`_under_`\n");
        let code = find_node(&tree, SyntaxKind::CODE_SPAN).unwrap();
        let kinds: Vec<_> = code.children().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::CODE_MARKER,
                SyntaxKind::CODE_TEXT,
                SyntaxKind::CODE_MARKER
            ]
        );

        let text = find_node(&tree, SyntaxKind::CODE_TEXT).unwrap();
        assert_eq!(u32::from(text.text_range().start()), 1);
        assert_eq!(u32::from(text.text_range().end()), 8);
    }

    #[test]
    fn parse_double_backtick_code_span() {
        let tree = parse("Use ``code with ` backtick`` here.\n");
        assert_eq!(
            texts_of(&tree, SyntaxKind::CODE_TEXT),
            vec!["code with ` backtick"]
        );
    }

    #[test]
    fn unclosed_code_span_is_text() {
        let input = "And `unclosed code span\n";
        let tree = parse(input);
        assert!(find_node(&tree, SyntaxKind::CODE_SPAN).is_none());
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn code_span_does_not_cross_lines() {
        let tree = parse("`one\ntwo`\n");
        assert!(find_node(&tree, SyntaxKind::CODE_SPAN).is_none());
    }

    #[test]
    fn parse_emphasis() {
        let tree = parse("This is *emphasized* text.\n");
        let em = find_node(&tree, SyntaxKind::EMPHASIS).unwrap();
        assert_eq!(em.text().to_string(), "*emphasized*");
    }

    #[test]
    fn parse_strong() {
        let tree = parse("This is **strong** text.\n");
        let strong = find_node(&tree, SyntaxKind::STRONG).unwrap();
        assert_eq!(strong.text().to_string(), "**strong**");
    }

    #[test]
    fn parse_underscore_emphasis_and_strong() {
        let tree = parse("Both _em_ and __strong__ work.\n");
        assert_eq!(texts_of(&tree, SyntaxKind::EMPHASIS), vec!["_em_"]);
        assert_eq!(texts_of(&tree, SyntaxKind::STRONG), vec!["__strong__"]);
    }

    #[test]
    fn intraword_underscore_is_text() {
        let tree = parse("snake_case_name\n");
        assert!(find_node(&tree, SyntaxKind::EMPHASIS).is_none());
    }

    #[test]
    fn strong_containing_emphasis() {
        let tree = parse("**a *b* c**\n");
        let strong = find_node(&tree, SyntaxKind::STRONG).unwrap();
        let em = find_node(&strong, SyntaxKind::EMPHASIS).unwrap();
        assert_eq!(em.text().to_string(), "*b*");
    }

    #[test]
    fn code_span_nested_in_styles() {
        let input = "**bold `_u_`** ==mark `^s^`== ~~gone `!h!`~~ %%note `_c_`%%\n";
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);

        for (style, code) in [
            (SyntaxKind::STRONG, "_u_"),
            (SyntaxKind::HIGHLIGHT, "^s^"),
            (SyntaxKind::STRIKETHROUGH, "!h!"),
            (SyntaxKind::COMMENT, "_c_"),
        ] {
            let node = find_node(&tree, style).unwrap_or_else(|| panic!("{style:?} missing"));
            assert_eq!(texts_of(&node, SyntaxKind::CODE_TEXT), vec![code]);
        }
    }

    #[test]
    fn delimiter_inside_code_span_does_not_close_emphasis() {
        let tree = parse("*a `b*` c*\n");
        let em = find_node(&tree, SyntaxKind::EMPHASIS).unwrap();
        assert_eq!(em.text().to_string(), "*a `b*` c*");
        assert_eq!(texts_of(&em, SyntaxKind::CODE_TEXT), vec!["b*"]);
    }

    #[rstest]
    #[case::unclosed_emphasis("Some *half done emphasis\n", SyntaxKind::EMPHASIS)]
    #[case::single_tilde("about ~5 minutes\n", SyntaxKind::STRIKETHROUGH)]
    #[case::empty_highlight("a ==== b\n", SyntaxKind::HIGHLIGHT)]
    #[case::unclosed_comment("100%% sure\n", SyntaxKind::COMMENT)]
    fn malformed_markup_is_text(#[case] input: &str, #[case] kind: SyntaxKind) {
        let tree = parse(input);
        assert!(find_node(&tree, kind).is_none());
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn inline_preserves_text() {
        let input = "Text with `code` and *em* and ==mark== and ~~del~~ and %%c%%.\n";
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }
}
