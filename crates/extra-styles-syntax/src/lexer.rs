//! Logos tokenizer.
//!
//! Every input byte lands in exactly one token, so concatenating token texts
//! gives back the source:
//!
//! ```
//! use extra_styles_syntax::lexer::lex;
//!
//! let input = "Say `^hi^`\n";
//! let text: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(text, input);
//! ```
//!
//! Only glyphs Markdown itself gives meaning to get their own kind. Style
//! delimiters such as `^`, `\` or `!` are plain text here; recognising them
//! is the engine's job once it has a code span's content.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Logos needs its own enum; [`lex`] maps it onto [`SyntaxKind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[token(">")]
    Gt,
    #[token("-")]
    Dash,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("`")]
    Backtick,
    #[token("~")]
    Tilde,
    #[token("_")]
    Underscore,
    #[token("=")]
    Eq,
    #[token("%")]
    Percent,
    #[token("#")]
    Hash,
    #[regex(r"[^\s>`*+#~_=%-]+")]
    Text,
}

impl From<RawToken> for SyntaxKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Whitespace => SyntaxKind::WHITESPACE,
            RawToken::Newline => SyntaxKind::NEWLINE,
            RawToken::Gt => SyntaxKind::GT,
            RawToken::Dash => SyntaxKind::DASH,
            RawToken::Star => SyntaxKind::STAR,
            RawToken::Plus => SyntaxKind::PLUS,
            RawToken::Backtick => SyntaxKind::BACKTICK,
            RawToken::Tilde => SyntaxKind::TILDE,
            RawToken::Underscore => SyntaxKind::UNDERSCORE,
            RawToken::Eq => SyntaxKind::EQ,
            RawToken::Percent => SyntaxKind::PERCENT,
            RawToken::Hash => SyntaxKind::HASH,
            RawToken::Text => SyntaxKind::TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

pub fn lex(input: &str) -> Vec<Token<'_>> {
    RawToken::lexer(input)
        .spanned()
        .map(|(raw, span)| Token {
            // Anything Logos rejects (a lone `\r`) is kept as text.
            kind: raw.map_or(SyntaxKind::TEXT, SyntaxKind::from),
            text: &input[span],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use crate::syntax_kind::SyntaxKind::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[rstest]
    #[case::empty("", vec![])]
    #[case::text("hello", vec![TEXT])]
    #[case::whitespace_run("  \t ", vec![WHITESPACE])]
    #[case::crlf("a\r\nb", vec![TEXT, NEWLINE, TEXT])]
    #[case::heading("## x", vec![HASH, HASH, WHITESPACE, TEXT])]
    #[case::quote("> x", vec![GT, WHITESPACE, TEXT])]
    #[case::list_markers("- * +", vec![DASH, WHITESPACE, STAR, WHITESPACE, PLUS])]
    #[case::styled_code("`_u_`", vec![BACKTICK, UNDERSCORE, TEXT, UNDERSCORE, BACKTICK])]
    #[case::highlight("==x==", vec![EQ, EQ, TEXT, EQ, EQ])]
    #[case::comment("%%x%%", vec![PERCENT, PERCENT, TEXT, PERCENT, PERCENT])]
    #[case::strikethrough("~~x~~", vec![TILDE, TILDE, TEXT, TILDE, TILDE])]
    #[case::fence("```rs\n", vec![BACKTICK, BACKTICK, BACKTICK, TEXT, NEWLINE])]
    fn token_kinds(#[case] input: &str, #[case] expected: Vec<SyntaxKind>) {
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn style_glyphs_stay_in_text() {
        let tokens = lex("^sup^\\sub/!x!");
        assert_eq!(
            tokens,
            vec![Token {
                kind: TEXT,
                text: "^sup^\\sub/!x!"
            }]
        );
    }

    #[test]
    fn lone_carriage_return_is_text() {
        assert_eq!(kinds("a\rb"), vec![TEXT, TEXT, TEXT]);
    }

    #[rstest]
    #[case("# Hello\n> quote\n- item")]
    #[case("## H\n\n> A *quote* with `_styled_`\n\n- ==item==\n  - %%note%%\n\n```rust\ncode\n```")]
    #[case("H`\\2/`O at 100°C")]
    fn every_byte_is_kept(#[case] input: &str) {
        let text: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(text, input);
    }
}
