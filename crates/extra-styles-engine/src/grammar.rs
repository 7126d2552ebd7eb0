//! Matching inline-code text against the configured style rules.
//!
//! Each rule becomes an anchored pattern `^open(?s:.*)close$` with the
//! delimiters escaped, so `text` must start with `open` and end with
//! `close`. Rules are tried in list order and the first match wins.

use extra_styles_config::{Fingerprint, Settings, StyleRule};
use regex::Regex;

/// Outcome of matching one piece of inline-code text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// A rule matched. `inner_text` is everything between its delimiters
    /// and starts `open_len` bytes into the matched text.
    Styled {
        style_name: String,
        inner_text: String,
        open_len: usize,
    },
    /// The text could not be evaluated. Hosts log it and leave the span raw.
    Error { message: String },
    /// No rule matched; the text is ordinary inline code.
    NoMatch,
}

fn pattern_for(rule: &StyleRule) -> String {
    format!(
        "^{}(?s:(?P<text>.*)){}$",
        regex::escape(&rule.open),
        regex::escape(&rule.close)
    )
}

#[derive(Debug, Clone)]
enum Matcher {
    Pattern {
        style_name: String,
        open_len: usize,
        regex: Regex,
    },
    /// Never matches: the rule has no delimiters or its pattern failed to
    /// compile. Later rules are still tried.
    Inert,
}

impl Matcher {
    fn compile(rule: &StyleRule) -> Self {
        // Without delimiters the rule would claim every code span.
        if rule.open.is_empty() && rule.close.is_empty() {
            log::warn!("Style {:?} has no delimiters and is skipped", rule.name);
            return Matcher::Inert;
        }
        match Regex::new(&pattern_for(rule)) {
            Ok(regex) => Matcher::Pattern {
                style_name: rule.name.clone(),
                open_len: rule.open.len(),
                regex,
            },
            Err(err) => {
                log::warn!("Style {:?} cannot be matched: {err}", rule.name);
                Matcher::Inert
            }
        }
    }

    fn try_match(&self, text: &str) -> Option<ParseResult> {
        match self {
            Matcher::Pattern {
                style_name,
                open_len,
                regex,
            } => {
                let captures = regex.captures(text)?;
                let inner_text = captures.name("text").map_or("", |m| m.as_str());
                Some(ParseResult::Styled {
                    style_name: style_name.clone(),
                    inner_text: inner_text.to_string(),
                    open_len: *open_len,
                })
            }
            Matcher::Inert => None,
        }
    }
}

/// Match `text` against a single rule.
///
/// Returns `None` when the rule does not apply, so callers can move on to
/// the next rule.
pub fn try_match(rule: &StyleRule, text: &str) -> Option<ParseResult> {
    Matcher::compile(rule).try_match(text)
}

/// Match `text` against `rules` in order. Earlier rules take precedence.
pub fn parse(rules: &[StyleRule], text: &str) -> ParseResult {
    rules
        .iter()
        .find_map(|rule| try_match(rule, text))
        .unwrap_or(ParseResult::NoMatch)
}

/// Pre-compiled matchers for one configuration.
///
/// Compiling a regex per rule per code span is wasteful on every keystroke,
/// so the render pass keeps a `Grammar` and only rebuilds it when the
/// settings fingerprint changes.
#[derive(Debug, Clone)]
pub struct Grammar {
    fingerprint: Fingerprint,
    matchers: Vec<Matcher>,
}

impl Grammar {
    pub fn new(settings: &Settings) -> Self {
        Self {
            fingerprint: settings.fingerprint(),
            matchers: settings.style_list.iter().map(Matcher::compile).collect(),
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Rebuild if `settings` differ from the ones this grammar was built
    /// from. Returns true when a rebuild happened.
    pub fn refresh(&mut self, settings: &Settings) -> bool {
        let fingerprint = settings.fingerprint();
        if fingerprint == self.fingerprint {
            return false;
        }
        log::debug!("Style settings changed, recompiling {} rules", settings.style_list.len());
        *self = Self {
            fingerprint,
            matchers: settings.style_list.iter().map(Matcher::compile).collect(),
        };
        true
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.try_match(text))
            .unwrap_or(ParseResult::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn styled(style_name: &str, open: &str, inner_text: &str) -> ParseResult {
        ParseResult::Styled {
            style_name: style_name.to_string(),
            inner_text: inner_text.to_string(),
            open_len: open.len(),
        }
    }

    #[rstest]
    #[case::underline("_hello_", styled("Underline", "_", "hello"))]
    #[case::superscript("^2^", styled("Superscript", "^", "2"))]
    #[case::subscript("\\i/", styled("Subscript", "\\", "i"))]
    #[case::hidden("!secret!", styled("Hidden", "!", "secret"))]
    #[case::empty_inner("__", styled("Underline", "_", ""))]
    #[case::plain_code("let x = 1;", ParseResult::NoMatch)]
    #[case::open_only("_hello", ParseResult::NoMatch)]
    #[case::single_delimiter("_", ParseResult::NoMatch)]
    fn default_rules(#[case] text: &str, #[case] expected: ParseResult) {
        let settings = Settings::default();
        assert_eq!(parse(&settings.style_list, text), expected);
        assert_eq!(Grammar::new(&settings).parse(text), expected);
    }

    #[test]
    fn inner_text_may_contain_delimiters_and_newlines() {
        let rule = StyleRule::new("Underline", "_", "_");
        assert_eq!(try_match(&rule, "_a_b_"), Some(styled("Underline", "_", "a_b")));
        assert_eq!(try_match(&rule, "_a\nb_"), Some(styled("Underline", "_", "a\nb")));
    }

    #[test]
    fn metacharacters_are_literal() {
        let rule = StyleRule::new("Box", "[(", ")]");
        assert_eq!(try_match(&rule, "[(x)]"), Some(styled("Box", "[(", "x")));
        assert_eq!(try_match(&rule, "((x))"), None);

        let dots = StyleRule::new("Dots", ".", ".");
        assert_eq!(try_match(&dots, "axb"), None);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        let rules = vec![
            StyleRule::new("Wide", "<", ">"),
            StyleRule::new("Narrow", "<<", ">>"),
        ];
        assert_eq!(parse(&rules, "<<x>>"), styled("Wide", "<", "<x>"));

        let swapped = vec![rules[1].clone(), rules[0].clone()];
        assert_eq!(parse(&swapped, "<<x>>"), styled("Narrow", "<<", "x"));
    }

    #[test]
    fn multi_byte_delimiters() {
        let rule = StyleRule::new("Quote", "«", "»");
        assert_eq!(try_match(&rule, "«ça»"), Some(styled("Quote", "«", "ça")));
    }

    #[test]
    fn undelimited_rule_is_skipped() {
        let rules = vec![
            StyleRule::new("Underline", "_", "_"),
            StyleRule::new("Blank", "", ""),
            StyleRule::new("Superscript", "^", "^"),
        ];
        assert_eq!(try_match(&rules[1], "x"), None);
        assert_eq!(parse(&rules, "^2^"), styled("Superscript", "^", "2"));
        assert_eq!(parse(&rules, "plain"), ParseResult::NoMatch);

        let settings = Settings::new(rules);
        assert_eq!(Grammar::new(&settings).parse("^2^"), styled("Superscript", "^", "2"));
    }

    #[test]
    fn refresh_only_rebuilds_on_change() {
        let mut settings = Settings::default();
        let mut grammar = Grammar::new(&settings);
        assert!(!grammar.refresh(&settings));

        settings.style_list.insert(0, StyleRule::new("Mark", "_", "_"));
        assert!(grammar.refresh(&settings));
        assert_eq!(grammar.fingerprint(), &settings.fingerprint());
        assert_eq!(grammar.parse("_x_"), styled("Mark", "_", "x"));
    }
}
