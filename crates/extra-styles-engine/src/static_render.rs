//! Render a whole Markdown document to HTML with styles applied.
//!
//! Each inline code span whose text matches a style becomes a `code`
//! element holding the rendered style, the same shape the live view shows.

use extra_styles_config::Settings;
use pulldown_cmark::{CowStr, Event, Options, Parser, html};

use crate::dom::Element;
use crate::grammar::{Grammar, ParseResult};
use crate::render;

pub fn render_html(markdown: &str, settings: &Settings) -> String {
    render_html_with(markdown, &Grammar::new(settings), settings)
}

/// Like [`render_html`], reusing an already compiled grammar.
pub fn render_html_with(markdown: &str, grammar: &Grammar, settings: &Settings) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Code(code) => style_code(code, grammar, settings),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn style_code<'a>(code: CowStr<'a>, grammar: &Grammar, settings: &Settings) -> Event<'a> {
    match grammar.parse(&code) {
        ParseResult::Styled {
            style_name,
            inner_text,
            ..
        } => {
            let container = Element::new("code");
            render::render_into(&container, settings, &style_name, &inner_text);
            Event::InlineHtml(container.to_html().into())
        }
        ParseResult::Error { message } => {
            log::error!("Cannot style code span {:?}: {message}", &*code);
            Event::Code(code)
        }
        ParseResult::NoMatch => Event::Code(code),
    }
}
