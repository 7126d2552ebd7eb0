//! Turn a matched style into elements.

use extra_styles_config::{DEFAULT_TAG, Settings};

use crate::dom::Element;

/// Class on the span that wraps the styled element.
pub const STYLE_SPAN_CLASS: &str = "extra-styles-style-span";
/// Class added to whatever host element receives the styled span.
pub const STYLE_CONTAINER_CLASS: &str = "extra-styles-style-ctn";

/// Build the styled element for `text` under the rule named `style_name`:
/// a `span.extra-styles-style-span` holding one element of the rule's tag.
///
/// Unknown style names render as a plain `span` with no inline style.
pub fn render(settings: &Settings, style_name: &str, text: &str) -> Element {
    let rule = settings.get_style(style_name);
    if rule.is_none() {
        log::debug!("No style named {style_name:?}, rendering unstyled");
    }

    let wrapper = Element::new("span");
    wrapper.add_class(STYLE_SPAN_CLASS);

    let styled = Element::new(rule.map_or(DEFAULT_TAG, |rule| rule.tag()));
    styled.append_text(text);
    if let Some(style) = rule.map(|rule| style_attribute(&rule.css))
        && !style.is_empty()
    {
        styled.set_attribute("style", &style);
    }
    wrapper.append_child(styled);
    wrapper
}

/// Replace the contents of `container` with the rendered style.
///
/// Does nothing once the container has been detached from the view.
pub fn render_into(container: &Element, settings: &Settings, style_name: &str, text: &str) {
    if !container.is_attached() {
        log::trace!("Skipping fill-in of detached element for {style_name:?}");
        return;
    }
    let rendered = render(settings, style_name, text);
    container.add_class(STYLE_CONTAINER_CLASS);
    container.clear_children();
    container.append_child(rendered);
}

/// Collapse user CSS into a single-line `style` attribute value.
///
/// Declarations are split on `;` and newlines, trimmed, and empty ones
/// dropped, so `"a: b;;\n c: d;\n"` becomes `"a: b; c: d"`.
pub fn style_attribute(css: &str) -> String {
    css.split([';', '\n'])
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
