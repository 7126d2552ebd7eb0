//! Widgets standing in for styled code spans in the live view.

use std::time::Duration;

use extra_styles_config::Fingerprint;

use crate::decorations::CLASS_HINTS;
use crate::dom::Element;
use crate::scheduler::FOCUS_SETTLE_DELAY;

/// What makes two widgets interchangeable: same styled text under the same
/// settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetKey {
    pub inner_text: String,
    pub fingerprint: Fingerprint,
}

/// Pointer press in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of a widget's element in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Cursor placement produced by a pointer press on a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPlacement {
    /// Document offset to move the cursor to.
    pub cursor: usize,
    /// Delay before the host should re-focus the editor.
    pub focus_after: Duration,
}

/// A rendered style shown in place of its raw markup.
#[derive(Debug, Clone)]
pub struct StyleWidget {
    key: WidgetKey,
    style_name: String,
    classes: Vec<String>,
    /// Document offset where `inner_text` starts.
    content_start: usize,
    element: Element,
}

impl StyleWidget {
    pub fn new(
        style_name: impl Into<String>,
        inner_text: impl Into<String>,
        fingerprint: Fingerprint,
        classes: Vec<String>,
        content_start: usize,
    ) -> Self {
        Self {
            key: WidgetKey {
                inner_text: inner_text.into(),
                fingerprint,
            },
            style_name: style_name.into(),
            classes,
            content_start,
            element: Element::new("span"),
        }
    }

    pub fn key(&self) -> &WidgetKey {
        &self.key
    }

    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    pub fn inner_text(&self) -> &str {
        &self.key.inner_text
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn content_start(&self) -> usize {
        self.content_start
    }

    /// The element currently backing this widget.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Apply this widget's class hints to `element`. Only hint classes are
    /// touched; anything else on the element is left alone.
    pub fn reconcile_classes(&self, element: &Element) {
        for (_, class) in CLASS_HINTS {
            if self.classes.iter().any(|c| c == class) {
                element.add_class(class);
            } else {
                element.remove_class(class);
            }
        }
    }

    /// Hand the element to the host with its classes applied. Content is
    /// filled in separately by the render adapter.
    pub fn to_dom(&self) -> Element {
        self.reconcile_classes(&self.element);
        self.element.clone()
    }

    /// Take over `previous`'s element instead of using a fresh one.
    ///
    /// Used when an equal widget survives a re-render: the already-filled
    /// element is kept and only its classes are brought up to date.
    pub fn adopt(&mut self, previous: &StyleWidget) {
        if !self.element.ptr_eq(&previous.element) {
            self.element.detach();
            self.element = previous.element.clone();
        }
        self.reconcile_classes(&self.element);
    }

    /// Map a pointer press to a cursor position in the styled text.
    ///
    /// The x offset inside `rect` is taken as a fraction of the rendered
    /// text's character count, as if every character were equally wide.
    /// That is only exact for monospace rendering. Presses that cannot be
    /// mapped (zero-width box, non-finite coordinates) return `None`.
    pub fn pointer_down(&self, event: PointerEvent, rect: WidgetRect) -> Option<PointerPlacement> {
        if rect.width.is_nan()
            || rect.width <= 0.0
            || !event.x.is_finite()
            || !rect.x.is_finite()
        {
            return None;
        }
        let ratio = ((event.x - rect.x) / rect.width).clamp(0.0, 1.0);

        let text = self.inner_text();
        let char_count = text.chars().count();
        let char_index = (char_count as f64 * ratio).round() as usize;
        let byte_offset = text
            .char_indices()
            .nth(char_index)
            .map_or(text.len(), |(offset, _)| offset);

        Some(PointerPlacement {
            cursor: self.content_start + byte_offset,
            focus_after: FOCUS_SETTLE_DELAY,
        })
    }
}

/// Widgets are equal when their keys are. Classes and position are ignored;
/// class differences go through [`StyleWidget::reconcile_classes`].
impl PartialEq for StyleWidget {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for StyleWidget {}

#[cfg(test)]
mod tests {
    use super::*;
    use extra_styles_config::Settings;
    use pretty_assertions::assert_eq;

    fn widget(inner_text: &str, classes: &[&str]) -> StyleWidget {
        StyleWidget::new(
            "Underline",
            inner_text,
            Settings::default().fingerprint(),
            classes.iter().map(|c| c.to_string()).collect(),
            10,
        )
    }

    #[test]
    fn equality_ignores_classes_and_position() {
        let a = widget("hello", &["cm-strong"]);
        let mut b = widget("hello", &[]);
        b.content_start = 99;
        assert_eq!(a, b);
        assert_ne!(a, widget("hullo", &[]));
    }

    #[test]
    fn equality_depends_on_settings() {
        let a = widget("hello", &[]);
        let mut settings = Settings::default();
        settings.style_list.pop();
        let b = StyleWidget::new("Underline", "hello", settings.fingerprint(), Vec::new(), 10);
        assert_ne!(a, b);
    }

    #[test]
    fn reconcile_only_touches_hint_classes() {
        let w = widget("x", &["cm-em"]);
        let el = Element::new("span");
        el.add_class("cm-strong");
        el.add_class("host-owned");

        w.reconcile_classes(&el);
        assert_eq!(el.classes(), vec!["host-owned", "cm-em"]);
    }

    #[test]
    fn to_dom_returns_same_handle() {
        let w = widget("x", &["cm-highlight"]);
        let el = w.to_dom();
        assert!(el.ptr_eq(w.element()));
        assert!(el.has_class("cm-highlight"));
    }

    #[test]
    fn adopt_keeps_previous_element() {
        let previous = widget("x", &["cm-strong"]);
        let old_el = previous.to_dom();
        old_el.append_text("filled");

        let mut next = widget("x", &["cm-em"]);
        let fresh = next.element().clone();
        next.adopt(&previous);

        assert!(next.element().ptr_eq(&old_el));
        assert_eq!(old_el.classes(), vec!["cm-em"]);
        assert_eq!(old_el.text_content(), "filled");
        assert!(!fresh.is_attached());
    }

    #[test]
    fn pointer_maps_proportionally() {
        let w = widget("hello", &[]);
        let rect = WidgetRect {
            x: 100.0,
            y: 0.0,
            width: 50.0,
            height: 10.0,
        };

        let at = |x: f64| {
            w.pointer_down(PointerEvent { x, y: 5.0 }, rect)
                .map(|p| p.cursor)
        };
        assert_eq!(at(100.0), Some(10));
        assert_eq!(at(120.0), Some(12));
        assert_eq!(at(150.0), Some(15));
        assert_eq!(at(400.0), Some(15));

        let placement = w.pointer_down(PointerEvent { x: 110.0, y: 5.0 }, rect);
        assert_eq!(placement.map(|p| p.focus_after), Some(FOCUS_SETTLE_DELAY));
    }

    #[test]
    fn pointer_lands_on_char_boundaries() {
        let w = widget("héllo", &[]);
        let rect = WidgetRect {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 10.0,
        };
        let placement = w.pointer_down(PointerEvent { x: 20.0, y: 0.0 }, rect);
        // Two characters in, past the two-byte é.
        assert_eq!(placement.map(|p| p.cursor), Some(13));
    }

    #[test]
    fn unmappable_pointer_is_ignored() {
        let w = widget("hello", &[]);
        let flat = WidgetRect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 10.0,
        };
        assert_eq!(w.pointer_down(PointerEvent { x: 1.0, y: 1.0 }, flat), None);

        let rect = WidgetRect { width: 10.0, ..flat };
        assert_eq!(
            w.pointer_down(PointerEvent { x: f64::NAN, y: 1.0 }, rect),
            None
        );
    }
}
