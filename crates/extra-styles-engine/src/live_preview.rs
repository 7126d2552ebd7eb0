//! Keeps the decoration set of one editor view up to date.

use extra_styles_config::SettingsProvider;

use crate::decorations::{DecorationEngine, DecorationSet};
use crate::editing::ViewState;
use crate::grammar::Grammar;

/// What changed in the view since the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    pub focus_changed: bool,
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_set: bool,
}

impl ViewUpdate {
    pub fn any(self) -> bool {
        self.focus_changed || self.doc_changed || self.viewport_changed || self.selection_set
    }
}

/// Live-preview state for one view.
///
/// Settings are read from the provider at the start of every update, so
/// edits made elsewhere are picked up on the next pass.
pub struct LivePreview<P: SettingsProvider> {
    provider: P,
    engine: DecorationEngine,
    grammar: Grammar,
    decorations: DecorationSet,
    live: bool,
    /// Forces the next update to recompute.
    stale: bool,
}

impl<P: SettingsProvider> LivePreview<P> {
    pub fn new(provider: P) -> Self {
        Self::with_engine(provider, DecorationEngine::default())
    }

    pub fn with_engine(provider: P, engine: DecorationEngine) -> Self {
        let grammar = Grammar::new(&provider.settings());
        Self {
            provider,
            engine,
            grammar,
            decorations: DecorationSet::empty(),
            live: true,
            stale: true,
        }
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Switch between live preview and source mode. Source mode shows no
    /// decorations; switching back recomputes on the next update.
    pub fn set_live(&mut self, live: bool) {
        if self.live != live {
            log::debug!("Live preview {}", if live { "enabled" } else { "disabled" });
            self.live = live;
            self.stale = true;
        }
    }

    /// Bring the decoration set up to date with `view`.
    ///
    /// Recomputes when the update reports a focus, document, viewport or
    /// selection change, or when the settings fingerprint moved. Otherwise
    /// the previous set is kept as is. A widget takes over the element of a
    /// previous widget with the same style name and key.
    pub fn update(&mut self, view: ViewState<'_>, update: ViewUpdate) -> &DecorationSet {
        if !self.live {
            if !self.decorations.is_empty() {
                Self::detach_all(std::mem::take(&mut self.decorations));
            }
            return &self.decorations;
        }

        let settings = self.provider.settings();
        let settings_changed = self.grammar.refresh(&settings);

        if !(self.stale || settings_changed || update.any()) {
            return &self.decorations;
        }
        self.stale = false;

        let next = self.engine.compute(view, &self.grammar, &settings);
        let previous = std::mem::replace(&mut self.decorations, DecorationSet::empty()).into_vec();
        let mut reused = vec![false; previous.len()];

        let mut decorations = next.into_vec();
        for decoration in &mut decorations {
            // Same style and key; the decoration at the same range wins.
            let matching = previous
                .iter()
                .enumerate()
                .filter(|(i, old)| {
                    !reused[*i]
                        && old.widget == decoration.widget
                        && old.widget.style_name() == decoration.widget.style_name()
                })
                .min_by_key(|(_, old)| old.range != decoration.range);
            if let Some((i, old)) = matching {
                decoration.widget.adopt(&old.widget);
                reused[i] = true;
            }
        }
        for (old, _) in previous.iter().zip(&reused).filter(|(_, reused)| !**reused) {
            old.widget.element().detach();
        }

        log::trace!("Recomputed {} decorations", decorations.len());
        self.decorations = DecorationSet::new(decorations);
        &self.decorations
    }

    fn detach_all(set: DecorationSet) {
        for decoration in &set {
            decoration.widget.element().detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Cmd, Document};
    use crate::rope::Span;
    use extra_styles_config::{Settings, StyleRule};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ANY: ViewUpdate = ViewUpdate {
        focus_changed: false,
        doc_changed: true,
        viewport_changed: false,
        selection_set: false,
    };

    fn visible(doc: &Document) -> Vec<Span> {
        vec![Span::new(0, doc.len())]
    }

    fn doc(text: &str) -> Document {
        let mut doc = Document::from_text(text);
        doc.set_cursor(0);
        doc
    }

    #[test]
    fn first_update_computes() {
        let doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        let set = preview.update(doc.view_state(&range), ViewUpdate::default());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn no_trigger_keeps_previous_set() {
        let mut doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        preview.update(doc.view_state(&range), ViewUpdate::default());

        // Cursor moves onto the span but nobody reports it.
        doc.set_cursor(4);
        let range = visible(&doc);
        let set = preview.update(doc.view_state(&range), ViewUpdate::default());
        assert_eq!(set.len(), 1);

        let set = preview.update(
            doc.view_state(&range),
            ViewUpdate {
                selection_set: true,
                ..Default::default()
            },
        );
        assert!(set.is_empty());
    }

    #[test]
    fn equal_widgets_keep_their_element() {
        let mut doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        let before = preview.update(doc.view_state(&range), ANY).iter().next().unwrap().widget.element().clone();

        // Edit elsewhere: the span moves but its key does not change.
        doc.apply(Cmd::InsertText {
            at: 0,
            text: "**`_x_`** ".to_string(),
        });
        doc.set_cursor(doc.len());
        let range = visible(&doc);
        let set = preview.update(doc.view_state(&range), ANY);

        assert_eq!(set.len(), 2);
        let elements: Vec<_> = set.iter().map(|d| d.widget.element().clone()).collect();
        assert!(elements[0].ptr_eq(&before));
        assert!(elements[0].has_class("cm-strong"));
        assert!(!elements[1].ptr_eq(&before));
        assert!(before.is_attached());
    }

    #[test]
    fn elements_are_not_shared_across_styles() {
        let mut doc = doc("`_x_` `^x^` z\n");
        doc.set_cursor(1);
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        let set = preview.update(doc.view_state(&range), ANY);
        assert_eq!(set.len(), 1);
        let sup = set.iter().next().unwrap().widget.element().clone();
        assert!(sup.to_html().contains("<sup>"));

        doc.set_cursor(8);
        let range = visible(&doc);
        let set = preview.update(
            doc.view_state(&range),
            ViewUpdate {
                selection_set: true,
                ..Default::default()
            },
        );
        assert_eq!(set.len(), 1);
        let underline = set.iter().next().unwrap();
        assert_eq!(underline.widget.style_name(), "Underline");
        let html = underline.widget.element().to_html();
        assert!(!html.contains("<sup>"), "{html}");
        assert!(html.contains("text-decoration: underline"), "{html}");
        assert!(!underline.widget.element().ptr_eq(&sup));
        assert!(!sup.is_attached());
    }

    #[test]
    fn dropped_widgets_are_detached() {
        let mut doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        let old = preview.update(doc.view_state(&range), ANY).iter().next().unwrap().widget.element().clone();

        doc.apply(Cmd::ReplaceRange {
            range: 4..5,
            text: "y".to_string(),
        });
        doc.set_cursor(0);
        let range = visible(&doc);
        let set = preview.update(doc.view_state(&range), ANY);
        assert_eq!(set.iter().next().unwrap().widget.inner_text(), "y");
        assert!(!old.is_attached());
    }

    #[test]
    fn settings_change_triggers_recompute() {
        let shared = Rc::new(RefCell::new(Settings::default()));
        let doc = doc("a `<x>` b\n");
        let mut preview = LivePreview::new(shared.clone());
        let range = visible(&doc);
        assert!(preview.update(doc.view_state(&range), ANY).is_empty());

        shared
            .borrow_mut()
            .style_list
            .push(StyleRule::new("Angle", "<", ">").with_tag("kbd"));
        let set = preview.update(doc.view_state(&range), ViewUpdate::default());
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().widget.style_name(), "Angle");
    }

    #[test]
    fn settings_change_invalidates_widgets() {
        let shared = Rc::new(RefCell::new(Settings::default()));
        let doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(shared.clone());
        let range = visible(&doc);
        let old = preview.update(doc.view_state(&range), ANY).iter().next().unwrap().widget.element().clone();

        shared.borrow_mut().set_css(0, "text-decoration: overline").unwrap();
        let set = preview.update(doc.view_state(&range), ViewUpdate::default());
        let new = set.iter().next().unwrap().widget.element().clone();
        assert!(!new.ptr_eq(&old));
        assert!(new.to_html().contains("overline"));
    }

    #[test]
    fn source_mode_has_no_decorations() {
        let doc = doc("a `_x_` b\n");
        let mut preview = LivePreview::new(Settings::default());
        let range = visible(&doc);
        let old = preview.update(doc.view_state(&range), ANY).iter().next().unwrap().widget.element().clone();

        preview.set_live(false);
        assert!(preview.update(doc.view_state(&range), ANY).is_empty());
        assert!(!old.is_attached());

        preview.set_live(true);
        assert_eq!(preview.update(doc.view_state(&range), ViewUpdate::default()).len(), 1);
    }
}
