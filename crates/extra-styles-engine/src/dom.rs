//! Minimal element tree for rendered styles.
//!
//! Elements are shared handles (`Rc<RefCell<_>>`): a widget hands its
//! element to the host synchronously and the render adapter fills it in on
//! the same handle. An element stays `attached` until the host drops it
//! from the view; content written to a detached element is discarded.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    attached: bool,
}

/// Handle to a shared element. Cloning the handle does not copy the element.
#[derive(Debug, Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

impl Element {
    pub fn new(tag: &str) -> Self {
        Element(Rc::new(RefCell::new(ElementData {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            attached: true,
        })))
    }

    /// True if both handles point at the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }

    pub fn detach(&self) {
        self.0.borrow_mut().attached = false;
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        match data.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn append_child(&self, child: Element) {
        self.0.borrow_mut().children.push(Node::Element(child));
    }

    pub fn append_text(&self, text: &str) {
        self.0.borrow_mut().children.push(Node::Text(text.to_string()));
    }

    pub fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.0.borrow().children {
            match child {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) => out.push_str(text),
            }
        }
    }

    /// Serialise to HTML. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        out.push('<');
        out.push_str(&data.tag);
        if !data.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(
                &data.classes.join(" "),
            ));
            out.push('"');
        }
        for (name, value) in &data.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
        for child in &data.children {
            match child {
                Node::Element(el) => el.write_html(out),
                Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            }
        }
        out.push_str("</");
        out.push_str(&data.tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classes_are_a_set() {
        let el = Element::new("span");
        el.add_class("a");
        el.add_class("b");
        el.add_class("a");
        assert_eq!(el.classes(), vec!["a", "b"]);

        el.remove_class("a");
        assert!(!el.has_class("a"));
        assert!(el.has_class("b"));
    }

    #[test]
    fn handles_share_state() {
        let el = Element::new("span");
        let other = el.clone();
        other.append_text("hi");
        assert!(el.ptr_eq(&other));
        assert_eq!(el.text_content(), "hi");
        assert!(!el.ptr_eq(&Element::new("span")));
    }

    #[test]
    fn html_is_escaped() {
        let outer = Element::new("span");
        outer.add_class("wrap");
        let inner = Element::new("u");
        inner.set_attribute("title", "a \"quoted\" <b>");
        inner.append_text("1 < 2 & 3");
        outer.append_child(inner);

        assert_eq!(
            outer.to_html(),
            r#"<span class="wrap"><u title="a &quot;quoted&quot; &lt;b&gt;">1 &lt; 2 &amp; 3</u></span>"#
        );
    }

    #[test]
    fn set_attribute_replaces() {
        let el = Element::new("span");
        el.set_attribute("style", "color: red");
        el.set_attribute("style", "color: blue");
        assert_eq!(el.attribute("style").as_deref(), Some("color: blue"));
        assert_eq!(el.to_html(), r#"<span style="color: blue"></span>"#);
    }

    #[test]
    fn detach() {
        let el = Element::new("span");
        assert!(el.is_attached());
        el.detach();
        assert!(!el.is_attached());
    }
}
