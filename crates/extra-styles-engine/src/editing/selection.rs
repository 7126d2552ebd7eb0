use crate::rope::Span;

/// One selection range. `anchor` stays put while `head` follows the cursor,
/// so `head < anchor` for a backwards selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn from(self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(self) -> bool {
        self.anchor == self.head
    }

    /// Same range with `anchor <= head`.
    pub fn normalized(self) -> Self {
        Self {
            anchor: self.from(),
            head: self.to(),
        }
    }

    pub fn span(self) -> Span {
        Span::new(self.from(), self.to())
    }
}

/// Normalise every selection and sort them by start position.
pub fn reorder(selections: &[Selection]) -> Vec<Selection> {
    let mut ordered: Vec<Selection> = selections.iter().map(|s| s.normalized()).collect();
    ordered.sort_by_key(|s| (s.anchor, s.head));
    ordered
}

/// True if any selection touches `span`, ends included.
pub fn any_touches(selections: &[Selection], span: Span) -> bool {
    selections
        .iter()
        .any(|sel| sel.from() <= span.end && sel.to() >= span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reorder_normalises_and_sorts() {
        let ordered = reorder(&[Selection::new(9, 4), Selection::cursor(1)]);
        assert_eq!(ordered, vec![Selection::cursor(1), Selection::new(4, 9)]);
    }

    #[test]
    fn touching_ends_count_as_overlap() {
        let span = Span::new(3, 10);
        assert!(any_touches(&[Selection::cursor(10)], span));
        assert!(any_touches(&[Selection::new(12, 3)], span));
        assert!(!any_touches(&[Selection::cursor(11)], span));
        assert!(!any_touches(&[], span));
    }
}
