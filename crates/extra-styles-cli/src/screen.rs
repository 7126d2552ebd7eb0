//! Lays out the visible part of a document as terminal rows, with styled
//! text standing in for each decoration.

use extra_styles_config::{Settings, StyleRule};
use extra_styles_engine::rope::Span;
use extra_styles_engine::{DecorationSet, PointerEvent, StyleWidget, WidgetRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{self, Line};

/// What a run of cells on a row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Raw document text starting at this offset.
    Text { start: usize },
    /// The decoration at this index of the set the screen was laid out from.
    Widget { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub col: u16,
    pub width: u16,
    pub target: Target,
}

/// Where a click on the screen lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Offset(usize),
    Widget {
        index: usize,
        event: PointerEvent,
        rect: WidgetRect,
    },
}

#[derive(Debug, Default)]
pub struct Screen {
    pub lines: Vec<Line<'static>>,
    pub segments: Vec<Vec<Segment>>,
    /// Row and column of the primary cursor when it is on screen.
    pub cursor: Option<(u16, u16)>,
    /// Document offset where each row's text ends.
    row_ends: Vec<usize>,
}

impl Screen {
    /// Resolve a click at `row`/`col`. Clicks right of a row's text land at
    /// the end of that row.
    pub fn hit(&self, text: &str, row: u16, col: u16) -> Option<Hit> {
        let segments = self.segments.get(usize::from(row))?;
        let segment = segments
            .iter()
            .copied()
            .find(|s| col >= s.col && col < s.col + s.width);

        match segment {
            Some(Segment {
                col: start,
                width,
                target: Target::Widget { index },
            }) => Some(Hit::Widget {
                index,
                event: PointerEvent {
                    x: f64::from(col),
                    y: f64::from(row),
                },
                rect: WidgetRect {
                    x: f64::from(start),
                    y: f64::from(row),
                    width: f64::from(width),
                    height: 1.0,
                },
            }),
            Some(Segment {
                col: start_col,
                target: Target::Text { start },
                ..
            }) => {
                let skip = usize::from(col - start_col);
                let offset = text
                    .get(start..)
                    .and_then(|rest| rest.char_indices().nth(skip))
                    .map_or(text.len(), |(i, _)| start + i);
                Some(Hit::Offset(offset))
            }
            None => self.row_ends.get(usize::from(row)).copied().map(Hit::Offset),
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .unwrap_or_default()
    }
}

/// Lay out `visible` of `text`, replacing decorated ranges with their
/// widgets' text.
pub fn layout(
    text: &str,
    visible: Span,
    decorations: &DecorationSet,
    settings: &Settings,
    cursor: usize,
) -> Screen {
    let mut builder = Builder::new(cursor);
    let mut pos = visible.start;

    for (index, decoration) in decorations.iter().enumerate() {
        let range = decoration.range;
        if range.end <= pos || range.start >= visible.end {
            continue;
        }
        builder.raw(text, pos, range.start);
        let style = widget_style(settings, &decoration.widget);
        builder.widget(index, range, decoration.widget.inner_text(), style);
        pos = range.end;
    }

    let end = visible.end.max(pos);
    builder.raw(text, pos, end);
    builder.finish(end)
}

struct Builder {
    cursor: usize,
    screen: Screen,
    spans: Vec<text::Span<'static>>,
    segments: Vec<Segment>,
    col: u16,
    run: String,
    run_start: usize,
    run_col: u16,
}

impl Builder {
    fn new(cursor: usize) -> Self {
        Self {
            cursor,
            screen: Screen::default(),
            spans: Vec::new(),
            segments: Vec::new(),
            col: 0,
            run: String::new(),
            run_start: 0,
            run_col: 0,
        }
    }

    fn row(&self) -> u16 {
        u16::try_from(self.screen.lines.len()).unwrap_or(u16::MAX)
    }

    fn mark_cursor(&mut self) {
        if self.screen.cursor.is_none() {
            self.screen.cursor = Some((self.row(), self.col));
        }
    }

    fn raw(&mut self, text: &str, from: usize, to: usize) {
        let Some(slice) = text.get(from..to) else {
            return;
        };
        for (i, c) in slice.char_indices() {
            let offset = from + i;
            if offset == self.cursor {
                self.mark_cursor();
            }
            match c {
                '\n' => self.end_row(offset),
                '\r' => {}
                c => {
                    if self.run.is_empty() {
                        self.run_start = offset;
                        self.run_col = self.col;
                    }
                    self.run.push(c);
                    self.col = self.col.saturating_add(1);
                }
            }
        }
    }

    fn widget(&mut self, index: usize, range: Span, content: &str, style: Style) {
        self.flush();
        if (range.start..range.end).contains(&self.cursor) {
            self.mark_cursor();
        }
        let content = content.replace(['\n', '\r'], " ");
        let width = u16::try_from(content.chars().count()).unwrap_or(u16::MAX);
        self.segments.push(Segment {
            col: self.col,
            width,
            target: Target::Widget { index },
        });
        self.spans.push(text::Span::styled(content, style));
        self.col = self.col.saturating_add(width);
    }

    fn flush(&mut self) {
        if self.run.is_empty() {
            return;
        }
        self.segments.push(Segment {
            col: self.run_col,
            width: self.col - self.run_col,
            target: Target::Text {
                start: self.run_start,
            },
        });
        self.spans.push(text::Span::raw(std::mem::take(&mut self.run)));
    }

    fn end_row(&mut self, end: usize) {
        self.flush();
        self.screen
            .lines
            .push(Line::from(std::mem::take(&mut self.spans)));
        self.screen
            .segments
            .push(std::mem::take(&mut self.segments));
        self.screen.row_ends.push(end);
        self.col = 0;
    }

    fn finish(mut self, end: usize) -> Screen {
        if self.cursor == end {
            self.mark_cursor();
        }
        self.end_row(end);
        self.screen
    }
}

/// Terminal style for a widget: hints from the surrounding Markdown first,
/// then the rule's own look on top.
pub fn widget_style(settings: &Settings, widget: &StyleWidget) -> Style {
    let mut style = Style::default();
    for class in widget.classes() {
        style = match class.as_str() {
            "cm-strong" => style.add_modifier(Modifier::BOLD),
            "cm-em" => style.add_modifier(Modifier::ITALIC),
            "cm-strikethrough" => style.add_modifier(Modifier::CROSSED_OUT),
            "cm-highlight" => style.bg(Color::Yellow).fg(Color::Black),
            "cm-comment" => style.add_modifier(Modifier::DIM),
            _ => style,
        };
    }
    match settings.get_style(widget.style_name()) {
        Some(rule) => style.patch(rule_style(rule)),
        None => style,
    }
}

/// Approximate a rule's tag and CSS with terminal attributes.
pub fn rule_style(rule: &StyleRule) -> Style {
    let mut style = match rule.tag() {
        "b" | "strong" => Style::default().add_modifier(Modifier::BOLD),
        "i" | "em" | "cite" => Style::default().add_modifier(Modifier::ITALIC),
        "u" | "ins" => Style::default().add_modifier(Modifier::UNDERLINED),
        "s" | "del" | "strike" => Style::default().add_modifier(Modifier::CROSSED_OUT),
        "sup" | "sub" | "small" => Style::default().add_modifier(Modifier::DIM),
        "kbd" | "code" | "samp" => Style::default().add_modifier(Modifier::REVERSED),
        "mark" => Style::default().bg(Color::Yellow).fg(Color::Black),
        _ => Style::default(),
    };

    let mut color = None;
    let mut background = None;
    for declaration in rule.css.split([';', '\n']) {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match property.trim() {
            "text-decoration" | "text-decoration-line" => {
                if value.contains("underline") {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if value.contains("line-through") {
                    style = style.add_modifier(Modifier::CROSSED_OUT);
                }
            }
            "font-weight" if value == "bold" || value.parse::<u16>().is_ok_and(|w| w >= 600) => {
                style = style.add_modifier(Modifier::BOLD);
            }
            "font-style" if value == "italic" || value == "oblique" => {
                style = style.add_modifier(Modifier::ITALIC);
            }
            "color" => color = Some(value),
            "background-color" | "background" => background = Some(value),
            _ => {}
        }
    }

    // Same colour front and back hides the text.
    if color.is_some() && color == background {
        return style.add_modifier(Modifier::HIDDEN);
    }
    if let Some(fg) = color.and_then(|v| v.parse::<Color>().ok()) {
        style = style.fg(fg);
    }
    if let Some(bg) = background.and_then(|v| v.parse::<Color>().ok()) {
        style = style.bg(bg);
    }
    style
}
