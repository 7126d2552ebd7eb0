//! Per-style toggle commands.

use std::sync::LazyLock;

use extra_styles_config::{Settings, StyleRule};
use regex::Regex;
use thiserror::Error;

use crate::editing::selection::reorder;
use crate::editing::{Cmd, Document, Patch, Selection};
use crate::rope::line_at;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No style named {0:?}")]
    UnknownStyle(String),

    #[error("Selections {first:?} and {second:?} overlap")]
    OverlappingSelections { first: Selection, second: Selection },
}

static CODE_SPAN_ON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]*`").expect("Invalid code span regex"));

/// A command toggling one style around the selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleCommand {
    pub id: String,
    pub title: String,
    pub style_name: String,
}

impl ToggleCommand {
    pub fn for_style(rule: &StyleRule) -> Self {
        Self {
            id: format!("extra-styles-toggle-{}", rule.name.to_lowercase()),
            title: format!("Toggle {}", rule.name),
            style_name: rule.name.clone(),
        }
    }

    /// Run against `doc` with the rule as currently configured.
    pub fn run(&self, doc: &mut Document, settings: &Settings) -> Result<Patch, CommandError> {
        let rule = settings
            .get_style(&self.style_name)
            .ok_or_else(|| CommandError::UnknownStyle(self.style_name.clone()))?;
        toggle_style(doc, rule)
    }
}

/// One command per configured style, in list order.
pub fn toggle_commands(settings: &Settings) -> Vec<ToggleCommand> {
    settings.style_list.iter().map(ToggleCommand::for_style).collect()
}

/// Toggle `rule` at the current selections.
///
/// If the primary cursor sits in a code span on its line, that span is
/// unwrapped: the backticks go, and so do the rule's delimiters when the
/// span carries them. Otherwise every selection is wrapped in
/// `` `open…close` `` (an empty selection gets an empty pair) and
/// re-selected between the delimiters.
pub fn toggle_style(doc: &mut Document, rule: &StyleRule) -> Result<Patch, CommandError> {
    if let Some(patch) = unwrap_at_cursor(doc, rule) {
        return Ok(patch);
    }
    wrap_selections(doc, rule)
}

fn unwrap_at_cursor(doc: &mut Document, rule: &StyleRule) -> Option<Patch> {
    let cursor = doc.cursor();
    let line = line_at(doc.rope(), cursor);
    let column = cursor - line.span.start;

    let span = CODE_SPAN_ON_LINE
        .find_iter(line.content())
        .find(|m| m.start() <= column && column <= m.end())?;

    let inner = &span.as_str()[1..span.len() - 1];
    let (prefix_len, unwrapped) = match inner
        .strip_prefix(rule.open.as_str())
        .and_then(|rest| rest.strip_suffix(rule.close.as_str()))
    {
        Some(text) => (1 + rule.open.len(), text),
        None => (1, inner),
    };

    let start = line.span.start + span.start();
    let end = line.span.start + span.end();
    let new_cursor = start + (cursor.saturating_sub(start + prefix_len)).min(unwrapped.len());
    log::debug!("Unwrapping code span at {start}..{end}");

    let patch = doc.apply(Cmd::ReplaceRange {
        range: start..end,
        text: unwrapped.to_string(),
    });
    doc.set_cursor(new_cursor);
    Some(patch)
}

fn wrap_selections(doc: &mut Document, rule: &StyleRule) -> Result<Patch, CommandError> {
    let selections = reorder(doc.selections());
    for pair in selections.windows(2) {
        if pair[0].to() > pair[1].from() {
            return Err(CommandError::OverlappingSelections {
                first: pair[0],
                second: pair[1],
            });
        }
    }

    let text = doc.text();
    let mut edits = Vec::with_capacity(selections.len());
    let mut reselect = Vec::with_capacity(selections.len());
    let mut offset = 0;

    for sel in selections {
        let Some(selected) = text.get(sel.from()..sel.to()) else {
            log::warn!("Selection {sel:?} is not on character boundaries, leaving it alone");
            reselect.push(Selection::new(sel.anchor + offset, sel.head + offset));
            continue;
        };
        // Whitespace at either end of the selection stays outside the span.
        let trimmed_start = selected.trim_start();
        let from = sel.to() - trimmed_start.len();
        let to = from + trimmed_start.trim_end().len();
        let inner = &text[from..to];

        edits.push((from..to, format!("`{}{inner}{}`", rule.open, rule.close)));

        let shift = offset + 1 + rule.open.len();
        reselect.push(Selection::new(from + shift, to + shift));
        offset += 2 + rule.open.len() + rule.close.len();
    }

    let patch = doc.apply(Cmd::ReplaceRanges { edits });
    doc.set_selections(reselect);
    Ok(patch)
}
