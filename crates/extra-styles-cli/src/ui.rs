use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Draw the preview and return the area the document occupies, for
/// mapping mouse positions.
pub fn draw(f: &mut Frame, app: &mut App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let mode = if app.is_live() { "live" } else { "source" };
    let modified = if app.is_modified() { " *" } else { "" };
    let title = format!(" {}{modified} [{mode}] ", app.path().display());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);

    app.set_viewport(usize::from(inner.height));
    app.refresh();

    let content = Paragraph::new(app.screen().lines.clone()).block(block);
    f.render_widget(content, chunks[0]);

    if app.is_focused()
        && let Some((row, col)) = app.screen().cursor
        && row < inner.height
        && col < inner.width
    {
        f.set_cursor_position((inner.x + col, inner.y + row));
    }

    let status = Paragraph::new(Line::from(Span::styled(
        app.status().to_string(),
        Style::default().fg(Color::Cyan),
    )));
    f.render_widget(status, chunks[1]);

    let mut help = vec![Span::raw("Esc: Quit | Ctrl-S: Save | Tab: Live/Source")];
    for (i, command) in app.commands().iter().take(12).enumerate() {
        help.push(Span::raw(" | "));
        help.push(Span::styled(
            format!("F{}", i + 1),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        help.push(Span::raw(format!(": {}", command.style_name)));
    }
    f.render_widget(Paragraph::new(Line::from(help)), chunks[2]);

    inner
}
