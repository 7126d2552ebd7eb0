//! State of the terminal preview: one document, its live preview and the
//! deferred editor focus.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use extra_styles_config::Settings;
use extra_styles_engine::rope::{Span, line_at};
use extra_styles_engine::{
    Cmd, Document, LivePreview, Scheduler, ToggleCommand, ViewUpdate, toggle_commands,
};

use crate::screen::{self, Hit, Screen};

type SharedSettings = Rc<RefCell<Settings>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

pub struct App {
    path: PathBuf,
    document: Document,
    settings: SharedSettings,
    preview: LivePreview<SharedSettings>,
    scheduler: Scheduler<Deferred>,
    focused: bool,
    modified: bool,
    scroll: usize,
    height: usize,
    pending: ViewUpdate,
    screen: Screen,
    status: String,
}

impl App {
    pub fn open(path: &Path, settings: Settings) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let document = Document::from_bytes(&bytes)?;
        Ok(Self::new(path.to_path_buf(), document, settings))
    }

    pub fn new(path: PathBuf, document: Document, settings: Settings) -> Self {
        let settings = Rc::new(RefCell::new(settings));
        Self {
            path,
            document,
            preview: LivePreview::new(settings.clone()),
            settings,
            scheduler: Scheduler::new(),
            focused: true,
            modified: false,
            scroll: 0,
            height: 24,
            pending: ViewUpdate::default(),
            screen: Screen::default(),
            status: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_live(&self) -> bool {
        self.preview.is_live()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn commands(&self) -> Vec<ToggleCommand> {
        toggle_commands(&self.settings.borrow())
    }

    /// Number of rows available for the document.
    pub fn set_viewport(&mut self, height: usize) {
        let height = height.max(1);
        if height != self.height {
            self.height = height;
            self.pending.viewport_changed = true;
        }
    }

    fn follow_cursor(&mut self) {
        let line = self.document.rope().line_of_offset(self.document.cursor());
        let scroll = if line < self.scroll {
            line
        } else if line >= self.scroll + self.height {
            line + 1 - self.height
        } else {
            self.scroll
        };
        if scroll != self.scroll {
            self.scroll = scroll;
            self.pending.viewport_changed = true;
        }
    }

    fn visible(&self) -> Span {
        let rope = self.document.rope();
        Span::new(
            rope.offset_of_line(self.scroll),
            rope.offset_of_line(self.scroll + self.height),
        )
    }

    /// Bring the decorations and the screen layout up to date with
    /// everything that happened since the last refresh.
    pub fn refresh(&mut self) {
        self.follow_cursor();
        let visible = [self.visible()];
        let update = std::mem::take(&mut self.pending);
        let decorations = self
            .preview
            .update(self.document.view_state(&visible), update);
        self.screen = screen::layout(
            &self.document.text(),
            visible[0],
            decorations,
            &self.settings.borrow(),
            self.document.cursor(),
        );
    }

    fn place_cursor(&mut self, offset: usize) {
        self.document.set_cursor(offset);
        self.pending.selection_set = true;
    }

    fn focus(&mut self) {
        if !self.focused {
            self.focused = true;
            self.pending.focus_changed = true;
        }
    }

    pub fn move_cursor(&mut self, motion: Motion) {
        self.focus();
        let cursor = self.document.cursor();
        let target = match motion {
            Motion::Left => {
                let text = self.document.text();
                text.get(..cursor)
                    .and_then(|before| before.chars().next_back())
                    .map_or(cursor, |c| cursor - c.len_utf8())
            }
            Motion::Right => {
                let text = self.document.text();
                text.get(cursor..)
                    .and_then(|after| after.chars().next())
                    .map_or(cursor, |c| cursor + c.len_utf8())
            }
            Motion::LineStart => line_at(self.document.rope(), cursor).span.start,
            Motion::LineEnd => {
                let line = line_at(self.document.rope(), cursor);
                line.span.start + line.content().len()
            }
            Motion::Up => self.vertical(cursor, false),
            Motion::Down => self.vertical(cursor, true),
        };
        self.place_cursor(target);
    }

    /// Same character column on the line above or below, clamped to that
    /// line's length.
    fn vertical(&self, cursor: usize, down: bool) -> usize {
        let rope = self.document.rope();
        let line = line_at(rope, cursor);
        let column = line
            .text
            .get(..cursor - line.span.start)
            .map_or(0, |before| before.chars().count());

        let number = rope.line_of_offset(cursor);
        let target = if down {
            number + 1
        } else if let Some(above) = number.checked_sub(1) {
            above
        } else {
            return cursor;
        };

        let target = line_at(rope, rope.offset_of_line(target));
        if target.span == line.span {
            return cursor;
        }
        let content = target.content();
        target.span.start
            + content
                .char_indices()
                .nth(column)
                .map_or(content.len(), |(i, _)| i)
    }

    fn edit(&mut self, cmd: Cmd) {
        self.document.apply(cmd);
        self.modified = true;
        self.pending.doc_changed = true;
        self.pending.selection_set = true;
    }

    pub fn insert(&mut self, text: &str) {
        self.focus();
        let at = self.document.cursor();
        self.edit(Cmd::InsertText {
            at,
            text: text.to_string(),
        });
        self.document.set_cursor(at + text.len());
    }

    pub fn backspace(&mut self) {
        self.focus();
        let cursor = self.document.cursor();
        let previous = self
            .document
            .text()
            .get(..cursor)
            .and_then(|before| before.chars().next_back());
        if let Some(c) = previous {
            let from = cursor - c.len_utf8();
            self.edit(Cmd::DeleteRange { range: from..cursor });
            self.document.set_cursor(from);
        }
    }

    /// Run the toggle command at `index` of the style list.
    pub fn run_command(&mut self, index: usize) {
        let commands = self.commands();
        let Some(command) = commands.get(index) else {
            return;
        };
        let result = command.run(&mut self.document, &self.settings.borrow());
        match result {
            Ok(_) => {
                self.modified = true;
                self.pending.doc_changed = true;
                self.pending.selection_set = true;
                self.status = command.title.clone();
            }
            Err(e) => {
                log::warn!("{} failed: {e}", command.id);
                self.status = e.to_string();
            }
        }
    }

    pub fn toggle_live(&mut self) {
        let live = !self.preview.is_live();
        self.preview.set_live(live);
        self.status = if live { "Live preview" } else { "Source mode" }.to_string();
    }

    /// Handle a click at `row`/`col` of the document area.
    ///
    /// A click on a widget moves the cursor into its text and gives focus
    /// back to the editor only once the focus delay has passed.
    pub fn click(&mut self, row: u16, col: u16) {
        let Some(hit) = self.screen.hit(&self.document.text(), row, col) else {
            return;
        };
        match hit {
            Hit::Offset(offset) => {
                self.focus();
                self.place_cursor(offset);
            }
            Hit::Widget { index, event, rect } => {
                let Some(decoration) = self.preview.decorations().iter().nth(index) else {
                    return;
                };
                let Some(placement) = decoration.widget.pointer_down(event, rect) else {
                    return;
                };
                log::debug!("Widget click placed cursor at {}", placement.cursor);
                self.focused = false;
                self.pending.focus_changed = true;
                self.place_cursor(placement.cursor);
                self.scheduler
                    .schedule(placement.focus_after, Deferred::Focus);
            }
        }
    }

    /// Move the host clock to `now` and run whatever became due.
    pub fn tick(&mut self, now: Duration) {
        for task in self.scheduler.advance_to(now) {
            match task {
                Deferred::Focus => self.focus(),
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn save(&mut self) -> Result<()> {
        fs::write(&self.path, self.document.to_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.modified = false;
        self.status = format!("Saved {}", self.path.display());
        log::info!("{}", self.status);
        Ok(())
    }
}
