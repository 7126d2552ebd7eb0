mod app;
mod screen;
mod ui;

use std::fs::{self, File};
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{env, process};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use extra_styles_config::Settings;
use extra_styles_engine::render::style_attribute;
use extra_styles_engine::static_render::render_html;
use extra_styles_engine::toggle_commands;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
};

use crate::app::{App, Motion};

/// Longest wait for input when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Preview(PathBuf),
    Render(PathBuf),
    Styles,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--config <path>] preview <file.md>\n       \
         {program} [--config <path>] render <file.md>\n       \
         {program} [--config <path>] styles"
    )
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let program = args.first().map_or("extra-styles", String::as_str);
    let mut config = None;
    let mut positional = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => match iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return Err(format!("{arg} needs a path\n{}", usage(program))),
            },
            "-h" | "--help" => return Err(usage(program)),
            _ => positional.push(arg.as_str()),
        }
    }

    let command = match positional.as_slice() {
        ["styles"] => Command::Styles,
        ["render", file] => Command::Render(PathBuf::from(file)),
        ["preview", file] | [file] => Command::Preview(PathBuf::from(file)),
        _ => return Err(usage(program)),
    };
    Ok(Args { command, config })
}

/// Log to stderr, or to a file while the terminal is taken over. `RUST_LOG`
/// overrides the default level.
fn init_logging(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {e}", path.display());
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let config_path = match config {
        Some(path) => Settings::expand_path(path).unwrap_or_else(|| path.to_path_buf()),
        None => Settings::config_path(),
    };
    log::info!("Config path: {}", config_path.display());
    Settings::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config file {}", config_path.display()))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let log_file = env::temp_dir().join("extra-styles.log");
    let in_tui = matches!(args.command, Command::Preview(_));
    init_logging(in_tui.then_some(log_file.as_path()));

    let settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    match args.command {
        Command::Preview(path) => run_preview(&path, settings),
        Command::Render(path) => {
            let markdown = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            print!("{}", render_html(&markdown, &settings));
            Ok(())
        }
        Command::Styles => {
            print!("{}", describe_styles(&settings));
            Ok(())
        }
    }
}

/// One line per style: key, command id, name, delimiters, tag and CSS.
fn describe_styles(settings: &Settings) -> String {
    let commands = toggle_commands(settings);
    let mut out = String::new();
    for (i, (rule, command)) in settings.style_list.iter().zip(&commands).enumerate() {
        let key = if i < 12 {
            format!("F{}", i + 1)
        } else {
            String::from("-")
        };
        out.push_str(&format!(
            "{key:<4}{:<36}{:<16}{}…{}  <{}>  {}\n",
            command.id,
            rule.name,
            rule.open,
            rule.close,
            rule.tag(),
            style_attribute(&rule.css)
        ));
    }
    out
}

fn run_preview(path: &Path, settings: Settings) -> Result<()> {
    let mut app = App::open(path, settings)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.is_modified() {
        println!("Unsaved changes to {} were discarded", app.path().display());
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let started = Instant::now();
    let mut area = Rect::default();

    loop {
        terminal.draw(|f| area = ui::draw(f, app))?;

        let timeout = app
            .next_deadline()
            .map_or(IDLE_POLL, |due| due.saturating_sub(started.elapsed()));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !handle_key(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    if area.contains(Position::new(mouse.column, mouse.row)) {
                        app.click(mouse.row - area.y, mouse.column - area.x);
                    }
                }
                _ => {}
            }
        }
        app.tick(started.elapsed());
    }
}

/// Returns false when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('q') if ctrl => return false,
        KeyCode::Char('s') if ctrl => {
            if let Err(e) = app.save() {
                log::error!("{e:#}");
                app.set_status(format!("{e:#}"));
            }
        }
        KeyCode::Char(c) if !ctrl => app.insert(c.encode_utf8(&mut [0; 4])),
        KeyCode::Enter => app.insert("\n"),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.move_cursor(Motion::Left),
        KeyCode::Right => app.move_cursor(Motion::Right),
        KeyCode::Up => app.move_cursor(Motion::Up),
        KeyCode::Down => app.move_cursor(Motion::Down),
        KeyCode::Home => app.move_cursor(Motion::LineStart),
        KeyCode::End => app.move_cursor(Motion::LineEnd),
        KeyCode::Tab => app.toggle_live(),
        KeyCode::F(n) if n >= 1 => app.run_command(usize::from(n - 1)),
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn subcommands_parse() {
        assert_eq!(
            parse_args(&args(&["extra-styles", "render", "a.md"])),
            Ok(Args {
                command: Command::Render(PathBuf::from("a.md")),
                config: None,
            })
        );
        assert_eq!(
            parse_args(&args(&["extra-styles", "--config", "~/s.toml", "styles"])),
            Ok(Args {
                command: Command::Styles,
                config: Some(PathBuf::from("~/s.toml")),
            })
        );
    }

    #[test]
    fn bare_file_opens_preview() {
        let parsed = parse_args(&args(&["extra-styles", "notes.md"])).unwrap();
        assert_eq!(parsed.command, Command::Preview(PathBuf::from("notes.md")));
    }

    #[test]
    fn bad_arguments_show_usage() {
        let err = parse_args(&args(&["extra-styles"])).unwrap_err();
        assert!(err.starts_with("Usage: extra-styles"));
        assert!(parse_args(&args(&["extra-styles", "render"])).is_err());
        assert!(parse_args(&args(&["extra-styles", "styles", "--config"])).is_err());
    }

    #[test]
    fn styles_listing_names_commands() {
        let listing = describe_styles(&Settings::default());
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("F1  extra-styles-toggle-underline"));
        assert!(lines[0].ends_with("text-decoration: underline"));
        assert!(lines[2].contains("\\…/  <sub>"));
    }

    #[test]
    fn keys_drive_the_app() {
        let mut app = App::new(
            PathBuf::from("notes.md"),
            extra_styles_engine::Document::from_text(""),
            Settings::default(),
        );
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert!(handle_key(&mut app, press(KeyCode::Char('a'))));
        assert!(handle_key(&mut app, press(KeyCode::F(3))));
        assert_eq!(app.document().text(), "a`\\/`");
        assert!(handle_key(&mut app, press(KeyCode::Tab)));
        assert!(!app.is_live());
        assert!(!handle_key(&mut app, press(KeyCode::Esc)));
        assert!(!handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)
        ));
    }
}
