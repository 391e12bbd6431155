mod app;
mod calendar;
mod cli;
mod command;
mod components;
mod config;
mod event;
mod signals;
mod theme;
mod tui;

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use app::{App, ViewMode};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::Input;
use ratatui::layout::Rect;
use signals::ResizeSignal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let config = config::AppConfig::load(&cli)?;
    init_logging(config.log_path().as_deref());
    theme::init(config.theme.clone().into_theme());
    tracing::debug!(theme = %theme::current().name, "theme loaded");

    let store = calendar::EventStore::new(config.build_source()?);
    let mut app = App::new(store, &config.display);
    tracing::info!(source = app.store().source_name(), "starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let resize = ResizeSignal::register();
    let tick = Duration::from_millis(config.display.tick_ms.max(1));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &resize, tick);
    tui::restore()?;
    if let Err(ref err) = result {
        tracing::error!(error = %err, "exiting after failure");
    }
    result
}

fn init_logging(path: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = path.and_then(|p| {
        if let Some(dir) = p.parent() {
            let _ = fs::create_dir_all(dir);
        }
        File::options().create(true).append(true).open(p).ok()
    });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

fn run(terminal: &mut tui::Tui, app: &mut App, resize: &ResizeSignal, tick: Duration) -> Result<()> {
    app.resize_views(screen_area(terminal)?);

    while app.running {
        app.refresh();

        terminal.draw(|frame| {
            let regions = app.regions;
            let today = app.today;
            app.active_view_mut().render(frame, today);
            components::SummaryView::render(frame, regions.summary, &app.summary());
            components::StatusBar::render(
                frame,
                regions.status,
                app.view_mode,
                app.status_message.as_deref(),
            );
            components::CommandView::render(frame, regions.command, &app.command);

            if app.show_help {
                render_help(frame, frame.area());
            }
        })?;

        let input = event::next_input(tick)?;

        if resize.take() || input == Some(Input::Resize) {
            *terminal = tui::reinit()?;
            app.resize_views(screen_area(terminal)?);
        }

        let Some(Input::Key(key)) = input else {
            continue;
        };

        if app.command.active {
            handle_command_input(app, key);
            continue;
        }

        // Clear status message on any key
        app.status_message = None;

        // Help overlay takes priority
        if app.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                app.show_help = false;
            }
            continue;
        }

        handle_normal_input(app, key.code, key.modifiers);
    }

    Ok(())
}

fn screen_area(terminal: &tui::Tui) -> Result<Rect> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_view(ViewMode::Day),
        (KeyCode::Char('2'), _) => app.set_view(ViewMode::Week),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('r'), _) => app.insert_random_event(),
        (KeyCode::Char('R'), _) => app.reload(),
        (KeyCode::Char(':'), _) => app.command.open(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        (KeyCode::Up, _) | (KeyCode::Char('w'), _) | (KeyCode::Char('k'), _) => app.scroll(-1),
        (KeyCode::Down, _) | (KeyCode::Char('s'), _) | (KeyCode::Char('j'), _) => app.scroll(1),
        (KeyCode::Left, _) | (KeyCode::Char('a'), _) | (KeyCode::Char('h'), _) => {
            app.shift_period(-1)
        }
        (KeyCode::Right, _) | (KeyCode::Char('d'), _) | (KeyCode::Char('l'), _) => {
            app.shift_period(1)
        }
        _ => {}
    }
}

fn handle_command_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.command.cancel(),
        KeyCode::Enter => app.submit_command(),
        KeyCode::Backspace => app.command.backspace(),
        KeyCode::Char(c) => app.command.input_char(c),
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 56).min(area.width);
    let popup_h = area.height.clamp(12, 24).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let para = Paragraph::new(help_lines()).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

fn help_lines() -> Vec<ratatui::text::Line<'static>> {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), key_style),
            Span::raw(desc),
        ])
    };

    vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("w/s", "Scroll panes up/down (also k/j, \u{2191}/\u{2193})"),
        entry("a/d", "Previous/next day or week (also h/l, \u{2190}/\u{2192})"),
        entry("t", "Jump to today"),
        entry("1/2", "Day / Week view"),
        Line::from(""),
        Line::from(Span::styled("Commands (:)", section_style)),
        entry("filter", "filter <field> <text>, or None to clear"),
        entry("update", "update <id> <field>=<value> ..."),
        entry("delete", "delete <id>"),
        entry("goto", "goto <YYYY-MM-DD>"),
        entry("refresh", "reload events from the source"),
        Line::from(""),
        Line::from(Span::styled("Other", section_style)),
        entry("r", "Insert a random event"),
        entry("R", "Reload events"),
        entry("q", "Quit"),
        entry("Esc", "Close this popup"),
    ]
}
