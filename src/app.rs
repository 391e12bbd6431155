use chrono::{Local, NaiveDate};
use rand::Rng;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::calendar::{Event, EventStore, StoreError};
use crate::cli::StartView;
use crate::command::{self, Command};
use crate::components::{CommandLine, GridView, Summary};
use crate::config::DisplayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Day,
    Week,
}

impl From<StartView> for ViewMode {
    fn from(view: StartView) -> Self {
        match view {
            StartView::Day => ViewMode::Day,
            StartView::Week => ViewMode::Week,
        }
    }
}

/// Screen regions assigned to each sub-view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regions {
    pub grid: Rect,
    pub summary: Rect,
    pub status: Rect,
    pub command: Rect,
}

impl Regions {
    /// Grid on the top two thirds, summary below it, then the status bar and
    /// the command line on the last two rows.
    pub fn split(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Ratio(2, 3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
        Self {
            grid: rows[0],
            summary: rows[1],
            status: rows[2],
            command: rows[3],
        }
    }
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub today: NaiveDate,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub command: CommandLine,
    pub regions: Regions,
    day_view: GridView,
    week_view: GridView,
    store: EventStore,
}

impl App {
    pub fn new(store: EventStore, display: &DisplayConfig) -> Self {
        let today = Local::now().date_naive();
        let mut app = Self {
            running: true,
            view_mode: display.start_view.into(),
            today,
            show_help: false,
            status_message: None,
            command: CommandLine::default(),
            regions: Regions::default(),
            day_view: GridView::daily(today, display.hour_height),
            week_view: GridView::weekly(today, display.day_height),
            store,
        };
        app.day_view.focus_now();
        app.week_view.focus_now();
        app
    }

    pub fn active_view(&self) -> &GridView {
        match self.view_mode {
            ViewMode::Day => &self.day_view,
            ViewMode::Week => &self.week_view,
        }
    }

    pub fn active_view_mut(&mut self) -> &mut GridView {
        match self.view_mode {
            ViewMode::Day => &mut self.day_view,
            ViewMode::Week => &mut self.week_view,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Pull the active view's events from the store and re-bucket them.
    pub fn refresh(&mut self) {
        let view = match self.view_mode {
            ViewMode::Day => &mut self.day_view,
            ViewMode::Week => &mut self.week_view,
        };
        if let Err(err) = view.update(&mut self.store) {
            self.status_message = Some(err.to_string());
        }
    }

    /// Recompute every sub-view's region for a screen of `area`.
    pub fn resize_views(&mut self, area: Rect) {
        self.regions = Regions::split(area);
        self.day_view.set_region(self.regions.grid);
        self.week_view.set_region(self.regions.grid);
        tracing::debug!(width = area.width, height = area.height, "views resized");
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn scroll(&mut self, delta: i32) {
        self.active_view_mut().scroll(delta);
    }

    pub fn shift_period(&mut self, steps: i64) {
        self.active_view_mut().shift_period(steps);
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        let today = self.today;
        let view = self.active_view_mut();
        view.go_to(today);
        view.focus_now();
    }

    /// Add a randomly timed event inside the active view's period.
    pub fn insert_random_event(&mut self) {
        let (start, end) = self.active_view().window().period();
        let span = (end - start).num_seconds().max(1);
        let mut rng = rand::rng();
        let at = start + chrono::Duration::seconds(rng.random_range(0..span));
        let secs = at
            .and_local_timezone(Local)
            .earliest()
            .map(|d| d.timestamp())
            .unwrap_or_else(|| at.and_utc().timestamp());
        let length = rng.random_range(15..=120) * 60;

        let id = self
            .store
            .insert_event(Event::new("Random event", secs, secs + length));
        self.status_message = Some(format!("Inserted event with id = '{id}'"));
    }

    pub fn reload(&mut self) {
        self.store.invalidate();
        self.status_message = Some(format!("Reloading from {}", self.store.source_name()));
    }

    pub fn submit_command(&mut self) {
        let line = self.command.commit();
        let message = match command::parse(&line) {
            Ok(cmd) => match self.run_command(cmd) {
                Ok(msg) => msg,
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        tracing::info!(command = %line, result = %message, "command");
        self.status_message = Some(message);
    }

    pub fn run_command(&mut self, cmd: Command) -> Result<String, StoreError> {
        match cmd {
            Command::Filter { key, value } => self.store.add_filter(&key, value),
            Command::Update { id, pairs } => self.store.update_event(&id, &pairs),
            Command::Delete { id } => self.store.delete_event(&id),
            Command::Goto(date) => {
                self.active_view_mut().go_to(date);
                Ok(format!("Showing {}", self.active_view().window().title()))
            }
            Command::Refresh => {
                self.store.invalidate();
                Ok(format!("Reloading from {}", self.store.source_name()))
            }
            Command::Quit => {
                self.running = false;
                Ok(String::new())
            }
        }
    }

    pub fn summary(&self) -> Summary {
        let view = self.active_view();
        let viewport = view.viewport();
        Summary {
            period: view.window().title(),
            visible: view.buckets().total(),
            cached: self.store.cached_len(),
            source: self.store.source_name(),
            fresh: self.store.is_fresh(),
            filters: self
                .store
                .active_filters()
                .map(|(key, f)| (key.name().to_string(), f.describe()))
                .collect(),
            offset: viewport.offset(),
            max_offset: viewport.max_offset(),
        }
    }
}
