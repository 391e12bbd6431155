use chrono::{Local, NaiveDate, Timelike};
use ratatui::{buffer::Buffer, layout::Rect, Frame};

use crate::calendar::{Bucketing, Buckets, Event, EventStore, Filter, StoreError, TimeWindow};
use crate::components::viewport::Viewport;
use crate::theme;

/// A scrollable stack of time panes. The time window decides which slice of
/// the calendar is shown; the bucketing decides which pane an event lands in.
#[derive(Debug)]
pub struct GridView {
    window: TimeWindow,
    bucketing: Bucketing,
    buckets: Buckets,
    viewport: Viewport,
}

impl GridView {
    pub fn new(window: TimeWindow, bucketing: Bucketing, unit_height: u16) -> Self {
        let units = bucketing.unit_count();
        Self {
            window,
            bucketing,
            buckets: Buckets::new(units),
            viewport: Viewport::new(units, unit_height),
        }
    }

    pub fn daily(date: NaiveDate, hour_height: u16) -> Self {
        Self::new(TimeWindow::Day(date), Bucketing::Hourly, hour_height)
    }

    pub fn weekly(date: NaiveDate, day_height: u16) -> Self {
        Self::new(TimeWindow::Week(date), Bucketing::Weekday, day_height)
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Narrow the store to this view's period and re-bucket what it returns.
    pub fn update(&mut self, store: &mut EventStore) -> Result<(), StoreError> {
        let (start, end) = self.window.period();
        store.add_filter("date", Filter::Interval(start, end))?;
        let events = store.get_events()?;
        self.buckets.fill(self.bucketing, events);
        Ok(())
    }

    pub fn set_region(&mut self, area: Rect) {
        self.viewport.resize(area);
    }

    pub fn scroll(&mut self, delta: i32) {
        self.viewport.scroll(delta);
    }

    pub fn shift_period(&mut self, steps: i64) {
        self.window.shift(steps);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.window.reanchor(date);
    }

    /// Scroll the pane holding "now" to the top.
    pub fn focus_now(&mut self) {
        let now = Local::now().naive_local();
        let index = match self.bucketing {
            Bucketing::Hourly => now.hour() as usize,
            Bucketing::Weekday => {
                let last = self.buckets.len().saturating_sub(1) as i64;
                (now.date() - self.window.first_day()).num_days().clamp(0, last) as usize
            }
        };
        self.viewport.scroll_to_unit(index);
    }

    pub fn render(&mut self, frame: &mut Frame, today: NaiveDate) {
        self.paint_visible(today);
        self.viewport.render(frame.buffer_mut());
    }

    /// Redraw the border and contents of every pane currently in view.
    fn paint_visible(&mut self, today: NaiveDate) {
        let theme = theme::current();
        let first_day = self.window.first_day();
        let inner = self.viewport.pane_inner();

        for index in self.viewport.visible_range() {
            let label = self.bucketing.label(index, first_day);
            let is_today = self.pane_is_now(index, first_day, today);
            let events = self.buckets.get(index);
            let Some(pane) = self.viewport.reset_pane(index, theme.border) else {
                continue;
            };
            paint_pane(pane, inner, &label, is_today, events);
        }
    }

    fn pane_is_now(&self, index: usize, first_day: NaiveDate, today: NaiveDate) -> bool {
        match self.bucketing {
            Bucketing::Hourly => {
                first_day == today && Local::now().hour() as usize == index
            }
            Bucketing::Weekday => first_day + chrono::Duration::days(index as i64) == today,
        }
    }
}

fn paint_pane(pane: &mut Buffer, inner: Rect, label: &str, highlight: bool, events: &[Event]) {
    let theme = theme::current();
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let label_style = if highlight { theme.today } else { theme.header };
    let label_x = inner.x + 1;
    let max = usize::from(inner.width.saturating_sub(1));
    pane.set_stringn(label_x, inner.y, label, max, label_style);

    let text_x = label_x + label.chars().count() as u16 + 2;
    let right = inner.x + inner.width;
    if text_x >= right {
        return;
    }
    let text_w = usize::from(right - text_x);
    let rows = usize::from(inner.height);

    let (shown, hidden) = if events.len() > rows {
        (rows - 1, events.len() - (rows - 1))
    } else {
        (events.len(), 0)
    };

    for (row, event) in events.iter().take(shown).enumerate() {
        let line = format!(
            "{}-{} {} #{}",
            event.start_date().format("%H:%M"),
            event.end_date().format("%H:%M"),
            event.title,
            event.id
        );
        pane.set_stringn(text_x, inner.y + row as u16, line, text_w, theme.event);
    }
    if hidden > 0 {
        pane.set_stringn(
            text_x,
            inner.y + shown as u16,
            format!("+{hidden} more"),
            text_w,
            theme.dim,
        );
    }
}
