use chrono::{Datelike, Duration, NaiveDate};

use super::event::Event;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Chooses which pane an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    /// One bucket per hour of the day.
    Hourly,
    /// One bucket per weekday, Sunday first.
    Weekday,
}

impl Bucketing {
    pub fn unit_count(self) -> usize {
        match self {
            Bucketing::Hourly => 24,
            Bucketing::Weekday => 7,
        }
    }

    pub fn index(self, event: &Event) -> usize {
        match self {
            Bucketing::Hourly => event.hour() as usize,
            // Monday-based weekday shifted so Sunday lands on 0.
            Bucketing::Weekday => {
                (event.start_date().weekday().num_days_from_monday() as usize + 1) % 7
            }
        }
    }

    /// Pane heading for bucket `index`; `first_day` dates weekday panes.
    pub fn label(self, index: usize, first_day: NaiveDate) -> String {
        match self {
            Bucketing::Hourly => format!("{index:02}:00"),
            Bucketing::Weekday => {
                let date = first_day + Duration::days(index as i64);
                format!(
                    "{:<10}{}",
                    WEEKDAY_NAMES[index % 7],
                    date.format("%b %d")
                )
            }
        }
    }
}

/// Per-pane event lists, rebuilt from scratch on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    lists: Vec<Vec<Event>>,
}

impl Buckets {
    pub fn new(unit_count: usize) -> Self {
        Self {
            lists: vec![Vec::new(); unit_count],
        }
    }

    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }

    /// Clear every bucket, then append each event to the bucket `bucketing`
    /// selects. Events are kept in input order within a bucket.
    pub fn fill(&mut self, bucketing: Bucketing, events: impl IntoIterator<Item = Event>) {
        self.clear();
        for event in events {
            self.push(bucketing.index(&event), event);
        }
    }

    pub fn push(&mut self, index: usize, event: Event) {
        if let Some(list) = self.lists.get_mut(index) {
            list.push(event);
        }
    }

    pub fn get(&self, index: usize) -> &[Event] {
        self.lists.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}
