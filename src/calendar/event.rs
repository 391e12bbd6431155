use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Number of decimal digits a seconds-since-epoch timestamp is normalized to.
const EPOCH_DIGITS: usize = 10;

/// Wire shape of an event record as served by the remote source or a fixture.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default = "zero")]
    pub start_time: Number,
    #[serde(default = "zero")]
    pub end_time: Number,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn zero() -> Number {
    Number::from(0)
}

impl Default for RawEvent {
    fn default() -> Self {
        Self {
            title: String::new(),
            start_time: zero(),
            end_time: zero(),
            location: None,
            category: None,
            description: None,
        }
    }
}

/// Fields of an [`Event`] that can be assigned by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    StartTime,
    EndTime,
    Location,
    Category,
    Description,
}

impl EventField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "startTime" | "start_time" => Some(Self::StartTime),
            "endTime" | "end_time" => Some(Self::EndTime),
            "location" => Some(Self::Location),
            "category" => Some(Self::Category),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    start_time: i64,
    end_time: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
}

impl Event {
    /// Build an event from already-normalized timestamps. The id is assigned
    /// by the store when the event enters the cache.
    pub fn new(title: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        let mut event = Self {
            id: 0,
            title: title.into(),
            location: None,
            category: None,
            description: None,
            start_time: 0,
            end_time: 0,
            start_date: NaiveDateTime::default(),
            end_date: NaiveDateTime::default(),
        };
        event.set_start_time(start_time);
        event.set_end_time(end_time);
        event
    }

    /// Load a wire record, normalizing both timestamps before the derived
    /// dates are computed.
    pub fn from_raw(raw: RawEvent) -> Self {
        let mut event = Self::new(
            raw.title,
            number_to_seconds(&raw.start_time),
            number_to_seconds(&raw.end_time),
        );
        event.location = raw.location;
        event.category = raw.category;
        event.description = raw.description;
        event
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    pub fn set_start_time(&mut self, seconds: i64) {
        self.start_time = clamp_seconds_since_epoch(seconds);
        self.start_date = local_datetime(self.start_time);
    }

    pub fn set_end_time(&mut self, seconds: i64) {
        self.end_time = clamp_seconds_since_epoch(seconds);
        self.end_date = local_datetime(self.end_time);
    }

    pub fn hour(&self) -> u32 {
        self.start_date.hour()
    }

    pub fn minute(&self) -> u32 {
        self.start_date.minute()
    }

    pub fn day(&self) -> u32 {
        self.start_date.day()
    }

    pub fn month(&self) -> u32 {
        self.start_date.month()
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// Text value of a searchable field, `None` when the field is unset.
    pub fn text_field(&self, field: EventField) -> Option<&str> {
        match field {
            EventField::Title => Some(self.title.as_str()),
            EventField::Location => self.location.as_deref(),
            EventField::Category => self.category.as_deref(),
            EventField::Description => self.description.as_deref(),
            EventField::StartTime | EventField::EndTime => None,
        }
    }
}

/// Normalize a timestamp's decimal text to exactly ten characters: longer
/// values keep their leading ten, shorter ones are right-padded with zeros.
/// A leading minus sign counts as one of the ten.
pub fn clamp_seconds_since_epoch(seconds: i64) -> i64 {
    let text = seconds.to_string();
    let normalized = if text.len() > EPOCH_DIGITS {
        text[..EPOCH_DIGITS].to_string()
    } else {
        format!("{text:0<EPOCH_DIGITS$}")
    };
    // Ten characters of an i64's decimal text always parse back.
    normalized.parse::<i64>().unwrap_or_default()
}

fn number_to_seconds(n: &Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_u64().map(|v| v.min(i64::MAX as u64) as i64))
        .or_else(|| n.as_f64().map(|v| v.trunc() as i64))
        .unwrap_or_default()
}

fn local_datetime(seconds: i64) -> NaiveDateTime {
    DateTime::from_timestamp(seconds, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
        .naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pads_short_timestamps() {
        assert_eq!(clamp_seconds_since_epoch(123), 1_230_000_000);
        assert_eq!(clamp_seconds_since_epoch(0), 0);
    }

    #[test]
    fn clamp_truncates_long_timestamps() {
        assert_eq!(clamp_seconds_since_epoch(12_345_678_901), 1_234_567_890);
        assert_eq!(clamp_seconds_since_epoch(1_700_000_000_123), 1_700_000_000);
    }

    #[test]
    fn clamp_counts_the_sign_as_a_character() {
        assert_eq!(clamp_seconds_since_epoch(-5), -500_000_000);
        assert_eq!(clamp_seconds_since_epoch(-12_345_678_901), -123_456_789);
        assert_eq!(clamp_seconds_since_epoch(-123_456_789), -123_456_789);
    }

    #[test]
    fn clamp_leaves_ten_digits_unchanged() {
        assert_eq!(clamp_seconds_since_epoch(1_234_567_890), 1_234_567_890);
    }

    #[test]
    fn raw_records_are_normalized_on_load() {
        let json = r#"[
            {"title": "a", "startTime": 100, "endTime": 200},
            {"title": "b", "startTime": 9999999999999, "endTime": 9999999999999},
            {"title": "c", "startTime": 42, "endTime": 43}
        ]"#;
        let raws: Vec<RawEvent> = serde_json::from_str(json).unwrap();
        let starts: Vec<i64> = raws
            .into_iter()
            .map(Event::from_raw)
            .map(|e| e.start_time())
            .collect();
        assert_eq!(starts, vec![1_000_000_000, 9_999_999_999, 4_200_000_000]);
    }

    #[test]
    fn fractional_timestamps_are_truncated_before_normalizing() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"title": "f", "startTime": 1700000000.75, "endTime": 1700003600}"#)
                .unwrap();
        let event = Event::from_raw(raw);
        assert_eq!(event.start_time(), 1_700_000_000);
        assert_eq!(event.end_time(), 1_700_003_600);
        assert!(event.location.is_none());
    }

    #[test]
    fn derived_fields_follow_start_date() {
        let start = Local::now().timestamp();
        let event = Event::new("x", start, start + 3600);
        let expected = local_datetime(start);
        assert_eq!(event.hour(), expected.hour());
        assert_eq!(event.minute(), expected.minute());
        assert_eq!(event.day(), expected.day());
        assert_eq!(event.month(), expected.month());
        assert_eq!(event.year(), expected.year());
    }

    #[test]
    fn setting_start_time_recomputes_start_date() {
        let mut event = Event::new("x", 1_700_000_000, 1_700_003_600);
        event.set_start_time(1_800_000_000);
        assert_eq!(event.start_date(), local_datetime(1_800_000_000));
    }

    #[test]
    fn field_names_accept_wire_and_snake_case() {
        assert_eq!(EventField::parse("startTime"), Some(EventField::StartTime));
        assert_eq!(EventField::parse("end_time"), Some(EventField::EndTime));
        assert_eq!(EventField::parse("id"), None);
    }
}
