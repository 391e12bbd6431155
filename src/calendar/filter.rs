use chrono::NaiveDateTime;

use super::event::{Event, EventField};

/// Field names a filter can be installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    Date,
    Title,
    Description,
    Category,
    Location,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Date,
        FilterKey::Title,
        FilterKey::Description,
        FilterKey::Category,
        FilterKey::Location,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Location => "location",
        }
    }

    fn text_field(self) -> Option<EventField> {
        match self {
            Self::Date => None,
            Self::Title => Some(EventField::Title),
            Self::Description => Some(EventField::Description),
            Self::Category => Some(EventField::Category),
            Self::Location => Some(EventField::Location),
        }
    }
}

/// Predicate installed on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Cleared,
    /// Half-open `[lo, hi)` range on the event's start date.
    Interval(NaiveDateTime, NaiveDateTime),
    Contains(String),
}

impl Filter {
    /// Evaluate this filter for `key` against an event. A text filter never
    /// matches an event whose field is unset.
    pub fn matches(&self, key: FilterKey, event: &Event) -> bool {
        match self {
            Filter::Cleared => true,
            Filter::Interval(lo, hi) => {
                let start = event.start_date();
                *lo <= start && start < *hi
            }
            Filter::Contains(needle) => key
                .text_field()
                .and_then(|field| event.text_field(field))
                .is_some_and(|value| value.contains(needle.as_str())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Filter::Cleared => "-".to_string(),
            Filter::Interval(lo, hi) => format!(
                "{} .. {}",
                lo.format("%Y-%m-%d %H:%M"),
                hi.format("%Y-%m-%d %H:%M")
            ),
            Filter::Contains(text) => format!("~\"{text}\""),
        }
    }
}
