use std::collections::BTreeMap;

use super::error::{Result, StoreError};
use super::event::{Event, EventField};
use super::filter::{Filter, FilterKey};
use super::source::EventSource;

/// Single-slot cache of the full event set.
#[derive(Debug, Default)]
struct Cache {
    events: Vec<Event>,
    fresh: bool,
}

/// Owns the in-memory event collection, its freshness, the active filters and
/// id assignment. Every mutation of the cache goes through these methods.
pub struct EventStore {
    cache: Cache,
    filters: BTreeMap<FilterKey, Filter>,
    event_count: u64,
    source: Box<dyn EventSource>,
}

impl EventStore {
    pub fn new(source: Box<dyn EventSource>) -> Self {
        Self {
            cache: Cache::default(),
            filters: BTreeMap::new(),
            event_count: 0,
            source,
        }
    }

    /// Return the cached events that pass every active filter, loading the
    /// full set from the source first when the cache is stale.
    ///
    /// A failed load still marks the cache fresh so the caller is not forced
    /// into refetching on every frame; use [`EventStore::invalidate`] to retry.
    pub fn get_events(&mut self) -> Result<Vec<Event>> {
        if !self.cache.fresh {
            self.reload()?;
        }
        Ok(self.filtered())
    }

    fn reload(&mut self) -> Result<()> {
        self.cache.fresh = true;
        let raws = match self.source.fetch() {
            Ok(raws) => raws,
            Err(err) => {
                tracing::warn!(source = self.source.name(), error = %err, "event load failed");
                return Err(err);
            }
        };

        let mut events = Vec::with_capacity(raws.len());
        for raw in raws {
            let mut event = Event::from_raw(raw);
            event.id = self.next_id();
            events.push(event);
        }
        tracing::info!(
            source = self.source.name(),
            count = events.len(),
            "loaded events"
        );
        self.cache.events = events;
        Ok(())
    }

    fn filtered(&self) -> Vec<Event> {
        self.cache
            .events
            .iter()
            .filter(|e| self.filters.iter().all(|(key, f)| f.matches(*key, e)))
            .cloned()
            .collect()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.event_count;
        self.event_count += 1;
        id
    }

    /// Install, replace or clear the filter on `key`.
    pub fn add_filter(&mut self, key: &str, value: Filter) -> Result<String> {
        let Some(filter_key) = FilterKey::parse(key) else {
            return Err(StoreError::UnknownFilterKey(key.to_string()));
        };

        match (filter_key, value) {
            (_, Filter::Cleared) => {
                self.filters.remove(&filter_key);
                Ok(format!("Success! Clear filter ({key})"))
            }
            (FilterKey::Date, Filter::Interval(lo, hi)) => {
                let interval = Filter::Interval(lo, hi);
                let message = format!("Success! Filter date in ({})", interval.describe());
                self.filters.insert(filter_key, interval);
                Ok(message)
            }
            (FilterKey::Date, Filter::Contains(_)) => Err(StoreError::InvalidFilterValue {
                key: key.to_string(),
                details: "a text search".to_string(),
            }),
            (_, Filter::Interval(..)) => Err(StoreError::InvalidFilterValue {
                key: key.to_string(),
                details: "a date range".to_string(),
            }),
            (_, Filter::Contains(text)) => {
                let message = format!("Success! Filter ({text}) in ({key})");
                self.filters.insert(filter_key, Filter::Contains(text));
                Ok(message)
            }
        }
    }

    /// Assign each `(field, value)` pair on the event named by `id_text`.
    ///
    /// Pairs are applied in order; an unknown field stops the loop but keeps
    /// the assignments made before it.
    pub fn update_event<K, V>(&mut self, id_text: &str, pairs: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let id = self.validate_id(id_text)?;
        let Some(event) = self.cache.events.iter_mut().find(|e| e.id == id) else {
            return Err(StoreError::NotFound(id as i64));
        };

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(field) = EventField::parse(key) else {
                return Err(StoreError::UnknownField(key.to_string()));
            };
            apply_field(event, field, key, value)?;
        }

        tracing::debug!(id, fields = pairs.len(), "event updated");
        Ok(format!("Updated event with id = '{id}'"))
    }

    /// Remove the event named by `id_text` from the cache.
    pub fn delete_event(&mut self, id_text: &str) -> Result<String> {
        let id = self.validate_id(id_text)?;
        self.cache.events.retain(|e| e.id != id);
        tracing::debug!(id, "event deleted");
        Ok(format!("Deleted event with id = '{id}'"))
    }

    /// Add a locally created event under the next id.
    pub fn insert_event(&mut self, mut event: Event) -> u64 {
        event.id = self.next_id();
        let id = event.id;
        self.cache.events.push(event);
        id
    }

    /// Mark the cache stale so the next [`EventStore::get_events`] reloads it.
    pub fn invalidate(&mut self) {
        self.cache.fresh = false;
    }

    pub fn is_fresh(&self) -> bool {
        self.cache.fresh
    }

    pub fn cached_len(&self) -> usize {
        self.cache.events.len()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (FilterKey, &Filter)> {
        self.filters.iter().map(|(k, f)| (*k, f))
    }

    /// Resolve `id_text` to the id of exactly one cached event. Never mutates.
    pub fn validate_id(&self, id_text: &str) -> Result<u64> {
        let id: i64 = id_text
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidId(id_text.to_string()))?;

        if id < 0 || id as u64 > self.event_count {
            return Err(StoreError::NotFound(id));
        }
        let id = id as u64;
        let matches = self.cache.events.iter().filter(|e| e.id == id).count();
        if matches != 1 {
            return Err(StoreError::NotFound(id as i64));
        }
        Ok(id)
    }
}

fn apply_field(event: &mut Event, field: EventField, key: &str, value: &str) -> Result<()> {
    match field {
        EventField::Title => event.title = value.to_string(),
        EventField::Location => event.location = Some(value.to_string()),
        EventField::Category => event.category = Some(value.to_string()),
        EventField::Description => event.description = Some(value.to_string()),
        EventField::StartTime | EventField::EndTime => {
            let seconds: i64 = value
                .trim()
                .parse()
                .map_err(|_| StoreError::InvalidFieldValue {
                    key: key.to_string(),
                    details: format!("'{value}' is not an integer timestamp"),
                })?;
            if field == EventField::StartTime {
                event.set_start_time(seconds);
            } else {
                event.set_end_time(seconds);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::Number;

    use super::*;
    use crate::calendar::event::RawEvent;

    /// Serves a fixed list and counts how often it was asked.
    struct StaticSource {
        raws: Vec<RawEvent>,
        fetches: std::rc::Rc<std::cell::Cell<usize>>,
        fail: bool,
    }

    impl EventSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        fn fetch(&mut self) -> Result<Vec<RawEvent>> {
            self.fetches.set(self.fetches.get() + 1);
            if self.fail {
                return Err(StoreError::Fetch {
                    source_name: "static",
                    details: "offline".to_string(),
                });
            }
            Ok(self.raws.clone())
        }
    }

    fn raw(title: &str, start: i64, category: Option<&str>) -> RawEvent {
        RawEvent {
            title: title.to_string(),
            start_time: Number::from(start),
            end_time: Number::from(start + 3600),
            location: None,
            category: category.map(str::to_string),
            description: None,
        }
    }

    fn store_with(raws: Vec<RawEvent>) -> (EventStore, std::rc::Rc<std::cell::Cell<usize>>) {
        let fetches = std::rc::Rc::new(std::cell::Cell::new(0));
        let source = StaticSource {
            raws,
            fetches: fetches.clone(),
            fail: false,
        };
        (EventStore::new(Box::new(source)), fetches)
    }

    fn numbered(n: usize) -> Vec<RawEvent> {
        (0..n)
            .map(|i| raw(&format!("Event {i}"), 1_700_000_000 + i as i64 * 3600, None))
            .collect()
    }

    fn local(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let (mut store, _) = store_with(numbered(20));
        let events = store.get_events().unwrap();
        let ids: Vec<u64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, (0..20).collect::<Vec<u64>>());

        let next = store.insert_event(Event::new("late", 1_700_000_000, 1_700_000_100));
        assert_eq!(next, 20);
        assert_eq!(store.event_count(), 21);
    }

    #[test]
    fn fresh_cache_is_not_refetched() {
        let (mut store, fetches) = store_with(numbered(3));
        store.get_events().unwrap();
        store.get_events().unwrap();
        assert_eq!(fetches.get(), 1);
        assert!(store.is_fresh());

        store.invalidate();
        let events = store.get_events().unwrap();
        assert_eq!(fetches.get(), 2);
        // Reloaded events get new ids; old ones are never reused.
        assert_eq!(events.first().map(|e| e.id), Some(3));
    }

    #[test]
    fn failed_load_marks_cache_fresh() {
        let fetches = std::rc::Rc::new(std::cell::Cell::new(0));
        let source = StaticSource {
            raws: Vec::new(),
            fetches: fetches.clone(),
            fail: true,
        };
        let mut store = EventStore::new(Box::new(source));

        assert!(matches!(store.get_events(), Err(StoreError::Fetch { .. })));
        assert!(store.get_events().unwrap().is_empty());
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn no_filters_returns_full_cache() {
        let (mut store, _) = store_with(numbered(5));
        assert_eq!(store.get_events().unwrap().len(), 5);
    }

    #[test]
    fn filters_compose_with_and() {
        let (mut store, _) = store_with(vec![
            raw("Team sync", 1_700_000_000, Some("work")),
            raw("Team dinner", 1_700_000_000, Some("social")),
            raw("Dentist", 1_700_000_000, Some("work")),
        ]);

        store.add_filter("title", Filter::Contains("Team".into())).unwrap();
        assert_eq!(store.get_events().unwrap().len(), 2);

        store.add_filter("category", Filter::Contains("work".into())).unwrap();
        let events = store.get_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Team sync");

        let msg = store.add_filter("title", Filter::Cleared).unwrap();
        assert_eq!(msg, "Success! Clear filter (title)");
        assert_eq!(store.get_events().unwrap().len(), 2);
    }

    #[test]
    fn date_filter_selects_interval() {
        let inside = local(2024, 3, 10).and_local_timezone(chrono::Local).earliest().unwrap();
        let outside = local(2024, 3, 12).and_local_timezone(chrono::Local).earliest().unwrap();
        let (mut store, _) = store_with(vec![
            raw("in", inside.timestamp() + 60, None),
            raw("out", outside.timestamp() + 60, None),
        ]);

        store
            .add_filter("date", Filter::Interval(local(2024, 3, 10), local(2024, 3, 11)))
            .unwrap();
        let titles: Vec<String> = store.get_events().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["in".to_string()]);
    }

    #[test]
    fn add_filter_rejects_unknown_keys_and_mismatched_values() {
        let (mut store, _) = store_with(Vec::new());
        assert!(matches!(
            store.add_filter("colour", Filter::Contains("red".into())),
            Err(StoreError::UnknownFilterKey(k)) if k == "colour"
        ));
        assert!(matches!(
            store.add_filter("date", Filter::Contains("today".into())),
            Err(StoreError::InvalidFilterValue { .. })
        ));
        assert!(matches!(
            store.add_filter("title", Filter::Interval(local(2024, 1, 1), local(2024, 1, 2))),
            Err(StoreError::InvalidFilterValue { .. })
        ));
        assert_eq!(store.active_filters().count(), 0);
    }

    #[test]
    fn update_rejects_non_integer_id() {
        let (mut store, _) = store_with(numbered(5));
        store.get_events().unwrap();
        let err = store.update_event("abc", &[("title", "X")]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
        assert_eq!(err.to_string(), "ID 'abc' not recognized as integer");
    }

    #[test]
    fn update_rejects_unknown_id() {
        let (mut store, _) = store_with(numbered(50));
        store.get_events().unwrap();
        assert!(matches!(
            store.update_event("99999", &[("title", "X")]),
            Err(StoreError::NotFound(99999))
        ));
        assert!(matches!(
            store.update_event("-1", &[("title", "X")]),
            Err(StoreError::NotFound(-1))
        ));
    }

    #[test]
    fn update_sets_only_named_fields() {
        let (mut store, _) = store_with(numbered(5));
        let before = store.get_events().unwrap()[3].clone();

        let msg = store.update_event("3", &[("title", "X")]).unwrap();
        assert_eq!(msg, "Updated event with id = '3'");

        let after = store.get_events().unwrap()[3].clone();
        assert_eq!(after.title, "X");
        assert_eq!(after.start_time(), before.start_time());
        assert_eq!(after.end_time(), before.end_time());
        assert_eq!(after.description, before.description);
    }

    #[test]
    fn update_keeps_assignments_made_before_unknown_field() {
        let (mut store, _) = store_with(numbered(5));
        store.get_events().unwrap();

        let err = store
            .update_event("2", &[("title", "kept"), ("colour", "red"), ("location", "lost")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Key 'colour' unrecognized");

        let event = store.get_events().unwrap()[2].clone();
        assert_eq!(event.title, "kept");
        assert_eq!(event.location, None);
    }

    #[test]
    fn update_normalizes_timestamps() {
        let (mut store, _) = store_with(numbered(2));
        store.get_events().unwrap();
        store.update_event("1", &[("startTime", "123")]).unwrap();
        assert_eq!(store.get_events().unwrap()[1].start_time(), 1_230_000_000);

        assert!(matches!(
            store.update_event("1", &[("endTime", "soon")]),
            Err(StoreError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn delete_removes_event_and_keeps_filters() {
        let (mut store, _) = store_with(numbered(4));
        store.get_events().unwrap();
        store.add_filter("title", Filter::Contains("Event".into())).unwrap();

        let msg = store.delete_event("1").unwrap();
        assert_eq!(msg, "Deleted event with id = '1'");
        let ids: Vec<u64> = store.get_events().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_eq!(store.active_filters().count(), 1);
        assert!(store.is_fresh());

        assert!(matches!(store.delete_event("1"), Err(StoreError::NotFound(1))));
    }

    #[test]
    fn validate_id_does_not_mutate() {
        let (mut store, _) = store_with(numbered(3));
        store.get_events().unwrap();
        assert_eq!(store.validate_id(" 2 ").unwrap(), 2);
        assert_eq!(store.cached_len(), 3);
        assert!(matches!(store.validate_id("3"), Err(StoreError::NotFound(3))));
    }
}
