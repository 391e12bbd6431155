use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::{Duration, Local};
use rand::Rng;
use reqwest::Client;
use serde_json::Number;

use super::error::{Result, StoreError};
use super::event::RawEvent;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Where the store pulls its full event set from when the cache is stale.
pub trait EventSource {
    fn name(&self) -> &'static str;

    fn fetch(&mut self) -> Result<Vec<RawEvent>>;
}

/// Generates random events around the current time. Used when no remote
/// calendar server is available.
pub struct SyntheticSource {
    count: usize,
}

impl SyntheticSource {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl EventSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn fetch(&mut self) -> Result<Vec<RawEvent>> {
        let mut rng = rand::rng();
        let now = Local::now().timestamp();

        let events = (0..self.count)
            .map(|i| {
                let start = now + rng.random_range(-30 * SECONDS_PER_DAY..30 * SECONDS_PER_DAY);
                let end = start + rng.random_range(60 * 60..60 * 60 * 10);
                let description = chrono::DateTime::from_timestamp(start, 0)
                    .map(|d| d.with_timezone(&Local).format("%B %d %Y, %H:%M:%S").to_string());
                RawEvent {
                    title: format!("Event {i}"),
                    start_time: Number::from(start),
                    end_time: Number::from(end),
                    location: None,
                    category: None,
                    description,
                }
            })
            .collect();

        Ok(events)
    }
}

/// Fetches records from the calendar server's date-range endpoint.
pub struct RemoteSource {
    base_url: String,
    timeout: StdDuration,
    lookahead: Duration,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, lookahead_days: i64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: StdDuration::from_secs(timeout_secs.max(1)),
            lookahead: Duration::days(lookahead_days.max(0)),
        }
    }

    pub fn range_url(&self, start: i64, end: i64) -> String {
        format!(
            "{}/date_start/{}/date_end/{}",
            self.base_url.trim_end_matches('/'),
            start,
            end
        )
    }

    async fn fetch_range(&self, url: &str) -> std::result::Result<Vec<RawEvent>, reqwest::Error> {
        let client = Client::builder().timeout(self.timeout).build()?;
        client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RawEvent>>()
            .await
    }
}

impl EventSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn fetch(&mut self) -> Result<Vec<RawEvent>> {
        let end = (Local::now() + self.lookahead).timestamp();
        let url = self.range_url(0, end);
        tracing::debug!(%url, "fetching events");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| StoreError::Fetch {
                source_name: self.name(),
                details: err.to_string(),
            })?;

        runtime
            .block_on(self.fetch_range(&url))
            .map_err(|err| StoreError::Fetch {
                source_name: self.name(),
                details: err.to_string(),
            })
    }
}

/// Reads a JSON array of records from disk. Development aid.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn fetch(&mut self) -> Result<Vec<RawEvent>> {
        let fetch_err = |details: String| StoreError::Fetch {
            source_name: "fixture",
            details,
        };
        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| fetch_err(format!("{}: {err}", self.path.display())))?;
        serde_json::from_str(&content)
            .map_err(|err| fetch_err(format!("{}: {err}", self.path.display())))
    }
}
