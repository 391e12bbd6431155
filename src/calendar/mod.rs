pub mod bucket;
pub mod error;
pub mod event;
pub mod filter;
pub mod source;
pub mod store;
pub mod window;

pub use bucket::{Bucketing, Buckets};
pub use error::StoreError;
pub use event::{Event, RawEvent};
pub use filter::{Filter, FilterKey};
pub use source::{EventSource, FixtureSource, RemoteSource, SyntheticSource};
pub use store::EventStore;
pub use window::TimeWindow;
