//! Now-playing status: adapters, freshness, aggregation.

pub mod aggregator;
pub mod classifier;
pub mod source;
pub mod store;

pub use aggregator::{StatusAggregator, StatusRequest};
pub use classifier::{Classification, InactivityClassifier};
pub use source::{NowPlayingSource, SourceRegistry};
pub use store::{ActivityStore, CacheActivityStore};
