//! # space-service
//!
//! Business logic for the now-playing status feature: provider adapters,
//! the activity freshness store, the inactivity classifier, and the status
//! aggregator that ties them together.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod status;

pub use status::{
    ActivityStore, CacheActivityStore, Classification, InactivityClassifier, NowPlayingSource,
    SourceRegistry, StatusAggregator, StatusRequest,
};
