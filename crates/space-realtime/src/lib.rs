//! # space-realtime
//!
//! Live status streams. A stream re-polls the status aggregator on a fixed
//! interval, forwards a snapshot only when the activity or the active flag
//! changed, and interleaves heartbeats so idle connections stay open.

pub mod stream;

pub use stream::{Frame, StatusStream, StreamController, StreamSession};
