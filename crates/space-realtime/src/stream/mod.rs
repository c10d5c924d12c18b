//! Per-connection status streams.

pub mod controller;
pub mod frame;
pub mod session;

pub use controller::{StatusStream, StreamController};
pub use frame::Frame;
pub use session::StreamSession;
