//! Frames pushed to stream consumers.

use space_entity::status::NowPlayingSnapshot;

/// One item of a status stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A snapshot that differs from the previously emitted one.
    Snapshot(Box<NowPlayingSnapshot>),
    /// Keep-alive with no payload.
    Heartbeat,
}

impl Frame {
    /// Whether this is a keep-alive frame.
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Self::Heartbeat)
    }

    /// The snapshot carried by this frame, if any.
    pub fn snapshot(&self) -> Option<&NowPlayingSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::Heartbeat => None,
        }
    }
}
