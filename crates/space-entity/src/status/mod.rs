//! Now-playing status entities.

pub mod raw;
pub mod snapshot;

pub use raw::{RawActivity, UpstreamUser};
pub use snapshot::{Activity, Collection, Creator, NowPlayingSnapshot, SnapshotUser};

use serde::{Deserialize, Serialize};

/// Upstream provider of "what is the user doing right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// NetEase Cloud Music user status (music-status).
    Ncm,
    /// codetime.dev latest stats (coding-activity).
    Codetime,
}

impl SourceKind {
    /// All known sources.
    pub const ALL: [SourceKind; 2] = [SourceKind::Ncm, SourceKind::Codetime];

    /// Query-string key of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ncm => "ncm",
            Self::Codetime => "codetime",
        }
    }

    /// Human-readable label used in response messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ncm => "Netease Music Now Playing Status",
            Self::Codetime => "Codetime Now Coding Status",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = space_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ncm" | "netease" => Ok(Self::Ncm),
            "codetime" => Ok(Self::Codetime),
            _ => Err(space_core::AppError::validation(format!(
                "Invalid source: '{s}' (expected one of: ncm, codetime)"
            ))),
        }
    }
}
