//! Freshness records persisted per tracked user.

pub mod record;

pub use record::{ActivityPatch, ActivityRecord};
