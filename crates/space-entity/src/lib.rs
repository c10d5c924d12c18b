//! # space-entity
//!
//! Domain models for the Space status backend. `activity` holds the
//! persisted freshness record; `status` holds the provider enumeration, the
//! normalized upstream activity, and the public snapshot shape.

pub mod activity;
pub mod status;
