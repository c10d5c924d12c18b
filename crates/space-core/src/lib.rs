//! # space-core
//!
//! Core crate for the Space status backend. Contains configuration
//! schemas, the unified error system, and the traits other crates
//! implement (cache providers, clocks).
//!
//! This crate has **no** internal dependencies on other Space crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
