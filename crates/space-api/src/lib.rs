//! # space-api
//!
//! HTTP API layer for the Space status backend built on Axum.
//!
//! Provides the status endpoints (JSON and server-sent events), the health
//! check, middleware (CORS, compression, request logging), envelope DTOs,
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
