//! Cache key builders.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. The Redis provider adds its
//! configured namespace prefix on top of these.

/// Cache key for the freshness record of a tracked user.
pub fn activity_record(user_key: &str) -> String {
    format!("status:activity:{user_key}")
}
