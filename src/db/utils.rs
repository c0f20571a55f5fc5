//! Database utility functions.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use uuid::Uuid;

use crate::db::{DbError, DbResult};

/// Generate a UUID v4 for a new entity.
pub fn generate_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time, guaranteed to be strictly after `previous` when given.
///
/// Mutations must always move `updated_at` forward, even when two writes land
/// within the clock's resolution. Truncated to microseconds so the value
/// survives a round-trip through storage unchanged.
pub fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match previous {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

/// Format a timestamp the way it is stored: RFC 3339, UTC, microseconds.
///
/// The first ten characters are always the `YYYY-MM-DD` date, which date
/// searches rely on.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(value: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData {
            message: format!("invalid timestamp '{}': {}", value, e),
            help: "timestamps are stored as RFC 3339 UTC text".to_string(),
        })
}
