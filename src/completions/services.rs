use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

use super::dto::CompletionRange;
use crate::errors::ApiError;

pub const DEFAULT_RANGE_DAYS: i64 = 30;

pub fn calories(value: Option<i32>, field: &'static str) -> Result<i32, ApiError> {
    match value {
        Some(n) if n >= 0 => Ok(n),
        Some(_) => Err(ApiError::bad_request(format!("{field} cannot be negative"))),
        None => Err(ApiError::bad_request(format!("{field} is required"))),
    }
}

/// `completedAt` defaults to `now` and may not lie in the future.
pub fn completion_time(
    value: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, ApiError> {
    match value {
        Some(at) if at > now => Err(ApiError::bad_request("completedAt cannot be in the future")),
        Some(at) => Ok(at),
        None => Ok(now),
    }
}

fn parse_bound(raw: Option<&str>, name: &str) -> Result<Option<OffsetDateTime>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => OffsetDateTime::parse(s, &Rfc3339)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid '{name}' timestamp"))),
    }
}

/// Half-open `[from, to)`. `to` defaults to `now`, `from` to thirty days
/// before `to`.
pub fn resolve_range(
    range: &CompletionRange,
    now: OffsetDateTime,
) -> Result<(OffsetDateTime, OffsetDateTime), ApiError> {
    let to = parse_bound(range.to.as_deref(), "to")?.unwrap_or(now);
    let from = parse_bound(range.from.as_deref(), "from")?
        .unwrap_or(to - Duration::days(DEFAULT_RANGE_DAYS));
    if from >= to {
        return Err(ApiError::bad_request("'from' must be before 'to'"));
    }
    Ok((from, to))
}
