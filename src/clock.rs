//! Time handling at the domain boundary.
//!
//! Inside the domain every timestamp is a [`chrono::DateTime<Utc>`], so the
//! UTC invariant is enforced by the type system and entities simply accept a
//! `now` argument. The clock itself is supplied by
//! [`hourglass_rs::SafeTimeProvider`] (re-exported from the crate root):
//! `TimeSource::System` in production, `TimeSource::Test` plus
//! `test_control()` for deterministic tests. Domain code never reads a clock;
//! orchestration calls `provider.now()` once per operation and threads the
//! instant through.

use chrono::{DateTime, FixedOffset, Utc};

use crate::errors::{BillingError, Result};

/// parse an RFC 3339 timestamp, requiring an explicit UTC offset
///
/// Offset-less ("naive") input is rejected, as is any input whose offset is
/// not zero. This is the boundary guard: once parsed, values live as
/// `DateTime<Utc>` and cannot lose the invariant.
pub fn parse_utc(s: &str) -> Result<DateTime<Utc>> {
    let parsed: DateTime<FixedOffset> =
        DateTime::parse_from_rfc3339(s).map_err(|e| BillingError::InvalidData {
            message: format!("timestamp must be RFC 3339 with explicit offset: {s} ({e})"),
        })?;

    if parsed.offset().local_minus_utc() != 0 {
        return Err(BillingError::InvalidData {
            message: format!("timestamp must be UTC, got offset {}: {s}", parsed.offset()),
        });
    }

    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_accepts_utc_timestamps() {
        let t = parse_utc("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let t = parse_utc("2024-03-01T12:00:00+00:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_naive_timestamps() {
        assert!(parse_utc("2024-03-01T12:00:00").is_err());
        assert!(parse_utc("2024-03-01").is_err());
    }

    #[test]
    fn test_rejects_non_utc_offsets() {
        assert!(parse_utc("2024-03-01T12:00:00-06:00").is_err());
        assert!(parse_utc("2024-03-01T12:00:00+01:00").is_err());
    }
}
