use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

const MS_PER_DAY: i64 = 86_400_000;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── Millisecond timestamps ────────────────────────────────────────────────────

/// Convert milliseconds since the Unix epoch into a UTC [`DateTime`].
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Renders millisecond timestamps as calendar time in one timezone.
pub struct TimezoneHandler {
    tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { tz }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Convert a millisecond timestamp to local calendar time.
    pub fn to_local(&self, ms: i64) -> Option<DateTime<Tz>> {
        from_millis(ms).map(|dt| dt.with_timezone(&self.tz))
    }

    /// Format `ms` with a chrono format string, or the raw number when the
    /// timestamp cannot be represented.
    pub fn format(&self, ms: i64, fmt: &str) -> String {
        match self.to_local(ms) {
            Some(dt) => dt.format(fmt).to_string(),
            None => ms.to_string(),
        }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }
}

// ── Axis label granularity ───────────────────────────────────────────────────

/// Choose a date format whose precision suits the width of a time range.
///
/// * span under a week → `"%m-%d %H:%M"`
/// * span under ninety days → `"%Y-%m-%d"`
/// * otherwise → `"%Y-%m"`
pub fn label_format_for_span(start_ms: i64, end_ms: i64) -> &'static str {
    let span = end_ms.saturating_sub(start_ms);
    if span < 7 * MS_PER_DAY {
        "%m-%d %H:%M"
    } else if span < 90 * MS_PER_DAY {
        "%Y-%m-%d"
    } else {
        "%Y-%m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_epoch() {
        let dt = from_millis(0).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_from_millis_enron_range() {
        // 2001-05-14 16:39:00 UTC
        let dt = from_millis(989_858_340_000).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2001-05-14 16:39");
    }

    #[test]
    fn test_from_millis_out_of_range() {
        assert!(from_millis(i64::MAX).is_none());
    }

    #[test]
    fn test_handler_converts_timezone() {
        let handler = TimezoneHandler::new("America/Chicago");
        // 2001-01-01 12:00 UTC is 06:00 in Chicago (CST, UTC-6).
        let ms = 978_350_400_000;
        assert_eq!(handler.format(ms, "%H:%M"), "06:00");
    }

    #[test]
    fn test_handler_invalid_timezone_falls_back() {
        let handler = TimezoneHandler::new("Mars/Olympus");
        assert_eq!(handler.tz(), Tz::UTC);
    }

    #[test]
    fn test_format_unrepresentable_returns_raw() {
        let handler = TimezoneHandler::new("UTC");
        assert_eq!(handler.format(i64::MAX, "%Y"), i64::MAX.to_string());
    }

    #[test]
    fn test_validate_timezone() {
        assert!(TimezoneHandler::validate_timezone("Europe/London"));
        assert!(!TimezoneHandler::validate_timezone("Not/AZone"));
    }

    #[test]
    fn test_label_format_for_span() {
        assert_eq!(label_format_for_span(0, MS_PER_DAY), "%m-%d %H:%M");
        // A few days still gets hour-level ticks; whole days would repeat.
        assert_eq!(label_format_for_span(0, 3 * MS_PER_DAY), "%m-%d %H:%M");
        assert_eq!(label_format_for_span(0, 7 * MS_PER_DAY), "%Y-%m-%d");
        assert_eq!(label_format_for_span(0, 30 * MS_PER_DAY), "%Y-%m-%d");
        assert_eq!(label_format_for_span(0, 400 * MS_PER_DAY), "%Y-%m");
    }

    #[test]
    fn test_get_system_timezone_non_empty() {
        assert!(!get_system_timezone().is_empty());
    }
}
