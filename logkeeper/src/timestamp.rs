//! Timezone-aware timestamps for log lines.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

/// RFC 3339 with millisecond precision and the zone offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Renders every event's timestamp in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedTimer {
    zone: Tz,
}

impl ZonedTimer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Formats an instant the same way log lines are stamped.
    pub fn render(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.zone)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

impl FormatTime for ZonedTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", self.render(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_applies_half_hour_offset() {
        let timer = ZonedTimer::new(chrono_tz::Asia::Kolkata);
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 3, 45, 0).unwrap();
        assert_eq!(timer.render(instant), "2026-10-18T09:15:00.000+05:30");
    }

    #[test]
    fn test_render_crosses_midnight() {
        let timer = ZonedTimer::new(chrono_tz::Asia::Kolkata);
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap();
        assert_eq!(timer.render(instant), "2026-10-19T01:30:00.000+05:30");
    }

    #[test]
    fn test_render_follows_daylight_saving() {
        let timer = ZonedTimer::new(chrono_tz::Europe::London);
        let summer = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert!(timer.render(summer).ends_with("+01:00"));
        assert!(timer.render(winter).ends_with("+00:00"));
    }
}
