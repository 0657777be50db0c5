use chrono::{DateTime, SecondsFormat, Utc};

/// Parse an API timestamp: `2024-01-15T10:30:00+0000` or RFC 3339.
pub fn parse_graph_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Storage form of an API timestamp; unparseable or missing values become `now`.
pub fn stored_time(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let parsed = raw.and_then(parse_graph_time).unwrap_or(now);
    format_stored(parsed)
}

pub fn format_stored(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_api_offset_format() {
        let dt = parse_graph_time("2024-01-15T10:30:00+0000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());

        let shifted = parse_graph_time("2024-01-15T12:30:00+0200").unwrap();
        assert_eq!(shifted, dt);
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_graph_time("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(format_stored(dt), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn garbage_becomes_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(stored_time(Some("yesterday-ish"), now), "2025-06-01T08:00:00Z");
        assert_eq!(stored_time(None, now), "2025-06-01T08:00:00Z");
        assert_eq!(
            stored_time(Some("2024-01-15T10:30:00+0000"), now),
            "2024-01-15T10:30:00Z"
        );
    }
}
