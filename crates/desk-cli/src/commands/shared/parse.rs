use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Split a `STUDENT=SEAT` pair.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, String)> {
    let (student, seat) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid assignment '{raw}': expected STUDENT=SEAT"))?;
    Ok((student.trim().to_string(), seat.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use desk_core::enums::{Severity, ViolationCategory};
    use pretty_assertions::assert_eq;

    use super::{parse_assignment, parse_enum, parse_timestamp};

    #[test]
    fn parses_hyphenated_and_uppercase_values() {
        let category: ViolationCategory =
            parse_enum("Unauthorized-Materials", "category").expect("category should parse");
        assert_eq!(category, ViolationCategory::UnauthorizedMaterials);
        let severity: Severity = parse_enum("HIGH", "severity").expect("severity should parse");
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Severity>("urgent", "severity").expect_err("should fail");
        assert!(err.to_string().contains("invalid severity 'urgent'"));
    }

    #[test]
    fn parses_offset_timestamps_to_utc() {
        let t = parse_timestamp("2026-06-15T11:00:00+02:00", "starts_at").unwrap();
        assert_eq!(t.to_rfc3339(), "2026-06-15T09:00:00+00:00");
        assert!(parse_timestamp("tomorrow", "starts_at").is_err());
    }

    #[test]
    fn splits_assignment_pairs() {
        assert_eq!(
            parse_assignment(" stu-1 = a1 ").unwrap(),
            ("stu-1".to_string(), "a1".to_string())
        );
        assert!(parse_assignment("stu-1").is_err());
    }
}
