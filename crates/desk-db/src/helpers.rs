//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs through these.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all desk-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a non-negative INTEGER column as `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value is negative or too large.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u32::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("column {idx}: {value} is not a valid u32")))
}

/// Nullable variant of [`get_u32`].
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a present value is out of range.
pub fn get_opt_u32(row: &libsql::Row, idx: i32) -> Result<Option<u32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|value| {
            u32::try_from(value)
                .map_err(|_| DatabaseError::Query(format!("column {idx}: {value} is not a valid u32")))
        })
        .transpose()
}

/// Whether a libSQL error is a UNIQUE (or primary key) constraint failure.
#[must_use]
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") || msg.contains("PRIMARY KEY constraint failed")
}

/// Map a write error, turning a uniqueness failure into
/// `DatabaseError::UniqueViolation` carrying `what`.
pub fn unique_or(e: libsql::Error, what: impl FnOnce() -> String) -> DatabaseError {
    if is_unique_violation(&e) {
        DatabaseError::UniqueViolation(what())
    } else {
        DatabaseError::LibSql(e)
    }
}

/// Same as [`unique_or`] for errors already wrapped in `DatabaseError`.
pub fn unique_or_db(e: DatabaseError, what: impl FnOnce() -> String) -> DatabaseError {
    match e {
        DatabaseError::LibSql(inner) => unique_or(inner, what),
        other => other,
    }
}

/// Run `COUNT(*)`-style scalar queries.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no row.
pub async fn query_count(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<u32, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    get_u32(&row, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_core::enums::{Severity, ViolationStatus};

    #[test]
    fn parses_both_datetime_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert!(parse_optional_datetime(Some("2026-02-09 14:30:00")).unwrap().is_some());
    }

    #[test]
    fn parses_snake_case_enums() {
        assert_eq!(parse_enum::<Severity>("high").unwrap(), Severity::High);
        assert_eq!(
            parse_enum::<ViolationStatus>("dismissed").unwrap(),
            ViolationStatus::Dismissed
        );
        assert!(parse_enum::<Severity>("HIGH").is_err());
    }

    #[tokio::test]
    async fn detects_unique_violation() {
        let db = libsql::Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();
        conn.execute("CREATE TABLE t (k TEXT UNIQUE)", ()).await.unwrap();
        conn.execute("INSERT INTO t VALUES ('a')", ()).await.unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", ()).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(matches!(
            unique_or(err, || "k".into()),
            DatabaseError::UniqueViolation(ref w) if w == "k"
        ));
    }
}
