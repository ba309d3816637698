//! Lenient timestamp (de)serialization.
//!
//! The backend emits both RFC 3339 (`2024-03-01T08:00:00Z`) and naive
//! (`2024-03-01T08:00:00.123456`) datetimes; naive values are UTC. Use with
//! `#[serde(with = "qms_core::timestamp")]` or `qms_core::timestamp::option`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "crate::timestamp")]
        created_at: DateTime<Utc>,
        #[serde(default, with = "crate::timestamp::option")]
        closed_at: Option<DateTime<Utc>>,
    }

    #[test]
    fn accepts_rfc3339_and_naive() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(parse("2024-03-01T08:00:00Z"), Some(expected));
        assert_eq!(parse("2024-03-01T10:00:00+02:00"), Some(expected));
        assert_eq!(parse("2024-03-01T08:00:00"), Some(expected));
        assert_eq!(parse("2024-03-01 08:00:00.000"), Some(expected));
        assert_eq!(parse("yesterday"), None);
    }

    #[test]
    fn optional_field_accepts_null_and_missing() {
        let row: Row = serde_json::from_str(r#"{"created_at":"2024-03-01T08:00:00"}"#).unwrap();
        assert!(row.closed_at.is_none());

        let row: Row =
            serde_json::from_str(r#"{"created_at":"2024-03-01T08:00:00","closed_at":null}"#).unwrap();
        assert!(row.closed_at.is_none());

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("2024-03-01T08:00:00+00:00"));
    }
}
