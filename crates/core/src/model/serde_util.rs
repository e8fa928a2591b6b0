//! Lenient decoders for the shapes the backend actually sends.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Timestamps arrive either as RFC 3339 or as naive ISO strings in UTC.
pub mod timestamp {
    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", text))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

/// Some ids are integers server-side (products, roles), most are UUIDs.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamps() {
        let rfc = timestamp::parse("2026-03-01T12:30:00Z").unwrap();
        assert_eq!(rfc.hour(), 12);

        let offset = timestamp::parse("2026-03-01T06:30:00-06:00").unwrap();
        assert_eq!(offset.hour(), 12);

        let naive = timestamp::parse("2026-03-01T12:30:00.123456").unwrap();
        assert_eq!(naive.day(), 1);

        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_string_or_number() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "string_or_number")]
            id: String,
        }

        let a: Row = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(a.id, b.id);
    }
}
