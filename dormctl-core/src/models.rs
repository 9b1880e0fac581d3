use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A room as it appears in `rooms.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub name: String,
}

/// A student as it appears in `students.json`.
///
/// `room` is optional only because the source data may omit it; when present it
/// must point at an already inserted room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    #[serde(deserialize_with = "deserialize_birthday")]
    pub birthday: NaiveDate,
    #[serde(default)]
    pub room: Option<i32>,
    pub sex: String,
}

impl Room {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Student {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        birthday: NaiveDate,
        room: Option<i32>,
        sex: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            birthday,
            room,
            sex: sex.into(),
        }
    }
}

/// Parse a calendar date from either `2004-01-07` or a timestamp such as
/// `2004-01-07T00:00:00.000000` (time of day is dropped).
pub fn parse_birthday(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_birthday<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birthday(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid birthday '{}'", raw)))
}
