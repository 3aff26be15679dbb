use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::validators::{ValidationError, require};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSpan {
    pub from: DateTime<Utc>,
    /// `None` while the entry is ongoing.
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Free text: a percentage, GPA or similar.
    pub grade: String,
    pub timeline: TimelineSpan,
}

/// Unvalidated create payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTimelineEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grade: String,
    /// RFC 3339 or a plain `YYYY-MM-DD`, read as midnight UTC.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub to: Option<DateTime<Utc>>,
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| de::Error::custom(format!("invalid date {raw:?}, expected RFC 3339 or YYYY-MM-DD")))
}

impl NewTimelineEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", Some(&self.title))?;
        require("description", Some(&self.description))?;
        require("grade", Some(&self.grade))?;
        if self.from.is_none() {
            return Err(ValidationError::Required("from"));
        }
        Ok(())
    }

    /// Validates and assigns a fresh id.
    pub fn into_entry(self) -> Result<TimelineEntry, ValidationError> {
        self.validate()?;
        let from = self.from.ok_or(ValidationError::Required("from"))?;
        Ok(TimelineEntry {
            id: Uuid::new_v4(),
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            grade: self.grade.trim().to_owned(),
            timeline: TimelineSpan { from, to: self.to },
        })
    }
}
