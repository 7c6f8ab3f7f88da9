//! Catch model matching the `catches` table.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

/// Format used for defaulted and validated dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for defaulted times.
pub const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// A catch row as stored in the remote table.
///
/// Only `id` is guaranteed; older rows may hold nulls in any other column and
/// are passed through as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catch {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub length_in: Option<f64>,
    #[serde(default)]
    pub weight_lbs: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub bait: Option<String>,
}

/// Request body for creating or editing a catch.
///
/// There is no `id` field: an id sent by the client is dropped during
/// deserialization and never reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct CatchInput {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub location: String,
    pub species: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub length_in: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub weight_lbs: f64,
    #[serde(default)]
    pub weather: Option<String>,
    pub bait: String,
}

/// Column values written to the store on insert or update.
///
/// `date` and `time` are omitted from the payload when `None`, which leaves
/// the stored values untouched on update. A blank `weather` is written as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub location: String,
    pub species: String,
    pub length_in: f64,
    pub weight_lbs: f64,
    pub weather: Option<String>,
    pub bait: String,
}

impl CatchInput {
    /// Check required fields and the date/time formats.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.location.trim().is_empty() {
            return Err(AppError::Validation("Location is required".to_string()));
        }
        if self.species.trim().is_empty() {
            return Err(AppError::Validation("Species is required".to_string()));
        }
        if self.bait.trim().is_empty() {
            return Err(AppError::Validation("Bait is required".to_string()));
        }
        if !self.length_in.is_finite() {
            return Err(AppError::Validation(
                "length_in must be a finite number".to_string(),
            ));
        }
        if !self.weight_lbs.is_finite() {
            return Err(AppError::Validation(
                "weight_lbs must be a finite number".to_string(),
            ));
        }
        if let Some(date) = non_blank(&self.date) {
            NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
                AppError::Validation(format!("Invalid date {:?}, expected YYYY-MM-DD", date))
            })?;
        }
        if let Some(time) = non_blank(&self.time) {
            parse_time(time).ok_or_else(|| {
                AppError::Validation(format!("Invalid time {:?}, expected HH:MM[:SS]", time))
            })?;
        }
        Ok(())
    }

    /// Build the insert payload, filling a missing date or time from `now`.
    pub fn into_new_record(self, now: NaiveDateTime) -> Result<CatchRecord, AppError> {
        self.validate()?;

        let date = non_blank(&self.date)
            .map(str::to_string)
            .unwrap_or_else(|| now.date().format(DATE_FORMAT).to_string());
        let time = non_blank(&self.time)
            .map(str::to_string)
            .unwrap_or_else(|| now.time().format(TIME_FORMAT).to_string());

        Ok(CatchRecord {
            date: Some(date),
            time: Some(time),
            ..self.into_columns()
        })
    }

    /// Build the update payload. A missing date or time is left as stored.
    pub fn into_changes(self) -> Result<CatchRecord, AppError> {
        self.validate()?;

        let date = non_blank(&self.date).map(str::to_string);
        let time = non_blank(&self.time).map(str::to_string);

        Ok(CatchRecord {
            date,
            time,
            ..self.into_columns()
        })
    }

    fn into_columns(self) -> CatchRecord {
        CatchRecord {
            date: None,
            time: None,
            location: self.location.trim().to_string(),
            species: self.species.trim().to_string(),
            length_in: self.length_in,
            weight_lbs: self.weight_lbs,
            weather: non_blank(&self.weather).map(str::to_string),
            bait: self.bait.trim().to_string(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, SHORT_TIME_FORMAT))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept either a JSON number or a numeric string; HTML forms post numbers
/// as text.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {:?}", text))),
    }
}
