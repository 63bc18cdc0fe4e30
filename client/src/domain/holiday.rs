//! Non-working days ("días inhábiles") kept by the admin calendar.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend identifier; numeric or string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HolidayId(String);

impl HolidayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolidayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HolidayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Self(id.to_string()),
            Raw::Text(id) => Self(id),
        })
    }
}

/// Dates arrive as `YYYY-MM-DD` or as a timestamp; only the calendar date
/// part is kept so no timezone shift can move the day.
fn calendar_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let day = raw.split('T').next().unwrap_or_default().trim();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn plain_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

/// One marked day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Holiday {
    pub id: HolidayId,
    #[serde(deserialize_with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    /// Repeats on the same month and day every year.
    #[serde(default)]
    pub recurring: bool,
}

impl Holiday {
    pub fn falls_on(&self, day: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == day.month() && self.date.day() == day.day()
        } else {
            self.date == day
        }
    }
}

/// Payload for `POST /holidays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayDraft {
    #[serde(serialize_with = "plain_date")]
    pub date: NaiveDate,
    pub description: String,
    pub recurring: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("holiday description must not be empty")]
pub struct EmptyDescription;

impl HolidayDraft {
    pub fn new(date: NaiveDate, description: &str, recurring: bool) -> Result<Self, EmptyDescription> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EmptyDescription);
        }
        Ok(Self {
            date,
            description: description.to_owned(),
            recurring,
        })
    }
}

/// Marked days with lookup by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: Vec<Holiday>,
}

impl HolidayCalendar {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    /// The entry marking `day`. A one-off entry wins over a recurring one.
    pub fn on(&self, day: NaiveDate) -> Option<&Holiday> {
        self.holidays
            .iter()
            .find(|holiday| !holiday.recurring && holiday.date == day)
            .or_else(|| self.holidays.iter().find(|holiday| holiday.falls_on(day)))
    }

    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.on(day).is_some()
    }

    /// Marked days of `year` in calendar order, recurring entries included.
    pub fn in_year(&self, year: i32) -> Vec<(NaiveDate, &Holiday)> {
        let mut days: Vec<(NaiveDate, &Holiday)> = self
            .holidays
            .iter()
            .filter_map(|holiday| {
                let day = if holiday.recurring {
                    holiday.date.with_year(year)?
                } else if holiday.date.year() == year {
                    holiday.date
                } else {
                    return None;
                };
                Some((day, holiday))
            })
            .collect();
        days.sort_by_key(|(day, holiday)| (*day, holiday.recurring));
        days.dedup_by_key(|(day, _)| *day);
        days
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter()
    }
}
