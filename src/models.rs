// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures for Withings workout data.
//!
//! - [`WorkoutCategory`]: closed enumeration of the provider's activity
//!   codes. Lookup by id fails explicitly on codes the provider added
//!   after this crate was written.
//! - [`Workout`]: one reported session, immutable once parsed.
//! - [`DateRange`]: inclusive calendar range with the previous-month
//!   default resolution.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Activity categories as registered with Withings, identified by the
/// provider's stable numeric ids. The enumeration is closed: it is defined
/// once and never extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
    Walking,
    Running,
    Hiking,
    Cycling,
    Swimming,
    Surf,
    Kitesurf,
    Windsurf,
    Tennis,
    Pingpong,
    Squash,
    Badminton,
    Weights,
    Fitness,
    Elliptical,
    Pilates,
    Basketball,
    Soccer,
    Football,
    Rugby,
    Volleyball,
    HorsebackRiding,
    Golf,
    Yoga,
    Dancing,
    Boxing,
    Ski,
    Snowboard,
    Other,
    Rowing,
    Zumba,
    Baseball,
    Handball,
    Hockey,
    IceHockey,
    Climbing,
    IceSkating,
    IndoorWalking,
    IndoorRunning,
    IndoorCycling,
    RobotWithings,
}

impl WorkoutCategory {
    /// Resolve a provider category id. Ids outside the enumeration fail
    /// with [`Error::UnknownCategory`] rather than being silently mapped
    /// to a catch-all.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            1 => Ok(WorkoutCategory::Walking),
            2 => Ok(WorkoutCategory::Running),
            3 => Ok(WorkoutCategory::Hiking),
            6 => Ok(WorkoutCategory::Cycling),
            7 => Ok(WorkoutCategory::Swimming),
            8 => Ok(WorkoutCategory::Surf),
            9 => Ok(WorkoutCategory::Kitesurf),
            10 => Ok(WorkoutCategory::Windsurf),
            12 => Ok(WorkoutCategory::Tennis),
            13 => Ok(WorkoutCategory::Pingpong),
            14 => Ok(WorkoutCategory::Squash),
            15 => Ok(WorkoutCategory::Badminton),
            16 => Ok(WorkoutCategory::Weights),
            17 => Ok(WorkoutCategory::Fitness),
            18 => Ok(WorkoutCategory::Elliptical),
            19 => Ok(WorkoutCategory::Pilates),
            20 => Ok(WorkoutCategory::Basketball),
            21 => Ok(WorkoutCategory::Soccer),
            22 => Ok(WorkoutCategory::Football),
            23 => Ok(WorkoutCategory::Rugby),
            24 => Ok(WorkoutCategory::Volleyball),
            26 => Ok(WorkoutCategory::HorsebackRiding),
            27 => Ok(WorkoutCategory::Golf),
            28 => Ok(WorkoutCategory::Yoga),
            29 => Ok(WorkoutCategory::Dancing),
            30 => Ok(WorkoutCategory::Boxing),
            34 => Ok(WorkoutCategory::Ski),
            35 => Ok(WorkoutCategory::Snowboard),
            36 => Ok(WorkoutCategory::Other),
            187 => Ok(WorkoutCategory::Rowing),
            188 => Ok(WorkoutCategory::Zumba),
            191 => Ok(WorkoutCategory::Baseball),
            192 => Ok(WorkoutCategory::Handball),
            193 => Ok(WorkoutCategory::Hockey),
            194 => Ok(WorkoutCategory::IceHockey),
            195 => Ok(WorkoutCategory::Climbing),
            196 => Ok(WorkoutCategory::IceSkating),
            306 => Ok(WorkoutCategory::IndoorWalking),
            307 => Ok(WorkoutCategory::IndoorRunning),
            308 => Ok(WorkoutCategory::IndoorCycling),
            457 => Ok(WorkoutCategory::RobotWithings),
            other => Err(Error::UnknownCategory(other)),
        }
    }

    /// The provider's numeric id for this category.
    pub fn id(&self) -> i64 {
        match self {
            WorkoutCategory::Walking => 1,
            WorkoutCategory::Running => 2,
            WorkoutCategory::Hiking => 3,
            WorkoutCategory::Cycling => 6,
            WorkoutCategory::Swimming => 7,
            WorkoutCategory::Surf => 8,
            WorkoutCategory::Kitesurf => 9,
            WorkoutCategory::Windsurf => 10,
            WorkoutCategory::Tennis => 12,
            WorkoutCategory::Pingpong => 13,
            WorkoutCategory::Squash => 14,
            WorkoutCategory::Badminton => 15,
            WorkoutCategory::Weights => 16,
            WorkoutCategory::Fitness => 17,
            WorkoutCategory::Elliptical => 18,
            WorkoutCategory::Pilates => 19,
            WorkoutCategory::Basketball => 20,
            WorkoutCategory::Soccer => 21,
            WorkoutCategory::Football => 22,
            WorkoutCategory::Rugby => 23,
            WorkoutCategory::Volleyball => 24,
            WorkoutCategory::HorsebackRiding => 26,
            WorkoutCategory::Golf => 27,
            WorkoutCategory::Yoga => 28,
            WorkoutCategory::Dancing => 29,
            WorkoutCategory::Boxing => 30,
            WorkoutCategory::Ski => 34,
            WorkoutCategory::Snowboard => 35,
            WorkoutCategory::Other => 36,
            WorkoutCategory::Rowing => 187,
            WorkoutCategory::Zumba => 188,
            WorkoutCategory::Baseball => 191,
            WorkoutCategory::Handball => 192,
            WorkoutCategory::Hockey => 193,
            WorkoutCategory::IceHockey => 194,
            WorkoutCategory::Climbing => 195,
            WorkoutCategory::IceSkating => 196,
            WorkoutCategory::IndoorWalking => 306,
            WorkoutCategory::IndoorRunning => 307,
            WorkoutCategory::IndoorCycling => 308,
            WorkoutCategory::RobotWithings => 457,
        }
    }

    /// Human-readable name for tables and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutCategory::Walking => "walking",
            WorkoutCategory::Running => "running",
            WorkoutCategory::Hiking => "hiking",
            WorkoutCategory::Cycling => "cycling",
            WorkoutCategory::Swimming => "swimming",
            WorkoutCategory::Surf => "surfing",
            WorkoutCategory::Kitesurf => "kitesurfing",
            WorkoutCategory::Windsurf => "windsurfing",
            WorkoutCategory::Tennis => "tennis",
            WorkoutCategory::Pingpong => "ping-pong",
            WorkoutCategory::Squash => "squash",
            WorkoutCategory::Badminton => "badminton",
            WorkoutCategory::Weights => "weight training",
            WorkoutCategory::Fitness => "fitness",
            WorkoutCategory::Elliptical => "elliptical",
            WorkoutCategory::Pilates => "pilates",
            WorkoutCategory::Basketball => "basketball",
            WorkoutCategory::Soccer => "soccer",
            WorkoutCategory::Football => "football",
            WorkoutCategory::Rugby => "rugby",
            WorkoutCategory::Volleyball => "volleyball",
            WorkoutCategory::HorsebackRiding => "horseback riding",
            WorkoutCategory::Golf => "golf",
            WorkoutCategory::Yoga => "yoga",
            WorkoutCategory::Dancing => "dancing",
            WorkoutCategory::Boxing => "boxing",
            WorkoutCategory::Ski => "skiing",
            WorkoutCategory::Snowboard => "snowboarding",
            WorkoutCategory::Other => "other",
            WorkoutCategory::Rowing => "rowing",
            WorkoutCategory::Zumba => "zumba",
            WorkoutCategory::Baseball => "baseball",
            WorkoutCategory::Handball => "handball",
            WorkoutCategory::Hockey => "hockey",
            WorkoutCategory::IceHockey => "ice hockey",
            WorkoutCategory::Climbing => "climbing",
            WorkoutCategory::IceSkating => "ice skating",
            WorkoutCategory::IndoorWalking => "indoor walking",
            WorkoutCategory::IndoorRunning => "indoor running",
            WorkoutCategory::IndoorCycling => "indoor cycling",
            WorkoutCategory::RobotWithings => "Withings Move",
        }
    }
}

/// One reported workout session, as returned by `getworkouts`.
///
/// The category is kept as the raw provider id; translation through
/// [`WorkoutCategory::from_id`] happens at aggregation time, where an
/// unmapped id fails with `UnknownCategory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Raw provider category id.
    pub category: i64,
    /// Session start, unix seconds on the wire.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub startdate: DateTime<Utc>,
    /// Session end, when reported.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub enddate: Option<DateTime<Utc>>,
    /// Provider-reported day as a YYYYMMDD integer. Ignored by the
    /// aggregation policies, which derive the day from `startdate`.
    #[serde(default)]
    pub date: Option<i64>,
    /// IANA timezone the device reported the session in.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Recording device model code.
    #[serde(default)]
    pub model: Option<i64>,
    #[serde(default)]
    pub deviceid: Option<String>,
    /// Per-session metrics, present depending on the recording device.
    #[serde(default)]
    pub data: Option<WorkoutData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutData {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub hr_average: Option<i64>,
    #[serde(default)]
    pub hr_min: Option<i64>,
    #[serde(default)]
    pub hr_max: Option<i64>,
}

impl Workout {
    /// Calendar day of the session start, in UTC. The provider is
    /// inconsistent about its own `date` field across API revisions, so
    /// day-level aggregation always derives the day from the start
    /// timestamp in a single timezone.
    pub fn start_day_utc(&self) -> NaiveDate {
        self.startdate.date_naive()
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The previous calendar month relative to `today`: the first day of
    /// the month before `today`'s month through the day before the first
    /// day of `today`'s month. January resolves to December of the
    /// previous year.
    pub fn previous_month(today: NaiveDate) -> Self {
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("first day of a month is always a valid date");
        let end = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("first day of a month is always a valid date")
            .pred_opt()
            .expect("the day before the first of a month is always a valid date");
        Self { start, end }
    }

    /// `startdateymd` wire format.
    pub fn start_ymd(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `enddateymd` wire format.
    pub fn end_ymd(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn category_ids_round_trip() {
        for id in [1, 2, 3, 6, 16, 36, 187, 306, 457] {
            let category = WorkoutCategory::from_id(id).unwrap();
            assert_eq!(category.id(), id);
        }
    }

    #[test]
    fn unknown_category_id_is_an_explicit_error() {
        let err = WorkoutCategory::from_id(999).unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(999)));
    }

    #[test]
    fn category_serializes_as_snake_case() {
        let json = serde_json::to_string(&WorkoutCategory::HorsebackRiding).unwrap();
        assert_eq!(json, "\"horseback_riding\"");
    }

    #[test]
    fn workout_parses_from_provider_json() {
        let workout: Workout = serde_json::from_value(json!({
            "category": 2,
            "startdate": 1_705_305_600,
            "enddate": 1_705_309_200,
            "date": 20_240_115,
            "timezone": "Europe/Paris",
            "model": 16,
            "deviceid": "abc123",
            "data": {"calories": 312.5, "steps": 4200, "hr_average": 151}
        }))
        .unwrap();

        assert_eq!(workout.category, 2);
        assert_eq!(workout.start_day_utc(), ymd(2024, 1, 15));
        assert_eq!(workout.timezone.as_deref(), Some("Europe/Paris"));
        let data = workout.data.unwrap();
        assert_eq!(data.steps, Some(4200));
        assert_eq!(data.distance, None);
    }

    #[test]
    fn workout_parses_with_minimal_fields() {
        let workout: Workout = serde_json::from_value(json!({
            "category": 7,
            "startdate": 1_705_305_600
        }))
        .unwrap();

        assert_eq!(workout.category, 7);
        assert!(workout.enddate.is_none());
        assert!(workout.data.is_none());
    }

    #[test]
    fn previous_month_mid_year() {
        let range = DateRange::previous_month(ymd(2024, 3, 15));
        assert_eq!(range.start, ymd(2024, 2, 1));
        assert_eq!(range.end, ymd(2024, 2, 29));
    }

    #[test]
    fn previous_month_wraps_to_december() {
        let range = DateRange::previous_month(ymd(2024, 1, 7));
        assert_eq!(range.start, ymd(2023, 12, 1));
        assert_eq!(range.end, ymd(2023, 12, 31));
    }

    #[test]
    fn previous_month_of_every_month_starts_on_the_first() {
        for month in 1..=12 {
            let range = DateRange::previous_month(ymd(2025, month, 20));
            assert_eq!(range.start.day(), 1);
            assert_eq!(range.end.succ_opt().unwrap().day(), 1);
            assert!(range.start <= range.end);
        }
    }

    #[test]
    fn wire_format_is_ymd() {
        let range = DateRange::new(ymd(2024, 2, 1), ymd(2024, 2, 29));
        assert_eq!(range.start_ymd(), "2024-02-01");
        assert_eq!(range.end_ymd(), "2024-02-29");
    }
}
