// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-category aggregation of workout records.
//!
//! Two policies, both pure functions over a slice of records:
//!
//! 1. [`count_sessions`]: every record counts once, regardless of date.
//! 2. [`count_unique_days`]: multiple same-day sessions of one category
//!    collapse to a single day. The calendar day is derived from each
//!    record's start timestamp in UTC; the provider's own `date` field is
//!    not consulted.
//!
//! Raw category ids are resolved through [`WorkoutCategory::from_id`];
//! a record carrying a category id outside the enumeration fails the
//! whole aggregation with
//! [`UnknownCategory`](crate::errors::Error::UnknownCategory).

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{Workout, WorkoutCategory};

/// Per-category counts. Iteration order is the enum's declaration order;
/// consumers are free to re-sort by name or count.
pub type CategoryCounts = BTreeMap<WorkoutCategory, u64>;

/// Count every session once. The sum of all counts equals the number of
/// input records.
pub fn count_sessions(workouts: &[Workout]) -> Result<CategoryCounts> {
    let mut counts = CategoryCounts::new();
    for workout in workouts {
        let category = WorkoutCategory::from_id(workout.category)?;
        *counts.entry(category).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Count distinct calendar days (UTC) on which at least one session of
/// each category occurred. Each count is bounded by the number of distinct
/// days present in that category's records.
pub fn count_unique_days(workouts: &[Workout]) -> Result<CategoryCounts> {
    let mut days: BTreeMap<WorkoutCategory, BTreeSet<NaiveDate>> = BTreeMap::new();
    for workout in workouts {
        let category = WorkoutCategory::from_id(workout.category)?;
        days.entry(category).or_default().insert(workout.start_day_utc());
    }
    Ok(days
        .into_iter()
        .map(|(category, days)| (category, days.len() as u64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const DAY: i64 = 86_400;

    fn workout(category: i64, start: i64) -> Workout {
        Workout {
            category,
            startdate: Utc.timestamp_opt(start, 0).unwrap(),
            enddate: None,
            date: None,
            timezone: None,
            model: None,
            deviceid: None,
            data: None,
        }
    }

    #[test]
    fn session_counts_sum_to_record_count() {
        let workouts = vec![
            workout(1, 0),
            workout(2, DAY),
            workout(2, DAY),
            workout(6, 2 * DAY),
            workout(7, 3 * DAY),
        ];

        let counts = count_sessions(&workouts).unwrap();
        let total: u64 = counts.values().sum();
        assert_eq!(total, workouts.len() as u64);
    }

    #[test]
    fn same_day_sessions_collapse_per_category() {
        // Two same-day sessions of category 2, one of category 1.
        let workouts = vec![
            workout(1, 0),
            workout(2, DAY),
            workout(2, DAY + 3_600),
        ];

        let sessions = count_sessions(&workouts).unwrap();
        assert_eq!(sessions[&WorkoutCategory::Walking], 1);
        assert_eq!(sessions[&WorkoutCategory::Running], 2);

        let days = count_unique_days(&workouts).unwrap();
        assert_eq!(days[&WorkoutCategory::Walking], 1);
        assert_eq!(days[&WorkoutCategory::Running], 1);
    }

    #[test]
    fn unique_days_bounded_by_distinct_dates() {
        let workouts = vec![
            workout(6, 0),
            workout(6, 3_600),
            workout(6, DAY),
            workout(6, DAY + 60),
            workout(6, 5 * DAY),
        ];

        let days = count_unique_days(&workouts).unwrap();
        assert_eq!(days[&WorkoutCategory::Cycling], 3);

        let sessions = count_sessions(&workouts).unwrap();
        assert!(days[&WorkoutCategory::Cycling] <= sessions[&WorkoutCategory::Cycling]);
    }

    #[test]
    fn sessions_just_before_and_after_utc_midnight_are_different_days() {
        let workouts = vec![workout(2, DAY - 1), workout(2, DAY + 1)];
        let days = count_unique_days(&workouts).unwrap();
        assert_eq!(days[&WorkoutCategory::Running], 2);
    }

    #[test]
    fn unknown_category_fails_both_policies() {
        let workouts = vec![workout(2, 0), workout(9_999, DAY)];
        assert!(count_sessions(&workouts).is_err());
        assert!(count_unique_days(&workouts).is_err());
    }

    #[test]
    fn empty_input_yields_empty_counts() {
        assert!(count_sessions(&[]).unwrap().is_empty());
        assert!(count_unique_days(&[]).unwrap().is_empty());
    }
}
