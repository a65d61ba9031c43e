// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Client for the Withings measurement endpoint.
//!
//! Success requires HTTP 200 *and* envelope status 0; the provider reports
//! application errors (including expired tokens) inside a 200 response.
//! Every failure surfaces as
//! [`TokenOrRequest`](crate::errors::Error::TokenOrRequest) with the raw
//! body attached, since the provider does not let the client tell an
//! expired token from a malformed request without reading that body.

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{api, endpoints, limits};
use crate::errors::{Error, Result};
use crate::models::{DateRange, Workout, WorkoutCategory};

pub struct WorkoutsClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl WorkoutsClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(access_token, endpoints::MEASURE_URL)
    }

    /// Point the client at a different measurement endpoint, e.g. a mock
    /// server.
    pub fn with_endpoint(
        access_token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(limits::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        })
    }

    /// Fetch workout records for `range`, defaulting to the previous
    /// calendar month (relative to the current UTC date) when no range is
    /// supplied.
    ///
    /// Walking sessions are excluded unless `include_walking` is set. The
    /// provider has no server-side category filter, so the exclusion is
    /// applied to the returned set, preserving the provider's ordering of
    /// the remaining records.
    pub async fn fetch_workouts(
        &self,
        range: Option<DateRange>,
        include_walking: bool,
    ) -> Result<Vec<Workout>> {
        let range = range.unwrap_or_else(|| DateRange::previous_month(Utc::now().date_naive()));
        debug!(start = %range.start, end = %range.end, "requesting workouts");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", api::ACTION_GET_WORKOUTS.to_string()),
                ("startdateymd", range.start_ymd()),
                ("enddateymd", range.end_ymd()),
            ])
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let http_status = response.status();
        let text = response.text().await?;
        if !http_status.is_success() {
            return Err(Error::TokenOrRequest { body: text });
        }

        let envelope: MeasureEnvelope = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => return Err(Error::TokenOrRequest { body: text }),
        };
        if envelope.status != api::STATUS_OK {
            return Err(Error::TokenOrRequest { body: text });
        }

        let series = envelope.body.map(|body| body.series).unwrap_or_default();
        info!(count = series.len(), "fetched workouts");

        if include_walking {
            Ok(series)
        } else {
            Ok(exclude_walking(series))
        }
    }
}

fn exclude_walking(workouts: Vec<Workout>) -> Vec<Workout> {
    let walking = WorkoutCategory::Walking.id();
    workouts
        .into_iter()
        .filter(|workout| workout.category != walking)
        .collect()
}

#[derive(Debug, Deserialize)]
struct MeasureEnvelope {
    status: i64,
    body: Option<MeasureBody>,
}

#[derive(Debug, Deserialize)]
struct MeasureBody {
    #[serde(default)]
    series: Vec<Workout>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

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
    fn exclude_walking_removes_only_category_one_in_order() {
        let workouts = vec![
            workout(2, 1_000),
            workout(1, 2_000),
            workout(6, 3_000),
            workout(1, 4_000),
            workout(7, 5_000),
        ];

        let filtered = exclude_walking(workouts);
        let categories: Vec<i64> = filtered.iter().map(|w| w.category).collect();
        assert_eq!(categories, vec![2, 6, 7]);
    }

    #[test]
    fn envelope_with_missing_body_parses_to_no_series() {
        let envelope: MeasureEnvelope = serde_json::from_str("{\"status\":0}").unwrap();
        assert_eq!(envelope.status, 0);
        assert!(envelope.body.is_none());
    }
}
