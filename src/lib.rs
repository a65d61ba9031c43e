// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Withings Workouts
//!
//! A client for the Withings web API: OAuth2 token lifecycle, workout
//! retrieval for a date range, and per-category aggregation.
//!
//! ## Features
//!
//! - **OAuth2 authentication**: authorization-code exchange and token
//!   refresh against the Withings token endpoint
//! - **Workout retrieval**: `getworkouts` with explicit or
//!   previous-calendar-month date ranges
//! - **Aggregation**: per-category session counts or unique-day counts
//! - **Durable credentials**: flat `KEY=VALUE` file store, injected
//!   rather than ambient
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use withings_workouts::aggregate;
//! use withings_workouts::client::WorkoutsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), withings_workouts::errors::Error> {
//!     let client = WorkoutsClient::new("access-token")?;
//!
//!     // Previous calendar month, walking excluded.
//!     let workouts = client.fetch_workouts(None, false).await?;
//!
//!     let counts = aggregate::count_sessions(&workouts)?;
//!     for (category, count) in &counts {
//!         println!("{}: {}", category.display_name(), count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **oauth2_client**: authorization URL construction, code exchange,
//!   token refresh
//! - **client**: measurement endpoint access with envelope-status checks
//! - **aggregate**: the two counting policies
//! - **models**: workout records, the closed category enumeration, date
//!   ranges
//! - **store**: credential persistence behind an injected trait

/// Per-category aggregation policies.
pub mod aggregate;

/// Client for the measurement endpoint.
pub mod client;

/// Provider endpoints and environment-based configuration values.
pub mod constants;

/// Error taxonomy.
pub mod errors;

/// Structured logging setup.
pub mod logging;

/// Workout records, categories, and date ranges.
pub mod models;

/// OAuth2 client for the token endpoint.
pub mod oauth2_client;

/// Credential persistence.
pub mod store;
