// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI for the Withings workout client: drive the authorization flow,
//! refresh tokens, and print per-category workout counts.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use withings_workouts::aggregate::{self, CategoryCounts};
use withings_workouts::client::WorkoutsClient;
use withings_workouts::constants::oauth;
use withings_workouts::errors::Error;
use withings_workouts::logging;
use withings_workouts::models::{DateRange, Workout};
use withings_workouts::oauth2_client::{generate_state, OAuth2Client, OAuth2Config};
use withings_workouts::store::{CredentialStore, Credentials, EnvFileStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Credential file (defaults to the user config directory, or
    /// WITHINGS_CREDENTIALS_FILE)
    #[arg(short, long)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the authorization flow and store the resulting tokens
    Authorize {
        /// Redirect URI registered with the Withings developer portal
        /// (falls back to WITHINGS_REDIRECT_URI)
        #[arg(long)]
        redirect_uri: Option<String>,
    },
    /// Exchange the stored refresh token for a fresh token pair
    Refresh,
    /// Fetch workouts and print per-category counts
    Workouts {
        /// First day of the range (YYYY-MM-DD); defaults to the previous
        /// calendar month
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        /// Count walking sessions as workouts
        #[arg(long)]
        include_walking: bool,
        /// Aggregation policy
        #[arg(long, value_enum, default_value = "sessions")]
        by: Policy,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    /// Every session counts once
    Sessions,
    /// Distinct days with at least one session per category
    Days,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let cli = Cli::parse();
    let store = match cli.credentials {
        Some(path) => EnvFileStore::new(path),
        None => EnvFileStore::default_location(),
    };

    match cli.command {
        Command::Authorize { redirect_uri } => authorize(&store, redirect_uri).await,
        Command::Refresh => {
            let mut credentials = load_credentials(&store)?;
            refresh_tokens(&mut credentials, &store).await?;
            println!("Tokens refreshed and stored at {}.", store.path().display());
            Ok(())
        }
        Command::Workouts {
            start,
            end,
            include_walking,
            by,
        } => workouts(&store, start, end, include_walking, by).await,
    }
}

async fn authorize(store: &EnvFileStore, redirect_uri: Option<String>) -> Result<()> {
    let mut credentials = load_or_prompt_credentials(store)?;
    let redirect_uri = redirect_uri
        .or_else(oauth::redirect_uri)
        .context("no redirect URI; pass --redirect-uri or set WITHINGS_REDIRECT_URI (it must match the URI registered with the provider exactly)")?;

    let config = OAuth2Config::from_credentials(&credentials, redirect_uri)?;
    let client = OAuth2Client::new(config)?;
    let state = generate_state();

    println!("Open this URL in your browser and allow access to your data:");
    println!();
    println!("  {}", client.authorization_url(&state)?);
    println!();
    println!("You will be redirected to your redirect URI. Copy the value");
    println!("between 'code=' and '&state' from that URL.");
    let code = prompt("Authorization code: ")?;
    if code.is_empty() {
        bail!("no authorization code entered");
    }

    let token = client.exchange_code(&code).await?;
    credentials.update_tokens(&token.access_token, &token.refresh_token);
    store.save(&credentials)?;
    info!(path = %store.path().display(), "tokens stored");
    println!("Authentication successful.");
    Ok(())
}

async fn workouts(
    store: &EnvFileStore,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    include_walking: bool,
    by: Policy,
) -> Result<()> {
    let mut credentials = load_credentials(store)?;
    let access_token = credentials
        .access_token
        .clone()
        .context("no access token stored; run `withings-workouts authorize` first")?;

    let range = match (start, end) {
        (Some(start), Some(end)) => {
            if end < start {
                bail!("range ends ({end}) before it starts ({start})");
            }
            DateRange::new(start, end)
        }
        _ => DateRange::previous_month(Utc::now().date_naive()),
    };

    let workouts = match fetch(&access_token, range, include_walking).await {
        Ok(workouts) => workouts,
        // A rejected request may just be an expired access token. With a
        // refresh token on hand, refresh once and retry before giving up.
        Err(Error::TokenOrRequest { body }) if credentials.refresh_token.is_some() => {
            warn!(body = %body, "workout request rejected, refreshing tokens and retrying");
            let access_token = refresh_tokens(&mut credentials, store).await?;
            fetch(&access_token, range, include_walking).await?
        }
        Err(err) => return Err(err.into()),
    };

    let counts = match by {
        Policy::Sessions => aggregate::count_sessions(&workouts)?,
        Policy::Days => aggregate::count_unique_days(&workouts)?,
    };

    println!(
        "Workouts from {} to {}:",
        range.start.format("%d %B %Y"),
        range.end.format("%d %B %Y")
    );
    print_table(&counts);
    Ok(())
}

async fn fetch(
    access_token: &str,
    range: DateRange,
    include_walking: bool,
) -> std::result::Result<Vec<Workout>, Error> {
    let client = WorkoutsClient::new(access_token)?;
    client.fetch_workouts(Some(range), include_walking).await
}

/// Refresh the token pair and persist it, returning the new access token.
async fn refresh_tokens(credentials: &mut Credentials, store: &EnvFileStore) -> Result<String> {
    let refresh_token = credentials
        .refresh_token
        .clone()
        .context("no refresh token stored; run `withings-workouts authorize` first")?;

    // The refresh grant never sends the redirect URI, so an unset one is
    // fine here.
    let config = OAuth2Config::from_credentials(
        credentials,
        oauth::redirect_uri().unwrap_or_default(),
    )?;
    let client = OAuth2Client::new(config)?;
    let token = client.refresh_token(&refresh_token).await?;

    credentials.update_tokens(&token.access_token, &token.refresh_token);
    store.save(credentials)?;
    info!("refreshed tokens stored");
    Ok(token.access_token)
}

fn load_credentials(store: &EnvFileStore) -> Result<Credentials> {
    store.load()?.with_context(|| {
        format!(
            "no credentials at {}; run `withings-workouts authorize` first",
            store.path().display()
        )
    })
}

/// Load stored credentials, or register the client interactively the
/// first time around and persist the entered id/secret immediately.
fn load_or_prompt_credentials(store: &EnvFileStore) -> Result<Credentials> {
    if let Some(credentials) = store.load()? {
        info!(path = %store.path().display(), "using stored client credentials");
        return Ok(credentials);
    }

    println!("No stored credentials at {}.", store.path().display());
    let client_id = prompt("Client id (from your Withings developer portal): ")?;
    let client_secret = prompt("Client secret: ")?;
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(Error::Configuration(
            "a client id and secret are required; register an application in the developer portal"
                .into(),
        )
        .into());
    }

    let credentials = Credentials::new(client_id, client_secret);
    store.save(&credentials)?;
    println!("Stored client credentials at {}.", store.path().display());
    Ok(credentials)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_table(counts: &CategoryCounts) {
    if counts.is_empty() {
        println!("No workouts recorded in this range.");
        return;
    }

    let mut rows: Vec<(&str, u64)> = counts
        .iter()
        .map(|(category, count)| (category.display_name(), *count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let width = rows
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("total".len());

    for (name, count) in &rows {
        println!("{name:<width$}  {count:>5}");
    }
    let total: u64 = rows.iter().map(|(_, count)| count).sum();
    println!("{:<width$}  {total:>5}", "total");
}
