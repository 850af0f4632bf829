use crate::models::{DailyHabits, Habit};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

const TABLE: &str = "daily_habits";

/// Both people share one remote row per day; there is no per-user
/// authentication in this system.
pub const SHARED_OWNER: &str = "shared";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store returned status {0}")]
    Status(StatusCode),
}

/// Row-store client for the shared daily habits table, speaking the
/// PostgREST dialect the hosted datastore exposes.
#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct DayRow<'a> {
    date: &'a str,
    owner: &'a str,
    habits: &'a [Habit],
}

#[derive(Debug, Deserialize)]
struct HabitsRow {
    habits: Vec<Habit>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Returns `None` when the datastore is not configured; the app then
    /// runs local-only.
    pub fn from_env() -> Option<Self> {
        let url = env::var("SUPABASE_URL").ok()?;
        let key = env::var("SUPABASE_ANON_KEY").ok()?;
        if url.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self::new(url, key))
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    /// Fetches the habits stored for one date-key. An empty result set is
    /// the distinguished not-found outcome, not an error.
    pub async fn select_day(&self, date: &str) -> Result<Option<Vec<Habit>>, RemoteError> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[
                ("select", "habits".to_string()),
                ("date", format!("eq.{date}")),
                ("owner", format!("eq.{SHARED_OWNER}")),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let mut rows: Vec<HabitsRow> = response.json().await?;
        Ok(rows.pop().map(|row| row.habits))
    }

    /// Last-write-wins upsert of the whole day row, keyed by date and the
    /// shared owner.
    pub async fn upsert_day(&self, day: &DailyHabits) -> Result<(), RemoteError> {
        let row = DayRow {
            date: &day.date,
            owner: SHARED_OWNER,
            habits: &day.habits,
        };
        let response = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "date,owner")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .header(header::CONTENT_TYPE, "application/json")
            .json(&[row])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        Ok(())
    }
}
