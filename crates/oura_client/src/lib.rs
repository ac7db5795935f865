//! Resolver-style client for the Oura Ring V2 `usercollection` API.
//!
//! The crate exposes the daily summaries (sleep, activity, readiness, stress)
//! through a [`root::Root`] resolver that hands out one
//! [`collection::CollectionResolver`] per collection. Paging over a date range
//! is driven by the [`window`] calculator.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

pub mod collection;
pub mod config;
pub mod http_client;
pub mod root;
pub mod token;
pub mod utils;
pub mod window;

pub use collection::{CollectionResolver, ItemRef, Page};
pub use root::{Root, Status};
pub use token::TokenStore;
pub use window::{DateWindow, PageRequest, WindowPlan};

#[derive(Debug, Error)]
pub enum OuraError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    RemoteApi { status: u16, body: String },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("decoding response: {0}")]
    Decode(String),
}

/// The daily summary collections served by this client.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    DailySleep,
    DailyActivity,
    DailyReadiness,
    DailyStress,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::DailySleep,
        Collection::DailyActivity,
        Collection::DailyReadiness,
        Collection::DailyStress,
    ];

    /// Path segment under `/v2/usercollection`.
    pub fn endpoint(self) -> &'static str {
        match self {
            Collection::DailySleep => "daily_sleep",
            Collection::DailyActivity => "daily_activity",
            Collection::DailyReadiness => "daily_readiness",
            Collection::DailyStress => "daily_stress",
        }
    }

    /// Field name of the collection on the root resolver.
    pub fn resolver_name(self) -> &'static str {
        match self {
            Collection::DailySleep => "dailySleep",
            Collection::DailyActivity => "dailyActivity",
            Collection::DailyReadiness => "dailyReadiness",
            Collection::DailyStress => "dailyStress",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// A single daily summary. Only `id` is interpreted; every other field the
/// vendor sends is kept verbatim in `fields`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl DailyRecord {
    /// The calendar day (`YYYY-MM-DD`) the summary belongs to, when present.
    pub fn day(&self) -> Option<&str> {
        self.fields.get("day").and_then(|v| v.as_str())
    }
}

/// Body of a list endpoint: `{"data": [...], "next_token": ...}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Vec<DailyRecord>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Query for a list endpoint using the vendor's own `next_token` paging.
/// Only the parameters that are set are sent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct RangeQuery {
    #[serde(default, alias = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, alias = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl RangeQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = &self.start_date {
            pairs.push(("start_date", s.clone()));
        }
        if let Some(e) = &self.end_date {
            pairs.push(("end_date", e.clone()));
        }
        if let Some(t) = &self.next_token {
            pairs.push(("next_token", t.clone()));
        }
        pairs
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait OuraClient: Send + Sync + 'static {
    /// Fetch `/<collection>/<id>`.
    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DailyRecord, OuraError>;

    /// Fetch `/<collection>` with the given query parameters.
    async fn list_documents(
        &self,
        collection: Collection,
        query: &RangeQuery,
    ) -> Result<ListResponse, OuraError>;
}
