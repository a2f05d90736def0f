//! # Supabase REST Client
//!
//! Thin PostgREST client used by the Supabase tool server. Every request
//! carries the project key both as `apikey` and as a bearer token.
//!
//! Filters are equality matches encoded as `column=eq.value`; mutations ask
//! for `return=representation` so the affected rows come back.

use regex::Regex;
use reqwest::{Method, RequestBuilder};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

pub const URL_ENV: &str = "SUPABASE_URL";
pub const KEY_ENV: &str = "SUPABASE_KEY";

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("SUPABASE_URL and SUPABASE_KEY must be set in environment variables.")]
    MissingCredentials,

    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            key: key.to_string(),
        }
    }

    /// Build from `SUPABASE_URL` and `SUPABASE_KEY`.
    pub fn from_env() -> Result<Self, SupabaseError> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        match (read(URL_ENV), read(KEY_ENV)) {
            (Some(url), Some(key)) => Ok(Self::new(&url, &key)),
            _ => Err(SupabaseError::MissingCredentials),
        }
    }

    /// Call a database function: `POST /rpc/{function}`.
    pub async fn rpc(&self, function: &str, params: Value) -> Result<Value, SupabaseError> {
        let url = format!("{}/rpc/{}", self.rest_url, function);
        self.send(self.request(Method::POST, &url).json(&params)).await
    }

    /// Insert one row or an array of rows.
    pub async fn insert(&self, table: &str, rows: Value) -> Result<Value, SupabaseError> {
        let request = self
            .request(Method::POST, &self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(&rows);
        self.send(request).await
    }

    pub async fn update(
        &self,
        table: &str,
        matches: &Map<String, Value>,
        values: &Map<String, Value>,
    ) -> Result<Value, SupabaseError> {
        let request = self
            .request(Method::PATCH, &self.table_url(table)?)
            .query(&eq_filters(matches))
            .header("Prefer", "return=representation")
            .json(values);
        self.send(request).await
    }

    pub async fn delete(
        &self,
        table: &str,
        matches: &Map<String, Value>,
    ) -> Result<Value, SupabaseError> {
        let request = self
            .request(Method::DELETE, &self.table_url(table)?)
            .query(&eq_filters(matches))
            .header("Prefer", "return=representation");
        self.send(request).await
    }

    /// `GET /{table}?select=*` with extra raw filters and a row limit.
    pub async fn select(
        &self,
        table: &str,
        filters: &[(String, String)],
        limit: Option<u32>,
    ) -> Result<Value, SupabaseError> {
        let url = self.table_url(table)?;
        let mut query: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        query.extend(filters.iter().cloned());
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        let request = self.request(Method::GET, &url).query(&query);
        self.send(request).await
    }

    /// The table name becomes a path segment, so only plain identifiers pass.
    fn table_url(&self, table: &str) -> Result<String, SupabaseError> {
        if !is_identifier(table) {
            return Err(SupabaseError::InvalidTable(table.to_string()));
        }
        Ok(format!("{}/{}", self.rest_url, table))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Supabase response");

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // 204 and `return=minimal` responses carry no body.
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    static IDENTIFIER: OnceLock<Option<Regex>> = OnceLock::new();
    IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Encode equality filters the PostgREST way.
pub fn eq_filters(matches: &Map<String, Value>) -> Vec<(String, String)> {
    matches
        .iter()
        .map(|(column, value)| {
            let filter = match value {
                Value::Null => "is.null".to_string(),
                Value::String(s) => format!("eq.{}", s),
                other => format!("eq.{}", other),
            };
            (column.clone(), filter)
        })
        .collect()
}

/// Case-insensitive substring filter.
pub fn ilike_filter(column: &str, query: &str) -> (String, String) {
    (column.to_string(), format!("ilike.*{}*", query))
}
