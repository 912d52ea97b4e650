//! Remote HTTP event store client
//!
//! Fetches session listings and raw event records from a remote store
//! over HTTP. This is the only blocking/external call in the pipeline,
//! so requests carry a bounded timeout and surface
//! [`Error::StoreUnavailable`] instead of blocking indefinitely. Retry
//! policy belongs to the caller.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{EventStore, RawEventRecord};
use crate::types::SessionSummary;

/// HTTP client for a remote event store.
pub struct HttpEventStore {
    http_client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpEventStore {
    /// Create a new client from configuration.
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .server_url
            .clone()
            .ok_or_else(|| Error::Config("store.server_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// GET a JSON list, treating 404 as an empty result.
    fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .map_err(|e| Error::StoreUnavailable(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }

        if status.is_success() {
            response
                .json()
                .map_err(|e| Error::StoreUnavailable(format!("failed to parse response: {}", e)))
        } else {
            let error_text = response.text().unwrap_or_else(|_| "unknown".to_string());
            Err(Error::StoreUnavailable(format!(
                "API error ({}): {}",
                status, error_text
            )))
        }
    }
}

impl EventStore for HttpEventStore {
    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let url = format!(
            "{}/users/{}/sessions",
            self.base_url,
            urlencoding::encode(user_id)
        );
        self.get_list(&url)
    }

    fn fetch_events(&self, user_id: &str, session_id: &str) -> Result<Vec<RawEventRecord>> {
        let url = format!(
            "{}/users/{}/sessions/{}/events",
            self.base_url,
            urlencoding::encode(user_id),
            urlencoding::encode(session_id)
        );
        self.get_list(&url)
    }
}
