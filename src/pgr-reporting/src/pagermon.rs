// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! PagerMon client: posts decoded pages to `<base-url>/api/messages`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pgr_core::decode::DecodedPage;

const MESSAGES_PATH: &str = "/api/messages";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default `User-Agent` sent to the server.
pub fn default_user_agent() -> String {
    format!("pgr-rs/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("error creating request: {0}")]
    Request(String),

    #[error("error sending message: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("bad status code: {0}")]
    BadStatus(String),
}

/// One page as submitted to PagerMon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerMonMessage {
    pub address: String,
    pub message: String,
    pub source: String,
    /// Unix seconds at the time the message was prepared for sending.
    pub datetime: i64,
}

impl PagerMonMessage {
    pub fn new(datetime: i64, address: &str, source: &str, message: &str) -> Self {
        Self {
            address: address.to_string(),
            message: message.to_string(),
            source: source.to_string(),
            datetime,
        }
    }

    /// Build a message from a decoded page, stamped with the current time.
    pub fn from_page(page: &DecodedPage, source: &str) -> Self {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(_) => 0,
        };
        Self::new(now, &page.address, source, &page.alpha)
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("address", self.address.clone()),
            ("message", self.message.clone()),
            ("source", self.source.clone()),
            ("datetime", self.datetime.to_string()),
        ]
    }
}

/// Connection settings for [`PagerMonClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerMonClientConfig {
    /// Server base URL, e.g. `https://pagermon.example.org`
    pub base_url: String,
    /// Value of the `apikey` header
    pub api_key: String,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PagerMonClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `"<code> <reason>"`, or just the code when it has no registered reason.
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct PagerMonClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    user_agent: String,
}

impl PagerMonClient {
    /// Build a client with its own connection pool and request timeout.
    pub fn new(cfg: &PagerMonClientConfig) -> Result<Self, SendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| SendError::Request(e.to_string()))?;
        Ok(Self::with_http_client(
            http,
            &cfg.api_key,
            &cfg.base_url,
            &cfg.user_agent,
        ))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        api_key: &str,
        base_url: &str,
        user_agent: &str,
    ) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn message_endpoint(&self) -> String {
        format!("{}{}", self.base_url, MESSAGES_PATH)
    }

    /// Submit one message. Only HTTP 200 counts as success; nothing is retried.
    pub async fn send_message(&self, message: &PagerMonMessage) -> Result<(), SendError> {
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| SendError::Request(format!("invalid api key header: {}", e)))?;
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| SendError::Request(format!("invalid user agent header: {}", e)))?;

        let request = self
            .http
            .post(self.message_endpoint())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(USER_AGENT, user_agent)
            .header("apikey", api_key)
            .form(&message.form_fields())
            .build()
            .map_err(|e| SendError::Request(e.to_string()))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(SendError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SendError::BadStatus(status_text(status)));
        }

        debug!("PagerMon: accepted page for {}", message.address);
        Ok(())
    }
}
