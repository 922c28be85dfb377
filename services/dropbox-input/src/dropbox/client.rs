use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::{Client, Response, StatusCode};

use super::models::{EventsRequest, GetEventsArg, GetEventsContinueArg, TimeRange};

pub const DEFAULT_BASE_URL: &str = "https://api.dropboxapi.com";

/// How far back a first walk reaches when no start date is configured.
const DEFAULT_LOOKBACK_DAYS: i64 = 90;

const START_TIME_FORMAT: &str = "%Y-%m-%d";
// Days carry no time of day, so formatting one yields midnight.
const REQUEST_TIME_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

#[derive(Debug, Clone)]
pub struct DropboxClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DropboxClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl DropboxClientConfig {
    /// Load Dropbox API settings from environment, falling back to the
    /// public API endpoint and a 10 second timeout.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("DROPBOX_API_BASE_URL")
            .ok()
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("DROPBOX_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            timeout_secs,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DropboxClientError {
    #[error("Incorrect Start Time format. Should be YYYY-MM-DD (got {0:?})")]
    InvalidStartTime(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// Parse a configured `YYYY-MM-DD` start date.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, DropboxClientError> {
    NaiveDate::parse_from_str(raw, START_TIME_FORMAT)
        .map_err(|_| DropboxClientError::InvalidStartTime(raw.to_string()))
}

/// Start of the first walk as sent to the API: the configured day, or
/// `today` minus 90 days, at midnight UTC.
pub fn resolve_start_time(
    start_time: Option<&str>,
    today: NaiveDate,
) -> Result<String, DropboxClientError> {
    let day = match start_time.filter(|s| !s.is_empty()) {
        Some(raw) => parse_start_date(raw)?,
        None => today - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS),
    };

    Ok(day.format(REQUEST_TIME_FORMAT).to_string())
}

/// Build the request for the next page. A cursor always wins over the
/// start time and category filters.
pub fn build_request(
    cursor: Option<&str>,
    start_time: Option<&str>,
    category: Option<&str>,
    today: NaiveDate,
) -> Result<EventsRequest, DropboxClientError> {
    if let Some(cursor) = cursor {
        return Ok(EventsRequest::Continue(GetEventsContinueArg {
            cursor: cursor.to_string(),
        }));
    }

    Ok(EventsRequest::Start(GetEventsArg {
        time: TimeRange {
            start_time: resolve_start_time(start_time, today)?,
        },
        category: category.filter(|c| !c.is_empty()).map(str::to_string),
    }))
}

#[derive(Clone)]
pub struct DropboxClient {
    client: Client,
    config: DropboxClientConfig,
}

impl DropboxClient {
    pub fn new(config: DropboxClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: create a client pointing at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Issue one page request. There is no retry: transport failures and
    /// non-2xx statuses come back as errors and the caller decides what to do.
    pub async fn send_request(
        &self,
        access_token: &str,
        cursor: Option<&str>,
        start_time: Option<&str>,
        category: Option<&str>,
    ) -> Result<Response, DropboxClientError> {
        let request = build_request(cursor, start_time, category, Utc::now().date_naive())?;
        let url = format!("{}{}", self.config.base_url, request.path());

        tracing::debug!(url = %url, continuation = cursor.is_some(), "requesting team log page");

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DropboxClientError::HttpError { status, body });
        }

        Ok(response)
    }
}
