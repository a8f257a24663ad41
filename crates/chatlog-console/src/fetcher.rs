//! Retrieval of one channel/user/month log from the log API.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::emotes::{parse_emotes, EmoteParseError};
use crate::ids::{IdResolver, PrefixIdResolver};
use crate::LogMessage;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("log response does not match the expected schema: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("message {index} has an invalid timestamp `{value}`")]
    Timestamp { index: usize, value: String },
    #[error("message {index} has malformed emote positions")]
    Emotes {
        index: usize,
        #[source]
        source: EmoteParseError,
    },
}

/// Parameters of a single log request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub channel: String,
    pub username: String,
    pub year: String,
    pub month: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl LogQuery {
    pub fn new(
        channel: impl Into<String>,
        username: impl Into<String>,
        year: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            username: username.into(),
            year: year.into(),
            month: month.into(),
            limit: None,
            offset: None,
        }
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: Option<usize>) -> Self {
        self.offset = offset;
        self
    }
}

/// Builds an agent that reports every HTTP status as a response.
pub fn default_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

#[derive(Clone)]
pub struct LogFetcher {
    agent: ureq::Agent,
    base_url: String,
    resolver: Arc<dyn IdResolver>,
}

impl fmt::Debug for LogFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LogFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_agent(base_url, default_agent(DEFAULT_TIMEOUT))
    }

    pub fn with_agent(base_url: impl Into<String>, agent: ureq::Agent) -> Self {
        Self {
            agent,
            base_url: base_url.into(),
            resolver: Arc::new(PrefixIdResolver::new()),
        }
    }

    pub fn resolver(mut self, resolver: impl IdResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `query`.
    ///
    /// `limit` and `offset` are left out when absent or zero.
    pub fn query_url(&self, query: &LogQuery) -> String {
        let channel = self.resolver.resolve(query.channel.trim());
        let user = self.resolver.resolve(query.username.trim());

        let mut url = format!(
            "{}/channel{}/{}/user{}/{}/{}/{}?jsonBasic=1",
            self.base_url.trim_end_matches('/'),
            channel.route_suffix(),
            channel.value(),
            user.route_suffix(),
            user.value(),
            query.year.trim(),
            query.month.trim(),
        );
        let paging = [("limit", query.limit), ("offset", query.offset)];
        for (name, value) in paging {
            if let Some(value) = value.filter(|v| *v > 0) {
                url.push_str(&format!("&{}={}", name, value));
            }
        }
        url
    }

    /// Fetches the messages selected by `query`.
    ///
    /// Transport failures and non-success statuses yield an empty list.
    /// A body that does not decode is an error.
    pub fn fetch(&self, query: &LogQuery) -> Result<Vec<LogMessage>, FetchError> {
        let url = self.query_url(query);
        debug!(%url, "fetching logs");

        let mut response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "log request failed");
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "log request returned non-success status");
            return Ok(Vec::new());
        }

        let body: LogResponse = serde_json::from_reader(response.body_mut().as_reader())?;
        let messages = decode_messages(body)?;
        debug!(%url, count = messages.len(), "decoded logs");
        Ok(messages)
    }
}

#[derive(Debug, Deserialize)]
struct LogResponse {
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    text: String,
    timestamp: RawTimestamp,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default, rename = "type")]
    message_type: Option<u32>,
}

/// Timestamps arrive either as RFC 3339 strings or as epoch milliseconds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawTimestamp::Millis(ms) => ms.to_string(),
            RawTimestamp::Text(s) => s.clone(),
        }
    }
}

fn decode_messages(body: LogResponse) -> Result<Vec<LogMessage>, FetchError> {
    body.messages
        .into_iter()
        .enumerate()
        .map(|(index, raw)| decode_message(index, raw))
        .collect()
}

fn decode_message(index: usize, raw: RawMessage) -> Result<LogMessage, FetchError> {
    let timestamp = raw.timestamp.to_utc().ok_or_else(|| FetchError::Timestamp {
        index,
        value: raw.timestamp.describe(),
    })?;
    let tags = raw.tags.unwrap_or_default();
    let emotes = parse_emotes(&raw.text, tags.get("emotes").map(String::as_str))
        .map_err(|source| FetchError::Emotes { index, source })?;

    Ok(LogMessage {
        id: raw.id,
        text: raw.text,
        timestamp,
        tags,
        emotes,
        username: raw.username,
        display_name: raw.display_name,
        channel: raw.channel,
        message_type: raw.message_type,
    })
}
