use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub mod context;
pub mod emotes;
pub mod fetcher;
pub mod ids;
pub mod pager;
pub mod window;

pub use context::{SearchFieldId, ViewContext};
pub use emotes::{fragments, parse_emotes, EmoteParseError, Fragment};
pub use fetcher::{default_agent, FetchError, LogFetcher, LogQuery, DEFAULT_TIMEOUT};
pub use ids::{IdResolver, PrefixIdResolver, Subject};
pub use pager::{LogPager, PageCompletion, PageRequest, Row, CHUNK_SIZE};
pub use window::{VirtualWindow, LOAD_THRESHOLD};

/// A single emote occurrence inside a message.
///
/// Indices count Unicode code points, `end_index` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    pub start_index: usize,
    pub end_index: usize,
    pub code: String,
}

/// A decoded chat log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub emotes: Vec<Emote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<u32>,
}

impl LogMessage {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            text: text.into(),
            timestamp,
            tags: BTreeMap::new(),
            emotes: Vec::new(),
            username: None,
            display_name: None,
            channel: None,
            message_type: None,
        }
    }

    /// Display name if the server sent one, login name otherwise.
    pub fn author(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref())
    }

    /// Case-insensitive substring match. `needle_lower` must already be lowercase.
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.text.to_lowercase().contains(needle_lower)
    }
}

/// Output format of the `dump` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
    JsonPretty,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Table => "table",
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "json-pretty" => Ok(Format::JsonPretty),
            other => Err(format!(
                "invalid format `{}` (expected table, json or json-pretty)",
                other
            )),
        }
    }
}
