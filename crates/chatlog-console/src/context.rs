use std::sync::atomic::{AtomicU64, Ordering};

use crate::fetcher::LogQuery;

static NEXT_SEARCH_FIELD: AtomicU64 = AtomicU64::new(1);

/// Identity of a search input owned by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchFieldId(u64);

impl SearchFieldId {
    pub fn next() -> Self {
        Self(NEXT_SEARCH_FIELD.fetch_add(1, Ordering::Relaxed))
    }
}

/// Application state shared with the log views.
///
/// Views read the connection settings from it and register the search
/// input that global shortcuts should focus.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub api_base_url: String,
    pub current_channel: Option<String>,
    pub current_username: Option<String>,
    active_search: Option<SearchFieldId>,
}

impl ViewContext {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.current_channel = Some(channel.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.current_username = Some(username.into());
        self
    }

    pub fn register_search_field(&mut self, id: SearchFieldId) {
        self.active_search = Some(id);
    }

    pub fn active_search_field(&self) -> Option<SearchFieldId> {
        self.active_search
    }

    /// Query for one month of the current channel and user, without paging.
    pub fn month_query(&self, year: &str, month: &str) -> LogQuery {
        LogQuery::new(
            self.current_channel.clone().unwrap_or_default(),
            self.current_username.clone().unwrap_or_default(),
            year,
            month,
        )
    }
}
