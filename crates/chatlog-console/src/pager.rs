//! Paging and search state of a log view.
//!
//! [`LogPager`] never performs I/O. It hands out [`PageRequest`]s, the caller
//! runs them and feeds the outcome back through [`LogPager::apply`] in the
//! order completions arrive. Both page loads and search-triggered loads share
//! the `is_loading` gate, so at most one request is in flight.

use tracing::{debug, warn};

use crate::context::{SearchFieldId, ViewContext};
use crate::fetcher::{FetchError, LogQuery};
use crate::LogMessage;

/// Number of messages requested per page.
pub const CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Next page of at most `limit` messages.
    Chunk { offset: usize, limit: usize },
    /// Everything after `offset`, in one unbounded request.
    Remainder { offset: usize },
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        match self {
            PageRequest::Chunk { offset, .. } | PageRequest::Remainder { offset } => *offset,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            PageRequest::Chunk { limit, .. } => Some(*limit),
            PageRequest::Remainder { .. } => None,
        }
    }

    /// Applies this request's paging to a month query.
    pub fn to_query(&self, month: &LogQuery) -> LogQuery {
        month
            .clone()
            .limit(self.limit())
            .offset(Some(self.offset()))
    }
}

/// Outcome of a [`PageRequest`].
#[derive(Debug)]
pub struct PageCompletion {
    pub request: PageRequest,
    pub result: Result<Vec<LogMessage>, FetchError>,
}

/// What a visible row shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    Message(&'a LogMessage),
    Loading,
}

#[derive(Debug)]
pub struct LogPager {
    messages: Vec<LogMessage>,
    has_next_page: bool,
    is_loading: bool,
    chunk_size: usize,
    search: String,
    search_lower: String,
    filtered: Vec<usize>,
    search_field: SearchFieldId,
    last_error: Option<String>,
}

impl Default for LogPager {
    fn default() -> Self {
        Self::new()
    }
}

impl LogPager {
    pub fn new() -> Self {
        Self::with_chunk_size(CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            messages: Vec::new(),
            has_next_page: true,
            is_loading: false,
            chunk_size: chunk_size.max(1),
            search: String::new(),
            search_lower: String::new(),
            filtered: Vec::new(),
            search_field: SearchFieldId::next(),
            last_error: None,
        }
    }

    /// Registers this view's search field as the active one.
    pub fn mount(&self, context: &mut ViewContext) {
        context.register_search_field(self.search_field);
    }

    pub fn search_field(&self) -> SearchFieldId {
        self.search_field
    }

    /// Starts loading the next page unless a load is running or none is left.
    pub fn request_page(&mut self) -> Option<PageRequest> {
        if self.is_loading || !self.has_next_page {
            return None;
        }
        self.is_loading = true;
        Some(PageRequest::Chunk {
            offset: self.messages.len(),
            limit: self.chunk_size,
        })
    }

    /// Replaces the search text and refilters the loaded messages.
    ///
    /// While more pages exist and nothing is loading, this also starts an
    /// unbounded load of the rest of the month so the filter sees everything.
    pub fn set_search(&mut self, text: impl Into<String>) -> Option<PageRequest> {
        self.search = text.into();
        self.search_lower = self.search.to_lowercase();
        self.filtered = self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, msg)| msg.matches(&self.search_lower))
            .map(|(i, _)| i)
            .collect();

        if !self.has_next_page || self.is_loading {
            return None;
        }
        self.is_loading = true;
        Some(PageRequest::Remainder {
            offset: self.messages.len(),
        })
    }

    /// Applies a finished request to the current state.
    pub fn apply(&mut self, completion: PageCompletion) {
        self.is_loading = false;
        let PageCompletion { request, result } = completion;

        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, offset = request.offset(), "log page failed to load");
                self.last_error = Some(e.to_string());
                self.has_next_page = false;
                return;
            }
        };

        let received = batch.len();
        debug!(
            offset = request.offset(),
            loaded = self.messages.len(),
            received,
            "applying log page"
        );
        self.append(batch);

        match request {
            PageRequest::Chunk { limit, .. } => {
                if received < limit {
                    self.has_next_page = false;
                }
            }
            // Cleared even if the server cut the unbounded response short.
            PageRequest::Remainder { .. } => self.has_next_page = false,
        }
    }

    fn append(&mut self, batch: Vec<LogMessage>) {
        let start = self.messages.len();
        self.messages.extend(batch);
        for (i, msg) in self.messages.iter().enumerate().skip(start) {
            if msg.matches(&self.search_lower) {
                self.filtered.push(i);
            }
        }
    }

    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    pub fn loaded_len(&self) -> usize {
        self.messages.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered(&self) -> impl Iterator<Item = &LogMessage> + '_ {
        self.filtered.iter().map(|&i| &self.messages[i])
    }

    pub fn filtered_message(&self, index: usize) -> Option<&LogMessage> {
        self.filtered.get(index).map(|&i| &self.messages[i])
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Rows to render: filtered messages plus a trailing loading row while
    /// more pages exist.
    pub fn item_count(&self) -> usize {
        self.filtered.len() + usize::from(self.has_next_page)
    }

    pub fn is_item_loaded(&self, index: usize) -> bool {
        !self.has_next_page || index < self.filtered.len()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        if index >= self.item_count() {
            return None;
        }
        match self.filtered_message(index) {
            Some(msg) => Some(Row::Message(msg)),
            None => Some(Row::Loading),
        }
    }
}
