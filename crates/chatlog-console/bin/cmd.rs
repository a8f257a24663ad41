pub(crate) mod console;
pub(crate) mod dump;

use chatlog_console::{default_agent, LogFetcher, LogQuery, PrefixIdResolver, ViewContext};
use clap::Args;
use std::time::Duration;

/// Where the logs come from and which month to show.
#[derive(Debug, Clone, Args)]
pub struct LogSource {
    /// Base URL of the log API
    #[arg(long, env = "CHATLOG_API_BASE_URL")]
    pub api_base_url: String,

    /// Channel name, or `id:<number>` for a channel id
    #[arg(long, env = "CHATLOG_CHANNEL")]
    pub channel: String,

    /// User name, or `id:<number>` for a user id
    #[arg(long, env = "CHATLOG_USER")]
    pub user: String,

    #[arg(long)]
    pub year: String,

    #[arg(long)]
    pub month: String,

    /// Treat all-digit channel and user values as ids
    #[arg(long)]
    pub numeric_ids: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

impl LogSource {
    pub(crate) fn context(&self) -> ViewContext {
        ViewContext::new(&self.api_base_url)
            .channel(&self.channel)
            .username(&self.user)
    }

    pub(crate) fn fetcher(&self, context: &ViewContext) -> LogFetcher {
        let agent = default_agent(Duration::from_secs(self.timeout_secs));
        LogFetcher::with_agent(&context.api_base_url, agent)
            .resolver(PrefixIdResolver::new().numeric_ids(self.numeric_ids))
    }

    pub(crate) fn month_query(&self, context: &ViewContext) -> LogQuery {
        context.month_query(&self.year, &self.month)
    }
}
