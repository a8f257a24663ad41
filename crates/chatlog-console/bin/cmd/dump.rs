use chatlog_console::{Format, LogMessage, LogPager, PageCompletion, CHUNK_SIZE};
use clap::Args;
use eyre::{eyre, Result};
use prettytable::{Cell, Row, Table};
use tracing::info;

use super::LogSource;
use crate::logging;

#[derive(Debug, Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: LogSource,

    /// Output format: table, json or json-pretty
    #[arg(long, default_value = "table")]
    pub format: Format,

    /// Only print messages containing this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Messages per request while paging
    #[arg(long, default_value_t = CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl DumpArgs {
    pub fn run(&self) -> Result<()> {
        logging::init_stderr()?;

        let context = self.source.context();
        let fetcher = self.source.fetcher(&context);
        let month = self.source.month_query(&context);

        let mut pager = LogPager::with_chunk_size(self.chunk_size);
        let mut pending = self.search.as_ref().and_then(|s| pager.set_search(s.as_str()));

        while let Some(request) = pending.take().or_else(|| pager.request_page()) {
            let result = fetcher.fetch(&request.to_query(&month));
            pager.apply(PageCompletion { request, result });
        }

        if let Some(error) = pager.last_error() {
            return Err(eyre!("Failed to load logs: {}", error));
        }

        info!(
            loaded = pager.loaded_len(),
            shown = pager.filtered_len(),
            "logs loaded"
        );

        let messages: Vec<&LogMessage> = pager.filtered().collect();
        print_messages(&messages, self.format)
    }
}

fn print_messages(messages: &[&LogMessage], format: Format) -> Result<()> {
    match format {
        Format::Table => {
            if messages.is_empty() {
                println!("No log messages found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("Timestamp"),
                Cell::new("User"),
                Cell::new("Message"),
                Cell::new("Emotes"),
            ]));

            for msg in messages {
                let emotes = msg
                    .emotes
                    .iter()
                    .map(|e| e.code.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                table.add_row(Row::new(vec![
                    Cell::new(&msg.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                    Cell::new(msg.author().unwrap_or("")),
                    Cell::new(&msg.text),
                    Cell::new(&emotes),
                ]));
            }

            table.printstd();
        }
        Format::Json => println!("{}", serde_json::to_string(messages)?),
        Format::JsonPretty => println!("{}", serde_json::to_string_pretty(messages)?),
    }
    Ok(())
}
