use chatlog_console::{LogFetcher, LogQuery, PageCompletion, PageRequest};
use crossbeam_channel::Sender;
use std::io;
use std::thread;

/// Runs `request` on a worker thread and queues the outcome for the UI loop.
pub(crate) fn spawn_fetch(
    fetcher: LogFetcher,
    month: &LogQuery,
    request: PageRequest,
    tx: Sender<PageCompletion>,
) -> io::Result<()> {
    let query = request.to_query(month);
    thread::Builder::new()
        .name("chatlog-fetch".into())
        .spawn(move || {
            let result = fetcher.fetch(&query);
            // The receiver is gone once the console has exited.
            let _ = tx.send(PageCompletion { request, result });
        })
        .map(|_| ())
}
