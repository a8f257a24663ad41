mod common;

#[cfg(test)]
pub mod tests {
    use super::common::{month_of_messages, MockLogApi};
    use chatlog_console::{default_agent, FetchError, LogFetcher, LogQuery, PrefixIdResolver};
    use std::time::Duration;

    fn month() -> LogQuery {
        LogQuery::new("forsen", "gempir", "2024", "1")
    }

    #[test]
    fn test_fetch_pages_with_limit_and_offset() {
        let api = MockLogApi::serving(month_of_messages(25));
        let fetcher = LogFetcher::new(api.base_url());

        let page = fetcher
            .fetch(&month().limit(Some(10)).offset(Some(20)))
            .expect("fetch failed");

        assert_eq!(page.len(), 5);
        assert_eq!(page[0].id.as_deref(), Some("msg-20"));
        assert_eq!(page[4].id.as_deref(), Some("msg-24"));

        let requests = api.requests();
        assert_eq!(
            requests,
            vec!["/channel/forsen/user/gempir/2024/1?jsonBasic=1&limit=10&offset=20"]
        );
    }

    #[test]
    fn test_fetch_decodes_emotes_and_author() {
        let api = MockLogApi::serving(month_of_messages(2));
        let fetcher = LogFetcher::new(api.base_url());

        let messages = fetcher.fetch(&month()).expect("fetch failed");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author(), Some("Gempir"));
        assert_eq!(messages[0].emotes.len(), 1);
        assert_eq!(messages[0].emotes[0].code, "Kappa");
        assert_eq!(messages[0].emotes[0].id, "25");
        assert!(messages[1].emotes.is_empty());
    }

    #[test]
    fn test_fetch_uses_id_routes() {
        let api = MockLogApi::serving(Vec::new());
        let fetcher = LogFetcher::new(api.base_url())
            .resolver(PrefixIdResolver::new().numeric_ids(true));

        let query = LogQuery::new("id:22484632", "77", "2024", "2");
        let messages = fetcher.fetch(&query).expect("fetch failed");

        assert!(messages.is_empty());
        assert_eq!(
            api.requests(),
            vec!["/channelid/22484632/userid/77/2024/2?jsonBasic=1"]
        );
    }

    #[test]
    fn test_server_error_yields_empty_list() {
        let api = MockLogApi::start(|_| (500, "internal error".to_string()));
        let fetcher = LogFetcher::new(api.base_url());

        let messages = fetcher.fetch(&month()).expect("non-success status is not an error");
        assert!(messages.is_empty());
        assert_eq!(api.requests().len(), 1);
    }

    #[test]
    fn test_not_found_yields_empty_list() {
        let api = MockLogApi::start(|_| (404, r#"{"error":"no logs"}"#.to_string()));
        let fetcher = LogFetcher::new(api.base_url());

        assert!(fetcher.fetch(&month()).expect("fetch failed").is_empty());
    }

    #[test]
    fn test_unreachable_server_yields_empty_list() {
        let base_url = {
            let api = MockLogApi::serving(Vec::new());
            api.base_url().to_string()
        };
        // Give the dropped server a moment to release its port.
        std::thread::sleep(Duration::from_millis(50));

        let fetcher =
            LogFetcher::with_agent(base_url, default_agent(Duration::from_secs(2)));
        let messages = fetcher.fetch(&month()).expect("transport failure is not an error");
        assert!(messages.is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let api = MockLogApi::start(|_| (200, r#"{"logs":[]}"#.to_string()));
        let fetcher = LogFetcher::new(api.base_url());

        let err = fetcher.fetch(&month()).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {err}");
    }
}
