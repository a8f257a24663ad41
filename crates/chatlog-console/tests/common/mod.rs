#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::thread;
use tiny_http::{Header, Response, Server};

type Handler = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// Local log API serving canned responses and recording every request URL.
pub struct MockLogApi {
    server: Arc<Server>,
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockLogApi {
    pub fn start(handler: impl Fn(&str) -> (u16, String) + Send + Sync + 'static) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("Failed to bind mock server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("Mock server has no IP address");
        let base_url = format!("http://{}", addr);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handler: Arc<Handler> = Arc::new(handler);
        let server_thread = Arc::clone(&server);
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for request in server_thread.incoming_requests() {
                let url = request.url().to_string();
                recorded.lock().unwrap().push(url.clone());

                let (status, body) = handler(&url);
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        Header::from_bytes(
                            b"Content-Type".as_slice(),
                            b"application/json".as_slice(),
                        )
                        .unwrap(),
                    );
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            base_url,
            requests,
        }
    }

    /// Serves `messages` as one month, honoring `limit` and `offset`.
    pub fn serving(messages: Vec<Value>) -> Self {
        Self::start(move |url| {
            let offset = query_param(url, "offset").unwrap_or(0);
            let limit = query_param(url, "limit").unwrap_or(usize::MAX);
            let page: Vec<Value> = messages.iter().skip(offset).take(limit).cloned().collect();
            (200, json!({ "messages": page }).to_string())
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockLogApi {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

pub fn query_param(url: &str, name: &str) -> Option<usize> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.parse().ok())
}

/// `count` messages one second apart, every third one mentioning Kappa.
pub fn month_of_messages(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let text = if i % 3 == 0 {
                format!("Kappa message {}", i)
            } else {
                format!("plain message {}", i)
            };
            let emotes = if i % 3 == 0 { "25:0-4" } else { "" };
            json!({
                "id": format!("msg-{}", i),
                "text": text,
                "timestamp": 1_704_067_200_000_i64 + (i as i64) * 1000,
                "username": "gempir",
                "displayName": "Gempir",
                "channel": "forsen",
                "type": 1,
                "tags": { "emotes": emotes },
            })
        })
        .collect()
}
