//! Ban-list API client

use crate::ban::BanRecord;
use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::FEED_TARGET;
use tracing::debug;

/// Source of the most recent bans
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BanFeed: Send + Sync {
    /// Fetch the most recent bans, newest first
    async fn fetch(&self) -> RelayResult<Vec<BanRecord>>;
}

/// `BanFeed` backed by the HTTP ban-list endpoint
#[derive(Debug, Clone)]
pub struct HttpBanFeed {
    client: reqwest::Client,
    url: String,
    window: u32,
}

impl HttpBanFeed {
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>, window: u32) -> Self {
        Self {
            client,
            url: url.into(),
            window,
        }
    }

    #[must_use]
    pub fn from_config(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self::new(client, config.ban_list_url.clone(), config.window)
    }

    /// Query parameters selecting the newest `window` entries
    fn page_query(&self) -> [(&'static str, u32); 2] {
        [("beginIndex", 0), ("length", self.window)]
    }
}

#[async_trait::async_trait]
impl BanFeed for HttpBanFeed {
    async fn fetch(&self) -> RelayResult<Vec<BanRecord>> {
        let records = self
            .client
            .get(&self.url)
            .query(&self.page_query())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<BanRecord>>()
            .await?;

        debug!(
            target: FEED_TARGET,
            count = records.len(),
            newest = ?records.first().map(|r| r.subject_id.as_str()),
            "Fetched ban list"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const TWO_BANS: &str = r#"[
        {"punished": "b", "punishedName": "Bob", "type": "BAN", "reason": "Fly", "duration": 86400, "timestamp": 1700000100},
        {"punished": "a", "punishedName": "Alex", "type": "MUTE", "reason": "Spam", "duration": 3600, "timestamp": 1700000000}
    ]"#;

    /// Answer a single request with a canned response, yielding its request line
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("Failed to accept");
            let mut request = Vec::<u8>::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("Failed to read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("Failed to write");
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}/banlist"), handle)
    }

    #[test]
    fn test_page_query_uses_window() {
        let feed = HttpBanFeed::new(reqwest::Client::new(), "https://example.com/banlist", 25);
        assert_eq!(feed.page_query(), [("beginIndex", 0), ("length", 25)]);
    }

    #[test]
    fn test_from_config() {
        let config = RelayConfig {
            window: 7,
            ..Default::default()
        };
        let feed = HttpBanFeed::from_config(reqwest::Client::new(), &config);
        assert_eq!(feed.url, "https://api.pvpgym.net/banlist");
        assert_eq!(feed.window, 7);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Nothing listens on the discard port.
        let feed = HttpBanFeed::new(reqwest::Client::new(), "http://127.0.0.1:9/banlist", 25);
        assert!(feed.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_sends_window_query() {
        let (url, server) = serve_once("200 OK", TWO_BANS).await;
        let feed = HttpBanFeed::new(reqwest::Client::new(), url, 25);

        let records = feed.fetch().await.expect("fetch should succeed");
        let ids: Vec<_> = records.iter().map(|r| r.subject_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let request_line = server.await.expect("server task panicked");
        assert_eq!(request_line, "GET /banlist?beginIndex=0&length=25 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let (url, server) = serve_once("500 Internal Server Error", "{}").await;
        let feed = HttpBanFeed::new(reqwest::Client::new(), url, 25);

        let result = feed.fetch().await;
        assert!(matches!(result, Err(RelayError::Http(_))));
        server.await.expect("server task panicked");
    }

    #[tokio::test]
    async fn test_unexpected_body_is_an_error() {
        let (url, server) = serve_once("200 OK", r#"{"oops":1}"#).await;
        let feed = HttpBanFeed::new(reqwest::Client::new(), url, 25);

        let err = feed.fetch().await.unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
        assert!(err.to_string().starts_with("Ban list request failed"));
        server.await.expect("server task panicked");
    }

    #[test]
    fn test_feed_implements_trait() {
        fn assert_impl<T: BanFeed>() {}
        assert_impl::<HttpBanFeed>();
        assert_impl::<MockBanFeed>();
    }
}
