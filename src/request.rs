use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One network retrieval of a page.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Requests a page and returns its body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET through a single reused `reqwest::Client`.
/// No headers besides the ones `reqwest` sends by default.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let res = self.client.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let html = res.text().await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Answers a single request with `response` and hands back the raw request head.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });
        (url, server)
    }

    #[tokio::test]
    async fn sends_only_default_headers() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\nciao!",
        )
        .await;

        let body = HttpFetcher::new().unwrap().fetch(&url).await.unwrap();
        assert_eq!(body, "ciao!");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get / http/1.1\r\n"));
        assert!(!request.contains("user-agent:"));
        assert!(!request.contains("cookie:"));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn error_status_is_a_network_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let err = HttpFetcher::new().unwrap().fetch(&url).await.unwrap_err();
        server.await.unwrap();
        assert!(err.is_network());
        assert!(matches!(err, Error::Http { status: 404, .. }));
    }
}
