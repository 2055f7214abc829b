//! HTTP status source.
//!
//! Issues `GET {endpoint}` with [`reqwest`] and decodes the JSON body
//! (`{"status": "...", "id": ...}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::domain::{ConfigError, FetchError, StatusResponse};
use crate::ports::StatusSource;

/// Status source for a single job endpoint.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpStatusSource {
    /// Create a source with its own client.
    ///
    /// * `timeout` - Per-request timeout (connect + response).
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    /// Create a source reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`FetchError::Http`] with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusResponse, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(fetch_error)?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await.map_err(fetch_error)?;
        decode_body(&body)
    }

    fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}

fn fetch_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}

fn decode_body(body: &[u8]) -> Result<StatusResponse, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobStatus;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn decodes_status_body() {
        let resp = decode_body(br#"{"status": "running", "id": 5}"#).unwrap();
        assert_eq!(resp.status, JobStatus::Running);
    }

    #[test]
    fn html_body_is_a_decode_error() {
        let err = decode_body(b"<html>login</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn missing_status_is_a_decode_error() {
        let err = decode_body(br#"{"id": 5}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn endpoint_reports_the_url() {
        let url = Url::parse("http://127.0.0.1:8000/logs/5/get/").unwrap();
        let source = HttpStatusSource::new(url, Duration::from_secs(5)).unwrap();
        assert_eq!(source.endpoint(), "http://127.0.0.1:8000/logs/5/get/");
    }

    /// One-shot HTTP server on 127.0.0.1: answers a single request with
    /// `status_line` and `body`, and hands back the raw request text.
    async fn serve_once(status_line: &str, body: &str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        let url = Url::parse(&format!("http://{addr}/logs/5/get/")).unwrap();
        (url, handle)
    }

    fn local_source(url: Url) -> HttpStatusSource {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpStatusSource::with_client(client, url)
    }

    #[tokio::test]
    async fn fetch_decodes_ok_body_and_asks_for_json() {
        let (url, server) = serve_once("200 OK", r#"{"status": "running", "id": 5}"#).await;

        let resp = local_source(url).fetch().await.unwrap();
        let request = server.await.unwrap().to_ascii_lowercase();

        assert_eq!(resp.status, JobStatus::Running);
        assert_eq!(resp.id, Some(serde_json::json!(5)));
        assert!(request.starts_with("get /logs/5/get/ http/1.1"));
        assert!(request.contains("accept: application/json"));
    }

    #[rstest]
    #[case::not_found("404 Not Found", 404, false)]
    #[case::unavailable("503 Service Unavailable", 503, true)]
    #[tokio::test]
    async fn fetch_maps_non_2xx_to_http_error(
        #[case] status_line: &str,
        #[case] code: u16,
        #[case] transient: bool,
    ) {
        let (url, server) = serve_once(status_line, "nope").await;

        let err = local_source(url).fetch().await.unwrap_err();
        server.await.unwrap();

        assert_eq!(
            err,
            FetchError::Http {
                status: code,
                body: "nope".to_string()
            }
        );
        assert_eq!(err.is_transient(), transient);
    }

    #[tokio::test]
    async fn fetch_reports_html_body_as_decode_error() {
        let (url, server) = serve_once("200 OK", "<html>login</html>").await;

        let err = local_source(url).fetch().await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, FetchError::Decode(_)));
        assert!(!err.is_transient());
    }
}
