//! Page-text retrieval through a text-extraction proxy.
//!
//! The proxy takes the target address appended to its own base URL
//! (`{base}/{target}`) and answers with the readable text of that page.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use salescopy_core::AppConfig;

use crate::error::FetchError;

/// HTTP client for the text-extraction proxy.
#[derive(Debug, Clone)]
pub struct ReaderClient {
    client: Client,
    base_url: String,
    max_chars: usize,
    timeout_secs: u64,
}

impl ReaderClient {
    /// Creates a client against `base_url`, keeping at most `max_chars`
    /// characters of each page.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, max_chars: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_chars,
            timeout_secs,
        })
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.reader_base_url,
            config.reader_timeout_secs,
            config.reader_max_chars,
        )
    }

    /// Fetches the readable text of `url`, truncated to the configured limit.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` is not an http(s) address.
    /// - [`FetchError::Timeout`] if the proxy does not answer in time.
    /// - [`FetchError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`FetchError::NotText`] if the proxy labels the body as non-text.
    /// - [`FetchError::EmptyBody`] if no text came back.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = url.trim();
        if !is_http_url(url) {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let started = Instant::now();
        let response = self
            .client
            .get(format!("{}/{url}", self.base_url))
            .header(ACCEPT, "text/plain")
            .header("X-Return-Format", "text")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "reader returned error status");
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.trim_start().starts_with("text/") {
                return Err(FetchError::NotText {
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let text = body.trim();
        if text.is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        let text = truncate_chars(text, self.max_chars);
        tracing::debug!(
            url,
            chars = text.chars().count(),
            elapsed_ms = started.elapsed().as_millis(),
            "fetched page text"
        );
        Ok(text.to_string())
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Http(err)
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

/// Returns the first `max_chars` characters of `text` without splitting a
/// multi-byte character.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(is_http_url("https://shop.example/p/1"));
        assert!(is_http_url("HTTP://shop.example"));
        assert!(!is_http_url("ftp://shop.example"));
        assert!(!is_http_url("shop.example"));
        assert!(!is_http_url("https://"));
    }

    #[tokio::test]
    async fn fetch_text_returns_truncated_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/https://shop.example/widget"))
            .and(header("accept", "text/plain"))
            .and(header("x-return-format", "text"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain; charset=utf-8")
                    .set_body_string("  Widget de aluminio premium  "),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&format!("{}/", server.uri()), 5, 6).unwrap();
        let text = reader
            .fetch_text("https://shop.example/widget")
            .await
            .unwrap();
        assert_eq!(text, "Widget");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&server.uri(), 5, 100).unwrap();
        let err = reader.fetch_text("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&server.uri(), 5, 100).unwrap();
        let err = reader
            .fetch_text("https://shop.example")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedStatus { status: 502, .. }));
    }

    #[tokio::test]
    async fn non_text_content_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
            )
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&server.uri(), 5, 100).unwrap();
        let err = reader
            .fetch_text("https://shop.example/logo.png")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotText { .. }));
    }

    #[tokio::test]
    async fn blank_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("   \n"),
            )
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&server.uri(), 5, 100).unwrap();
        let err = reader
            .fetch_text("https://shop.example")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptyBody { .. }));
    }

    #[tokio::test]
    async fn slow_reader_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let reader = ReaderClient::new(&server.uri(), 1, 100).unwrap();
        let err = reader
            .fetch_text("https://shop.example")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { timeout_secs: 1 }));
    }
}
