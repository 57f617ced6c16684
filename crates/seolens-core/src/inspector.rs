//! Page loading over HTTP
//!
//! [`PageInspector`] is the seam between the scoring core and the network. The
//! bundled [`HttpInspector`] fetches the raw HTML with `reqwest`, or asks a
//! Browserless-style rendering service for the rendered DOM, extracts
//! [`PageSignals`] and probes the site's `robots.txt` and `sitemap.xml`.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::extract::extract_signals;
use crate::signals::{PageSignals, PerformanceSignals};
use crate::url_utils::normalize_origin;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not navigate to page: {0}")]
    Navigation(String),

    #[error("page did not load within {0:?}")]
    Timeout(Duration),

    #[error("page returned HTTP {status}")]
    Status { status: u16 },

    #[error("rendering service error (status {status}): {message}")]
    Render { status: u16, message: String },
}

/// Loads a page and reports what it found.
#[async_trait]
pub trait PageInspector: Send + Sync {
    /// Navigate to `url` and capture its signals
    async fn load(&self, url: &str) -> Result<PageSignals, InspectError>;

    /// `true` only when a HEAD request for `url` answers 200
    async fn probe_exists(&self, url: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct InspectorConfig {
    pub navigation_timeout: Duration,
    pub probe_timeout: Duration,
    pub user_agent: String,
    /// Base URL of a rendering service exposing `POST /content`
    pub render_endpoint: Option<String>,
    pub render_token: Option<String>,
    /// Record TTFB, transfer size and resource count
    pub collect_performance: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            user_agent: format!(
                "Mozilla/5.0 (compatible; seolens/{})",
                env!("CARGO_PKG_VERSION")
            ),
            render_endpoint: None,
            render_token: None,
            collect_performance: false,
        }
    }
}

/// A fetched document and what the fetch itself revealed
struct Fetched {
    html: String,
    status: u16,
    ttfb_ms: f64,
}

pub struct HttpInspector {
    client: reqwest::Client,
    probe_client: reqwest::Client,
    config: InspectorConfig,
}

impl HttpInspector {
    pub fn new(config: InspectorConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.navigation_timeout)
            .build()
            .context("failed to build page client")?;

        // Probes only need a status line; certificate problems are not their concern.
        let probe_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.probe_timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build probe client")?;

        Ok(Self {
            client,
            probe_client,
            config,
        })
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    fn navigation_error(&self, err: reqwest::Error) -> InspectError {
        if err.is_timeout() {
            InspectError::Timeout(self.config.navigation_timeout)
        } else {
            InspectError::Navigation(err.to_string())
        }
    }

    async fn fetch_direct(&self, url: &Url) -> Result<Fetched, InspectError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.navigation_error(err))?;
        let ttfb_ms = started.elapsed().as_secs_f64() * 1000.0;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(InspectError::Status {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|err| self.navigation_error(err))?;

        Ok(Fetched {
            html,
            status: status.as_u16(),
            ttfb_ms,
        })
    }

    async fn fetch_rendered(&self, endpoint: &str, url: &Url) -> Result<Fetched, InspectError> {
        let mut content_url = format!("{}/content", endpoint.trim_end_matches('/'));
        if let Some(token) = &self.config.render_token {
            content_url.push_str(&format!("?token={token}"));
        }

        let response = self
            .client
            .post(&content_url)
            .json(&serde_json::json!({ "url": url.as_str() }))
            .send()
            .await
            .map_err(|err| self.navigation_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InspectError::Render {
                status: status.as_u16(),
                message,
            });
        }

        let html = response
            .text()
            .await
            .map_err(|err| self.navigation_error(err))?;

        // The service only answers once the page rendered, so the target's
        // own status and first byte are not observable.
        Ok(Fetched {
            html,
            status: 200,
            ttfb_ms: 0.0,
        })
    }
}

fn parse_target(url: &str) -> Result<Url, InspectError> {
    let parsed = Url::parse(url).map_err(|err| InspectError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(InspectError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[async_trait]
impl PageInspector for HttpInspector {
    async fn load(&self, url: &str) -> Result<PageSignals, InspectError> {
        let target = parse_target(url)?;

        let started = Instant::now();
        let fetched = match &self.config.render_endpoint {
            Some(endpoint) => self.fetch_rendered(endpoint, &target).await?,
            None => self.fetch_direct(&target).await?,
        };
        let load_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!(
            url,
            status = fetched.status,
            bytes = fetched.html.len(),
            load_time_ms,
            "page fetched"
        );

        let mut signals = extract_signals(&fetched.html, &target);
        signals.url = url.to_string();
        signals.status_code = fetched.status;
        signals.load_time_ms = load_time_ms;

        let origin = normalize_origin(target.as_str());
        let robots_url = format!("{origin}/robots.txt");
        let sitemap_url = format!("{origin}/sitemap.xml");
        let (has_robots_txt, has_sitemap) =
            tokio::join!(self.probe_exists(&robots_url), self.probe_exists(&sitemap_url));
        signals.has_robots_txt = has_robots_txt;
        signals.has_sitemap = has_sitemap;

        if self.config.collect_performance {
            signals.performance = Some(PerformanceSignals {
                ttfb_ms: fetched.ttfb_ms,
                transfer_size: fetched.html.len() as u64,
                resource_count: signals.estimated_requests(),
                ..Default::default()
            });
        }

        tracing::info!(
            url,
            status = signals.status_code,
            load_time_ms,
            has_robots_txt,
            has_sitemap,
            "page inspected"
        );
        Ok(signals)
    }

    async fn probe_exists(&self, url: &str) -> bool {
        match self.probe_client.head(url).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::debug!(url, error = %err, "probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PAGE: &str = r#"<html lang="en"><head><title>Mock page</title>
        <meta name="viewport" content="width=device-width"></head>
        <body><h1>Hello</h1><p>Some text.</p><img src="/a.png" alt="A"></body></html>"#;

    fn inspector(config: InspectorConfig) -> HttpInspector {
        HttpInspector::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_load_extracts_and_probes() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;
        let _robots = server
            .mock("HEAD", "/robots.txt")
            .with_status(200)
            .create_async()
            .await;
        let _sitemap = server
            .mock("HEAD", "/sitemap.xml")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/", server.url());
        let signals = inspector(InspectorConfig::default())
            .load(&url)
            .await
            .unwrap();

        assert_eq!(signals.url, url);
        assert_eq!(signals.status_code, 200);
        assert_eq!(signals.title, "Mock page");
        assert!(signals.has_viewport);
        assert!(signals.has_robots_txt);
        assert!(!signals.has_sitemap);
        assert!(!signals.is_https());
        assert!(signals.load_time_ms > 0.0);
        assert!(signals.performance.is_none());
    }

    #[tokio::test]
    async fn test_collects_http_performance() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let config = InspectorConfig {
            collect_performance: true,
            ..Default::default()
        };
        let signals = inspector(config)
            .load(&format!("{}/", server.url()))
            .await
            .unwrap();

        let perf = signals.performance.unwrap();
        assert!(perf.ttfb_ms > 0.0);
        assert_eq!(perf.transfer_size, PAGE.len() as u64);
        assert_eq!(perf.resource_count, 1);
        assert_eq!(perf.lcp_ms, 0.0);
    }

    #[tokio::test]
    async fn test_error_status_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = inspector(InspectorConfig::default())
            .load(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, InspectError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn test_rejects_invalid_urls() {
        let inspector = inspector(InspectorConfig::default());

        let err = inspector.load("not a url").await.unwrap_err();
        assert!(matches!(err, InspectError::InvalidUrl { .. }));

        let err = inspector.load("ftp://example.com/file").await.unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[tokio::test]
    async fn test_loads_through_rendering_service() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/spa", server.url());
        let _render = server
            .mock("POST", "/content")
            .match_query(Matcher::UrlEncoded("token".into(), "secret".into()))
            .match_body(Matcher::Json(serde_json::json!({ "url": target })))
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let config = InspectorConfig {
            render_endpoint: Some(server.url()),
            render_token: Some("secret".to_string()),
            ..Default::default()
        };
        let signals = inspector(config).load(&target).await.unwrap();
        assert_eq!(signals.title, "Mock page");
        assert_eq!(signals.status_code, 200);
    }

    #[tokio::test]
    async fn test_rendering_service_failure() {
        let mut server = mockito::Server::new_async().await;
        let _render = server
            .mock("POST", "/content")
            .with_status(429)
            .with_body("Too many sessions")
            .create_async()
            .await;

        let config = InspectorConfig {
            render_endpoint: Some(server.url()),
            ..Default::default()
        };
        let err = inspector(config)
            .load("https://example.com/")
            .await
            .unwrap_err();
        match err {
            InspectError::Render { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too many sessions");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_probe_requires_200() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/robots.txt")
            .with_status(200)
            .create_async()
            .await;
        let _error = server
            .mock("HEAD", "/sitemap.xml")
            .with_status(500)
            .create_async()
            .await;

        let inspector = inspector(InspectorConfig::default());
        assert!(inspector.probe_exists(&format!("{}/robots.txt", server.url())).await);
        assert!(!inspector.probe_exists(&format!("{}/sitemap.xml", server.url())).await);
        assert!(!inspector.probe_exists("http://127.0.0.1:9/unreachable").await);
    }
}
