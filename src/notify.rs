// src/notify.rs

//! Search-engine sitemap notifications.
//!
//! Fire-and-forget pings telling the configured engines the sitemap
//! changed. Fired only after a listing is created or a sitemap regeneration
//! completes, never on sitemap reads.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;
use url::Url;

use crate::config::{NotifyConfig, PingEndpoint};
use crate::error::Result;

/// Outcome of one endpoint's notification.
#[derive(Debug, Clone, Serialize)]
pub struct PingResult {
    /// Engine display name
    pub engine: String,
    pub success: bool,
    /// HTTP status when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure reason when it did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON summary returned by the ping entry point.
#[derive(Debug, Clone, Serialize)]
pub struct PingSummary {
    pub success: bool,
    pub message: String,
    pub results: Vec<PingResult>,
    pub timestamp: String,
}

impl PingSummary {
    pub fn from_results(results: Vec<PingResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            success: true,
            message: format!(
                "Sitemap güncellemesi {}/{} arama motoruna bildirildi",
                successful,
                results.len()
            ),
            results,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Create the HTTP client used for outbound pings.
pub fn create_client(config: &NotifyConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Notify every configured search engine that the sitemap changed.
///
/// One GET per endpoint, in parallel, each under its own timeout. A failed
/// endpoint never affects the others; the result set always has one entry
/// per configured endpoint.
pub async fn notify_search_engines(
    client: &reqwest::Client,
    config: &NotifyConfig,
    sitemap_url: &str,
) -> Vec<PingResult> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let pings = config
        .endpoints
        .iter()
        .map(|endpoint| ping_endpoint(client, endpoint, sitemap_url, timeout));

    join_all(pings).await
}

async fn ping_endpoint(
    client: &reqwest::Client,
    endpoint: &PingEndpoint,
    sitemap_url: &str,
    timeout: Duration,
) -> PingResult {
    let url = match ping_url(endpoint, sitemap_url) {
        Ok(url) => url,
        Err(e) => {
            return PingResult {
                engine: endpoint.name.clone(),
                success: false,
                status: None,
                error: Some(format!("invalid ping URL: {e}")),
            }
        }
    };

    let request = client.get(url.clone()).timeout(timeout).send();
    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(response)) => {
            let status = response.status();
            log::info!("Pinged {}: {}", endpoint.name, status);
            PingResult {
                engine: endpoint.name.clone(),
                success: status.is_success(),
                status: Some(status.as_u16()),
                error: None,
            }
        }
        Ok(Err(e)) => {
            log::warn!("Ping failed for {}: {}", endpoint.name, e);
            PingResult {
                engine: endpoint.name.clone(),
                success: false,
                status: None,
                error: Some(e.to_string()),
            }
        }
        Err(_) => {
            log::warn!(
                "Ping timed out for {} after {:?}",
                endpoint.name,
                timeout
            );
            PingResult {
                engine: endpoint.name.clone(),
                success: false,
                status: None,
                error: Some(format!("timed out after {}s", timeout.as_secs())),
            }
        }
    }
}

/// Build the full ping URL with the sitemap URL as an encoded query param.
fn ping_url(endpoint: &PingEndpoint, sitemap_url: &str) -> std::result::Result<Url, url::ParseError> {
    let mut url = Url::parse(&endpoint.url_base)?;
    url.query_pairs_mut().append_pair("sitemap", sitemap_url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifyConfig;

    fn endpoint(name: &str, url_base: &str) -> PingEndpoint {
        PingEndpoint {
            name: name.to_string(),
            url_base: url_base.to_string(),
        }
    }

    #[test]
    fn ping_url_encodes_sitemap_param() {
        let url = ping_url(
            &endpoint("Google", "https://www.google.com/ping"),
            "https://isilanlarim.org/sitemap-jobs.xml",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/ping?sitemap=https%3A%2F%2Fisilanlarim.org%2Fsitemap-jobs.xml"
        );
    }

    #[tokio::test]
    async fn one_result_per_endpoint_despite_failures() {
        // Unroutable endpoints: both pings fail, neither cancels the other
        // and the summary still covers every configured engine.
        let config = NotifyConfig {
            timeout_secs: 1,
            endpoints: vec![
                endpoint("Broken", "not a url"),
                endpoint("Unreachable", "http://127.0.0.1:1/ping"),
            ],
        };
        let client = create_client(&config).unwrap();

        let results = notify_search_engines(&client, &config, "https://example.org/s.xml").await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success));
        assert!(results.iter().all(|r| r.error.is_some()));
        assert_eq!(results[0].engine, "Broken");
        assert_eq!(results[1].engine, "Unreachable");
    }

    #[tokio::test]
    async fn mixed_outcome_reports_success_and_timeout() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        // Minimal local server answering 200 to whatever arrives.
        let ok_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let ok_addr = ok_listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = ok_listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                    .await;
            }
        });

        // Accepts the connection but never answers, forcing the timeout.
        let stalled_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let stalled_addr = stalled_listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = stalled_listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });

        let config = NotifyConfig {
            timeout_secs: 1,
            endpoints: vec![
                endpoint("Fast", &format!("http://{ok_addr}/ping")),
                endpoint("Stalled", &format!("http://{stalled_addr}/ping")),
            ],
        };
        let client = create_client(&config).unwrap();

        let results = notify_search_engines(&client, &config, "https://example.org/s.xml").await;

        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert_eq!(results[0].status, Some(200));
        assert!(results[0].error.is_none());
        assert!(!results[1].success);
        assert_eq!(results[1].status, None);
        assert!(results[1].error.is_some());
    }

    #[test]
    fn summary_counts_successes() {
        let summary = PingSummary::from_results(vec![
            PingResult {
                engine: "Google".into(),
                success: true,
                status: Some(200),
                error: None,
            },
            PingResult {
                engine: "Bing".into(),
                success: false,
                status: None,
                error: Some("timed out after 5s".into()),
            },
        ]);
        assert!(summary.success);
        assert!(summary.message.contains("1/2"));
        assert_eq!(summary.results.len(), 2);
    }
}
