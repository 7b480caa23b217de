// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport adapter for the remote sync endpoint.
//!
//! The receiver is a spreadsheet-bound web app: it accepts a JSON payload
//! POSTed as plain text (a JSON content type would require a pre-flight the
//! receiver cannot answer) and cannot return a structured success signal on
//! the push path. Push success therefore means only that the local network
//! call completed.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use frotahub_config::{SyncConfig, ENDPOINT_PLACEHOLDER_TOKEN};
use frotahub_core::traits::{PluginAdapter, SyncTransport};
use frotahub_core::types::{AdapterType, HealthStatus, PushEnvelope, Submission};
use frotahub_core::FrotaError;
use tracing::{debug, warn};

/// Minimum plausible length for a real endpoint URL. Anything shorter is
/// treated as unconfigured rather than attempted.
const MIN_ENDPOINT_LEN: usize = 30;

/// Whether a URL is usable as a sync endpoint: non-empty, an http(s) URL of
/// plausible length, and free of the shipped placeholder token.
pub fn endpoint_is_usable(url: &str) -> bool {
    !url.is_empty()
        && url.starts_with("http")
        && url.len() > MIN_ENDPOINT_LEN
        && !url.contains(ENDPOINT_PLACEHOLDER_TOKEN)
}

/// Reqwest-backed implementation of [`SyncTransport`].
///
/// The endpoint URL is swappable at runtime without rebuilding the client;
/// settings changes go through [`SyncTransport::set_endpoint`].
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: ArcSwap<String>,
}

impl HttpTransport {
    pub fn new(config: &SyncConfig) -> Result<Self, FrotaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FrotaError::Transport {
                message: "failed to build http client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint: ArcSwap::from_pointee(config.endpoint_url.clone()),
        })
    }

    fn endpoint_url(&self) -> Arc<String> {
        self.endpoint.load_full()
    }

    fn require_endpoint(&self) -> Result<Arc<String>, FrotaError> {
        let url = self.endpoint_url();
        if endpoint_is_usable(&url) {
            Ok(url)
        } else {
            Err(FrotaError::Transport {
                message: "sync endpoint is not configured".to_string(),
                source: None,
            })
        }
    }
}

#[async_trait]
impl PluginAdapter for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, FrotaError> {
        if !self.is_configured() {
            return Ok(HealthStatus::Degraded(
                "sync endpoint is not configured".to_string(),
            ));
        }
        if self.ping().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("endpoint unreachable".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), FrotaError> {
        Ok(())
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn push(&self, envelope: &PushEnvelope) -> Result<(), FrotaError> {
        let url = self.require_endpoint()?;
        let body = serde_json::to_string(envelope).map_err(|e| FrotaError::Internal(
            format!("envelope serialization failed: {e}"),
        ))?;

        // Fire and forget: the response body and status carry no usable
        // delivery signal, so only transport-level failures are errors.
        self.client
            .post(url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| FrotaError::Transport {
                message: format!("push to sync endpoint failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!("push dispatched");
        Ok(())
    }

    async fn pull(&self) -> Result<Vec<Submission>, FrotaError> {
        let url = self.require_endpoint()?;
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FrotaError::Transport {
                message: format!("pull from sync endpoint failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FrotaError::Transport {
                message: format!("pull returned http status {status}"),
                source: None,
            });
        }

        let submissions: Vec<Submission> =
            response.json().await.map_err(|e| FrotaError::Transport {
                message: format!("pull body is not a submission list: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(count = submissions.len(), "pull complete");
        Ok(submissions)
    }

    async fn ping(&self) -> bool {
        let url = match self.require_endpoint() {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self
            .client
            .get(url.as_str())
            .query(&[("ping", "1")])
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "ping failed");
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        endpoint_is_usable(&self.endpoint_url())
    }

    fn set_endpoint(&self, url: &str) {
        self.endpoint.store(Arc::new(url.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frotahub_config::DEFAULT_ENDPOINT_PLACEHOLDER;
    use frotahub_core::types::{OperationalProblem, ServiceCenter, SpotOffers, Submission, SyncStatus};
    use wiremock::matchers::{body_string_contains, header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_with(url: &str) -> HttpTransport {
        let config = SyncConfig {
            endpoint_url: url.to_string(),
            request_timeout_secs: 2,
            ..SyncConfig::default()
        };
        HttpTransport::new(&config).unwrap()
    }

    fn padded_url(server: &MockServer) -> String {
        // Pad the mock server's short URL past the usability length guard.
        format!("{}/sync-endpoint/exec-aaaaaaaaaaaaaaaa", server.uri())
    }

    fn make_submission(id: &str) -> Submission {
        Submission {
            id: id.to_string(),
            timestamp: "2024-05-01T18:30:00Z".to_string(),
            operational_date: "2024-05-01".to_string(),
            service_center_id: "centro-norte".to_string(),
            fleet_status: vec![],
            spot_offers: SpotOffers::default(),
            problems: OperationalProblem::default(),
            weekly_acceptance: None,
            sync_status: SyncStatus::Pending,
        }
    }

    #[test]
    fn usability_guard_rejects_bad_endpoints() {
        assert!(!endpoint_is_usable(""));
        assert!(!endpoint_is_usable("ftp://example.com/some-long-enough-path"));
        assert!(!endpoint_is_usable("https://short.io/x"));
        assert!(!endpoint_is_usable(DEFAULT_ENDPOINT_PLACEHOLDER));
        assert!(endpoint_is_usable(
            "https://script.google.com/macros/s/AKfycbz123/exec"
        ));
    }

    #[tokio::test]
    async fn push_sends_tagged_plain_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "text/plain;charset=utf-8"))
            .and(body_string_contains("\"type\":\"report\""))
            .and(body_string_contains("\"serviceCenterId\":\"centro-norte\""))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        let envelope = PushEnvelope::Report(make_submission("s1"));
        transport.push(&envelope).await.unwrap();
    }

    #[tokio::test]
    async fn push_ignores_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        let envelope = PushEnvelope::ConfigUpdate(vec![ServiceCenter::new("Centro Norte", vec![])]);
        // A 5xx from the receiver is not a local transport error.
        transport.push(&envelope).await.unwrap();
    }

    #[tokio::test]
    async fn push_refuses_placeholder_endpoint() {
        let transport = transport_with(DEFAULT_ENDPOINT_PLACEHOLDER);
        let err = transport
            .push(&PushEnvelope::Report(make_submission("s1")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn pull_parses_submission_list() {
        let server = MockServer::start().await;
        let body = serde_json::to_string(&vec![make_submission("remote-1")]).unwrap();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        let pulled = transport.pull().await.unwrap();
        assert_eq!(pulled.len(), 1);
        assert_eq!(pulled[0].id, "remote-1");
    }

    #[tokio::test]
    async fn pull_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        assert!(transport.pull().await.is_err());
    }

    #[tokio::test]
    async fn pull_fails_on_non_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "text/plain"))
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        assert!(transport.pull().await.is_err());
    }

    #[tokio::test]
    async fn ping_reflects_reachability_not_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("ping", "1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = transport_with(&padded_url(&server));
        assert!(transport.ping().await, "a 404 still proves reachability");

        transport.set_endpoint("http://127.0.0.1:1/unreachable-endpoint-path");
        assert!(!transport.ping().await);
    }

    #[tokio::test]
    async fn set_endpoint_swaps_configuration_state() {
        let transport = transport_with(DEFAULT_ENDPOINT_PLACEHOLDER);
        assert!(!transport.is_configured());

        transport.set_endpoint("https://script.google.com/macros/s/AKfycbz123/exec");
        assert!(transport.is_configured());

        transport.set_endpoint("");
        assert!(!transport.is_configured());
    }
}
