//! HTTP row source for a hosted PostgREST-style backend.
//!
//! Requests are `GET <project_url>/rest/v1/<view>?<params>` with the static
//! API key sent both as `apikey` and as a bearer token.

use crate::query::Query;
use crate::source::{RowSource, SourceError};
use crate::views::View;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Connection details for the backend project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub project_url: String,
    /// Public (anon) API key
    pub api_key: String,
}

impl BackendConfig {
    pub fn new(project_url: &str, api_key: &str) -> Self {
        Self {
            project_url: project_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn view_url(&self, view: View) -> String {
        format!("{}/rest/v1/{}", self.project_url, view.table_name())
    }
}

/// Row source backed by the REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: BackendConfig,
    client: Client,
}

impl RestClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies).
    pub fn with_client(config: BackendConfig, client: Client) -> Self {
        Self { config, client }
    }
}

impl RowSource for RestClient {
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        view: View,
        query: &Query,
    ) -> Result<Vec<T>, SourceError> {
        let url = self.config.view_url(view);
        log::info!("GET {}?{}", url, query);

        let network = |e: reqwest::Error| SourceError::Network {
            view,
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&url)
            .query(&query.params())
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            log::error!("{} returned {}: {}", view, status, body);
            return Err(SourceError::Backend {
                view,
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            view,
            message: e.to_string(),
        })?;
        log::info!("{} returned {} rows", view, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::KpiSample;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer one request with `status` and `body`; the join handle yields
    /// the raw request head, lowercased.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&head).to_lowercase()
        });
        (url, handle)
    }

    #[test]
    fn view_url_trims_trailing_slash() {
        let config = BackendConfig::new("https://example.supabase.co/", "anon");
        assert_eq!(
            config.view_url(View::LatestSamples),
            "https://example.supabase.co/rest/v1/vw_latest_samples"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is not an HTTP server
        let client = RestClient::new(BackendConfig::new("http://127.0.0.1:9", "anon"));
        let err = client
            .fetch_rows::<serde_json::Value>(View::KpiSamples, &Query::bulk())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Network { view: View::KpiSamples, .. }));
    }

    #[tokio::test]
    async fn request_carries_view_filters_and_key() {
        let (url, server) = serve_once(
            "200 OK",
            r#"[{"sample_date": "2024-06-01 10:00", "latitude": 41.3, "longitude": -96.1, "ammonia_ppm": 0.2}]"#,
        );
        let client = RestClient::new(BackendConfig::new(&url, "k3y"));
        let query = Query::point("sample_date", "2024-06-01 10:00").limit(1000);
        let rows: Vec<KpiSample> = client.fetch(&query).await.unwrap();

        let head = server.join().unwrap();
        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "get /rest/v1/vw_kpi_samples?select=*&sample_date=eq.2024-06-01+10%3a00&limit=1000 http/1.1"
        );
        assert!(head.contains("\r\napikey: k3y\r\n"));
        assert!(head.contains("\r\nauthorization: bearer k3y\r\n"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ammonia_ppm, Some(0.2));
    }

    #[tokio::test]
    async fn error_status_is_backend_error() {
        let (url, server) = serve_once("404 Not Found", r#"{"message": "relation does not exist"}"#);
        let client = RestClient::new(BackendConfig::new(&url, "k3y"));
        let err = client
            .fetch_rows::<serde_json::Value>(View::ZoneLandcoverMap, &Query::bulk())
            .await
            .unwrap_err();
        server.join().unwrap();
        match err {
            SourceError::Backend { view, status, body } => {
                assert_eq!(view, View::ZoneLandcoverMap);
                assert_eq!(status, 404);
                assert!(body.contains("relation does not exist"));
            }
            other => panic!("expected a backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (url, server) = serve_once("200 OK", "not json");
        let client = RestClient::new(BackendConfig::new(&url, "k3y"));
        let err = client
            .fetch_rows::<serde_json::Value>(View::LatestSamples, &Query::bulk())
            .await
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, SourceError::Decode { view: View::LatestSamples, .. }));
    }
}
