//! HTTP transport to a SPARQL 1.1 protocol endpoint (Apache Jena Fuseki)

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::binding::{BindingRecord, SparqlResults};
use super::client::SparqlExecutor;
use crate::config::EndpointConfig;
use crate::error::{Error, Result};

const RESULTS_JSON: &str = "application/sparql-results+json";

/// SPARQL executor posting form-encoded queries over HTTP
#[derive(Debug, Clone)]
pub struct FusekiClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl FusekiClient {
    /// Creates a client for the configured endpoint
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, query: &str) -> Result<Vec<BindingRecord>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Endpoint {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;
        debug!(%content_type, bytes = text.len(), "SPARQL response received");

        let results: SparqlResults = serde_json::from_str(&text)?;
        Ok(results.into_bindings())
    }
}

#[async_trait]
impl SparqlExecutor for FusekiClient {
    /// Runs a query with bounded retries and linear backoff.
    /// Server errors, rate limiting and transport failures are retried;
    /// other client errors and malformed bodies are not.
    async fn select(&self, query: &str) -> Result<Vec<BindingRecord>> {
        let mut attempt = 1;
        loop {
            match self.attempt(query).await {
                Ok(rows) => return Ok(rows),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    warn!(
                        endpoint = %self.endpoint,
                        attempt,
                        error = %e,
                        "SPARQL request failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        endpoint = %self.endpoint,
                        attempt,
                        error = %e,
                        "SPARQL request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves the given raw HTTP responses, one per connection, in order
    async fn serve(responses: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 16 * 1024];
                let _ = socket.read(&mut buf).await;
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/ds/sparql", addr)
    }

    fn http(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/sparql-results+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn config(url: String) -> EndpointConfig {
        EndpointConfig {
            url,
            retry_delay_ms: 1,
            ..EndpointConfig::default()
        }
    }

    const BODY: &str =
        r#"{"head":{"vars":["sub"]},"results":{"bindings":[{"sub":{"type":"uri","value":"http://example.org/a#D"}}]}}"#;

    #[tokio::test]
    async fn test_select_parses_bindings() {
        let url = serve(vec![http("200 OK", BODY)]).await;
        let client = FusekiClient::new(&config(url)).unwrap();

        let rows = client.select("SELECT ?sub WHERE { ?sub ?p ?o }").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("sub"), Some("http://example.org/a#D"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let url = serve(vec![http("503 Service Unavailable", ""), http("200 OK", BODY)]).await;
        let client = FusekiClient::new(&config(url)).unwrap();

        let rows = client.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let url = serve(vec![http("400 Bad Request", "parse error")]).await;
        let client = FusekiClient::new(&config(url)).unwrap();

        let err = client.select("SELEC").await.unwrap_err();
        assert!(matches!(err, Error::Endpoint { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_gives_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut cfg = config(format!("http://{}/ds/sparql", addr));
        cfg.max_retries = 2;
        let client = FusekiClient::new(&cfg).unwrap();
        assert!(client.select("SELECT * WHERE { ?s ?p ?o }").await.is_err());
    }
}
