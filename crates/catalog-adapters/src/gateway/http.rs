//! REST gateway over `reqwest`.
//!
//! Maps the port onto the backend's product resource:
//!
//! | Port call | Request                      |
//! |-----------|------------------------------|
//! | `list`    | `GET    /products?page&size…` |
//! | `get`     | `GET    /products/{id}`       |
//! | `create`  | `POST   /products`            |
//! | `update`  | `PUT    /products/{id}`       |
//! | `delete`  | `DELETE /products/{id}`       |
//!
//! Every exchange races the gateway's [`CancellationToken`]. Non-success
//! responses become an [`HttpFailure`] carrying the parsed body; the core
//! normalizes it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};
use url::Url;

use catalog_core::application::ports::{GatewayError, GatewayResult, HttpFailure, ProductGateway};
use catalog_core::domain::{Page, Product, ProductDraft, ProductId, ProductQuery};

use crate::error::AdapterError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpProductGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// API root, e.g. `http://localhost:8080/api/v1`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// [`ProductGateway`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpProductGateway {
    client: reqwest::Client,
    base_url: Url,
    cancel: CancellationToken,
}

impl HttpProductGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, AdapterError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    /// Use `token` to abandon in-flight requests. Cancelling it makes every
    /// pending and future call return [`GatewayError::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn products_url(&self, id: Option<&ProductId>) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `parse_base_url`: the base can carry path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("products");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url
    }

    /// Send one request and return the response if its status is a success.
    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<&ProductDraft>,
    ) -> GatewayResult<Response> {
        if self.cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "Sending request");
        let sent = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(%method, %url, "Request cancelled");
                return Err(GatewayError::Cancelled);
            }
            sent = request.send() => sent,
        };

        let response = sent.map_err(|e| {
            HttpFailure::transport(describe_transport_error(&e, &url))
                .with_request(method.as_str(), url.as_str())
        })?;

        let status = response.status();
        trace!(%method, %url, status = status.as_u16(), "Response received");
        if status.is_success() {
            return Ok(response);
        }

        let text = self.read_text(response).await?;
        Err(HttpFailure::response(status.as_u16(), parse_error_body(&text), status_message(status, &url))
            .with_request(method.as_str(), url.as_str())
            .into())
    }

    async fn read_text(&self, response: Response) -> GatewayResult<String> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(GatewayError::Cancelled),
            text = response.text() => Ok(text.unwrap_or_default()),
        }
    }

    /// Decode a success body. A body that is not the expected JSON is a
    /// failure with the response's status, as a browser client reports it.
    async fn decode<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        response: Response,
    ) -> GatewayResult<T> {
        let status = response.status();
        let text = self.read_text(response).await?;
        serde_json::from_str(&text).map_err(|e| {
            HttpFailure::response(
                status.as_u16(),
                None,
                format!("Http failure during parsing for {url}: {e}"),
            )
            .with_request(method.as_str(), url.as_str())
            .into()
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&ProductDraft>,
    ) -> GatewayResult<T> {
        let response = self.exchange(method.clone(), url.clone(), body).await?;
        self.decode(method, url, response).await
    }
}

#[async_trait]
impl ProductGateway for HttpProductGateway {
    #[instrument(skip_all, fields(page = query.page, size = query.size))]
    async fn list(&self, query: &ProductQuery) -> GatewayResult<Page<Product>> {
        let mut url = self.products_url(None);
        url.query_pairs_mut()
            .extend_pairs(query.to_params().iter().map(|(k, v)| (*k, v.as_str())));
        self.call(Method::GET, url, None).await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &ProductId) -> GatewayResult<Product> {
        self.call(Method::GET, self.products_url(Some(id)), None).await
    }

    #[instrument(skip_all)]
    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        self.call(Method::POST, self.products_url(None), Some(draft)).await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> GatewayResult<Product> {
        self.call(Method::PUT, self.products_url(Some(id)), Some(draft))
            .await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &ProductId) -> GatewayResult<()> {
        self.exchange(Method::DELETE, self.products_url(Some(id)), None)
            .await
            .map(drop)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AdapterError> {
    let invalid = |reason: &str| AdapterError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("URL must not have a query or fragment"));
    }
    Ok(url)
}

/// Error bodies are JSON when the backend produced them; anything else is
/// kept as text so diagnostics still see it.
fn parse_error_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

fn status_message(status: StatusCode, url: &Url) -> String {
    format!(
        "Http failure response for {url}: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

fn describe_transport_error(err: &reqwest::Error, url: &Url) -> String {
    if err.is_timeout() {
        format!("Request to {url} timed out")
    } else if err.is_connect() {
        format!("Could not connect to {url}")
    } else {
        format!("Request to {url} failed: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpProductGateway {
        HttpProductGateway::new(HttpGatewayConfig::new(base)).unwrap()
    }

    #[test]
    fn products_url_appends_to_base_path() {
        let id: ProductId = "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f".parse().unwrap();

        let gw = gateway("http://localhost:8080/api/v1");
        assert_eq!(gw.products_url(None).as_str(), "http://localhost:8080/api/v1/products");

        let gw = gateway("http://localhost:8080/api/v1/");
        assert_eq!(
            gw.products_url(Some(&id)).as_str(),
            "http://localhost:8080/api/v1/products/3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        for raw in ["not a url", "ftp://example.com", "mailto:ops@example.com", "http://x/api?v=1"] {
            assert!(
                matches!(
                    HttpProductGateway::new(HttpGatewayConfig::new(raw)),
                    Err(AdapterError::InvalidBaseUrl { .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn error_body_keeps_non_json_text() {
        assert_eq!(parse_error_body(""), None);
        assert_eq!(parse_error_body("{\"a\":1}"), Some(serde_json::json!({ "a": 1 })));
        assert_eq!(parse_error_body("Bad Gateway"), Some(Value::String("Bad Gateway".into())));
    }
}
