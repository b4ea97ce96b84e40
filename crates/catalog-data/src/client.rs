//! HTTP client for the catalog backend.

use async_trait::async_trait;
use catalog_engine::prelude::{
    CatalogQueryService, CatalogReadService, LayoutPersistenceService, PresentationOverride,
    Product, ProductId, ServiceError,
};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::DataError;
use crate::timeout::TimeoutConfig;
use crate::wire::{is_not_modified_message, LayoutEnvelope, LayoutUpdate, ProductsEnvelope};

/// Catalog backend over HTTP.
///
/// Every request gets the configured connect and total timeouts. Nothing is
/// retried; retries are an explicit user action.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base: Url,
    timeouts: TimeoutConfig,
}

impl HttpCatalogClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeouts: TimeoutConfig) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.total)
            .build()?;
        Self::with_client(base_url, client, timeouts)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The total timeout is applied to every request. The connect timeout
    /// cannot be set per request, so `client` keeps its own.
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        timeouts: TimeoutConfig,
    ) -> Result<Self, DataError> {
        let base = Url::parse(base_url).map_err(|e| DataError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(DataError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Build an endpoint URL. Segments are escaped.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn layout_endpoint(&self, id: &ProductId) -> Url {
        self.endpoint(&["api", "products", "layout", id.as_str()])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeouts.total)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_error(status, &url));
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl CatalogReadService for HttpCatalogClient {
    async fn load_catalog(&self) -> Result<Vec<Product>, ServiceError> {
        let envelope: ProductsEnvelope = self.get_json(self.endpoint(&["api", "products"])).await?;
        if !envelope.success {
            return Err(ServiceError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "catalog load rejected".to_string()),
            ));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl CatalogQueryService for HttpCatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint(&["api", "search"]);
        url.query_pairs_mut().append_pair("q", query);
        self.get_json(url).await
    }
}

#[async_trait]
impl LayoutPersistenceService for HttpCatalogClient {
    async fn save_layout(
        &self,
        id: &ProductId,
        layout: &PresentationOverride,
    ) -> Result<PresentationOverride, ServiceError> {
        let url = self.layout_endpoint(id);
        debug!(%url, "PATCH");
        let response = self
            .client
            .patch(url.clone())
            .json(&LayoutUpdate { layout })
            .timeout(self.timeouts.total)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_send_error)?;
        let envelope = serde_json::from_slice::<LayoutEnvelope>(&bytes);

        match status {
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(id.to_string())),
            StatusCode::NOT_MODIFIED => Err(ServiceError::NotModified),
            StatusCode::BAD_REQUEST
                if envelope
                    .as_ref()
                    .ok()
                    .and_then(|e| e.reason())
                    .is_some_and(is_not_modified_message) =>
            {
                Err(ServiceError::NotModified)
            }
            s if !s.is_success() => Err(http_error(s, &url)),
            _ => {
                let envelope =
                    envelope.map_err(|e| ServiceError::Deserialization(e.to_string()))?;
                if !envelope.success {
                    return Err(ServiceError::Rejected(
                        envelope.reason().unwrap_or("layout save rejected").to_string(),
                    ));
                }
                Ok(envelope.layout.unwrap_or(*layout))
            }
        }
    }

    async fn fetch_layout(&self, id: &ProductId) -> Result<PresentationOverride, ServiceError> {
        let envelope: LayoutEnvelope = match self.get_json(self.layout_endpoint(id)).await {
            Err(ServiceError::Http { status: 404, .. }) => {
                return Err(ServiceError::NotFound(id.to_string()))
            }
            other => other?,
        };
        if !envelope.success {
            return Err(ServiceError::Rejected(
                envelope.reason().unwrap_or("layout read rejected").to_string(),
            ));
        }
        Ok(envelope.layout.unwrap_or_default())
    }
}

fn http_error(status: StatusCode, url: &Url) -> ServiceError {
    ServiceError::Http {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

fn map_send_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        let target = e.url().map(|u| u.to_string()).unwrap_or_default();
        ServiceError::Timeout(target)
    } else if e.is_connect() {
        ServiceError::Connection(e.to_string())
    } else if e.is_decode() {
        ServiceError::Deserialization(e.to_string())
    } else {
        ServiceError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_engine::prelude::{BorderStyle, ImageSize};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use std::time::Duration;
    use tokio::task::JoinHandle;

    /// Serve one canned response and hand back the raw request.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break buf.len();
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), task)
    }

    fn client(base: &str) -> HttpCatalogClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpCatalogClient::with_client(base, http, TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = client("http://shop.local/");
        let url = client.layout_endpoint(&ProductId::new("a/b c"));
        assert_eq!(
            url.as_str(),
            "http://shop.local/api/products/layout/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://shop.local/store");
        assert_eq!(
            client.endpoint(&["api", "products"]).as_str(),
            "http://shop.local/store/api/products"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpCatalogClient::new("not a url", TimeoutConfig::default()),
            Err(DataError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpCatalogClient::new("mailto:shop@example.com", TimeoutConfig::default()),
            Err(DataError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let (base, server) = serve_once(
            200,
            r#"{"success":true,"data":[{"_id":"p1","name":"Runner","price":49.99}]}"#,
        )
        .await;

        let products = client(&base).load_catalog().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Runner");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/products "));
    }

    #[tokio::test]
    async fn test_load_catalog_keeps_loose_records() {
        let (base, _server) = serve_once(
            200,
            r#"{"success":true,"data":[{"_id":"p1","name":"Runner","price":null},{"_id":"p2","name":"Tee","price":20,"discountPrice":-1}]}"#,
        )
        .await;

        let products = client(&base).load_catalog().await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products[0].price.is_zero());
        assert_eq!(products[1].discount_price, None);
    }

    #[tokio::test]
    async fn test_total_timeout_applies_to_supplied_client() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _stall = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = HttpCatalogClient::with_client(
            &format!("http://{}", addr),
            http,
            TimeoutConfig::from_millis(1_000, 200),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.load_catalog().await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_load_catalog_server_error() {
        let (base, _server) = serve_once(500, r#"{"success":false}"#).await;
        let err = client(&base).load_catalog().await.unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let (base, server) = serve_once(200, r#"[{"_id":"p1","name":"Trail Boot"}]"#).await;

        let results = client(&base).search("trail boot&co").await.unwrap();
        assert_eq!(results.len(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/search?q=trail+boot%26co "));
    }

    #[tokio::test]
    async fn test_save_layout_sends_full_override() {
        let (base, server) = serve_once(
            200,
            r#"{"success":true,"message":"Layout updated successfully","layout":{"imageSize":"large","textAlignment":"left","showDescription":true,"showPrice":true,"borderStyle":"rounded"}}"#,
        )
        .await;

        let layout = PresentationOverride {
            image_size: ImageSize::Large,
            border_style: BorderStyle::Rounded,
            ..PresentationOverride::default()
        };
        let saved = client(&base)
            .save_layout(&ProductId::new("p1"), &layout)
            .await
            .unwrap();
        assert_eq!(saved, layout);

        let request = server.await.unwrap();
        assert!(request.starts_with("PATCH /api/products/layout/p1 "));
        assert!(request.contains(r#""imageSize":"large""#));
        assert!(request.contains(r#""showPrice":true"#));
    }

    #[tokio::test]
    async fn test_save_layout_not_found() {
        let (base, _server) =
            serve_once(404, r#"{"success":false,"error":"Product not found"}"#).await;
        let err = client(&base)
            .save_layout(&ProductId::new("gone"), &PresentationOverride::default())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("gone".into()));
    }

    #[tokio::test]
    async fn test_save_layout_not_modified() {
        let (base, _server) =
            serve_once(400, r#"{"success":false,"error":"Layout was not modified"}"#).await;
        let err = client(&base)
            .save_layout(&ProductId::new("p1"), &PresentationOverride::default())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotModified);
    }

    #[tokio::test]
    async fn test_save_layout_generic_bad_request() {
        let (base, _server) =
            serve_once(400, r#"{"success":false,"error":"Layout data is required"}"#).await;
        let err = client(&base)
            .save_layout(&ProductId::new("p1"), &PresentationOverride::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_fetch_layout_not_found() {
        let (base, _server) =
            serve_once(404, r#"{"success":false,"error":"Product not found"}"#).await;
        let err = client(&base)
            .fetch_layout(&ProductId::new("gone"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("gone".into()));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .load_catalog()
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
