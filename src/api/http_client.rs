//! # Receipt API Client
//!
//! HTTP implementation of the remote service boundary. Handles client
//! construction, authentication headers, URL and query building, and the
//! mapping from HTTP failures onto the store error taxonomy.
//!
//! The client issues exactly one request per operation: transient-failure
//! recovery is a deliberate user action surfaced through the store, never a
//! hidden transport-level retry loop.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::ReceiptService;
use crate::config::ReceiptApiConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::query::{ReceiptFilters, SortSpec};
use crate::models::receipt::{
    Receipt, ReceiptPage, ReceiptPatch, StatusResponse, SubmitResponse, UploadPayload,
};
use crate::models::statistics::ReceiptStatistics;

/// HTTP client for the receipt processing backend
///
/// # Examples
///
/// ```rust
/// use receipt_core::api::HttpReceiptService;
/// use receipt_core::config::ReceiptApiConfig;
///
/// let config = ReceiptApiConfig {
///     base_url: "http://localhost:8080".to_string(),
///     timeout_ms: 30000,
///     auth_token: None,
/// };
///
/// let service = HttpReceiptService::new(config).unwrap();
/// assert_eq!(service.base_url(), "http://localhost:8080");
/// ```
#[derive(Clone)]
pub struct HttpReceiptService {
    client: Client,
    config: ReceiptApiConfig,
    base_url: Url,
}

impl std::fmt::Debug for HttpReceiptService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReceiptService")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .field("auth_enabled", &self.config.auth_token.is_some())
            .finish()
    }
}

impl HttpReceiptService {
    /// Create a new client with the given configuration
    ///
    /// Validates the base URL and prepares the HTTP client with the
    /// configured timeout and, when a token is present, a default
    /// `Authorization: Bearer` header.
    pub fn new(config: ReceiptApiConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::config_error(format!("Invalid base URL: {e}")))?;

        let mut client_builder = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("receipt-core/{}", env!("CARGO_PKG_VERSION")));

        if let Some(ref token) = config.auth_token {
            let mut default_headers = reqwest::header::HeaderMap::new();
            default_headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {token}")
                    .parse()
                    .map_err(|e| StoreError::config_error(format!("Invalid auth token: {e}")))?,
            );
            client_builder = client_builder.default_headers(default_headers);
            debug!("Configured Bearer token authentication");
        }

        let client = client_builder
            .build()
            .map_err(|e| StoreError::config_error(format!("Failed to create HTTP client: {e}")))?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            auth_enabled = config.auth_token.is_some(),
            "Created receipt API client"
        );

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// The configured base URL for debugging/logging
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::config_error(format!("Failed to construct URL: {e}")))
    }

    fn list_url(
        &self,
        filters: &ReceiptFilters,
        sort: &SortSpec,
        page: u32,
        per_page: u32,
    ) -> StoreResult<Url> {
        let mut url = self.endpoint("/v1/receipts")?;
        {
            let mut query_pairs = url.query_pairs_mut();
            query_pairs.append_pair("page", &page.to_string());
            query_pairs.append_pair("per_page", &per_page.to_string());
            query_pairs.append_pair("sort_by", &sort.field.to_string());
            query_pairs.append_pair("sort_direction", &sort.direction.to_string());

            if let Some(ref category) = filters.category {
                query_pairs.append_pair("category", category);
            }
            if let Some(date_from) = filters.date_from {
                query_pairs.append_pair("date_from", &date_from.to_string());
            }
            if let Some(date_to) = filters.date_to {
                query_pairs.append_pair("date_to", &date_to.to_string());
            }
            if !filters.statuses.is_empty() {
                let statuses = filters
                    .statuses
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                query_pairs.append_pair("status", &statuses);
            }
            if let Some(amount_min) = filters.amount_min {
                query_pairs.append_pair("amount_min", &amount_min.to_string());
            }
            if let Some(amount_max) = filters.amount_max {
                query_pairs.append_pair("amount_max", &amount_max.to_string());
            }
        }
        Ok(url)
    }

    async fn failure_parts(response: reqwest::Response) -> (u16, String) {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        (status, text)
    }

    async fn read_failure(response: reqwest::Response) -> StoreError {
        let (status, text) = Self::failure_parts(response).await;
        StoreError::FetchFailed(format!("HTTP {status}: {text}"))
    }

    async fn mutation_failure(operation: &str, response: reqwest::Response) -> StoreError {
        let (status, text) = Self::failure_parts(response).await;
        StoreError::mutation_failed(operation, format!("HTTP {status}: {text}"))
    }
}

#[async_trait]
impl ReceiptService for HttpReceiptService {
    /// POST /v1/receipts (multipart)
    async fn submit(&self, payload: UploadPayload) -> StoreResult<SubmitResponse> {
        let url = self.endpoint("/v1/receipts")?;

        debug!(
            url = %url,
            file_name = %payload.file_name,
            bytes = payload.bytes.len(),
            "Submitting receipt image"
        );

        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.content_type)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;

        if response.status().is_success() {
            let submitted = response.json::<SubmitResponse>().await?;
            info!(receipt_id = %submitted.receipt_id, "Receipt accepted for extraction");
            return Ok(submitted);
        }

        let client_error = response.status().is_client_error();
        let (status, text) = Self::failure_parts(response).await;
        warn!(status, error = %text, "Receipt submission rejected");
        if client_error {
            Err(StoreError::UploadRejected(format!("HTTP {status}: {text}")))
        } else {
            Err(StoreError::api_error(status, text))
        }
    }

    /// GET /v1/receipts/{receipt_id}/status
    async fn get_status(&self, receipt_id: &str) -> StoreResult<StatusResponse> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}/status"))?;

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            let status = response.json::<StatusResponse>().await?;
            debug!(
                receipt_id = %receipt_id,
                status = %status.status,
                "Retrieved receipt status"
            );
            Ok(status)
        } else {
            Err(Self::read_failure(response).await)
        }
    }

    /// GET /v1/receipts/{receipt_id}
    async fn get_one(&self, receipt_id: &str) -> StoreResult<Receipt> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}"))?;

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<Receipt>().await?)
        } else {
            Err(Self::read_failure(response).await)
        }
    }

    /// POST /v1/receipts/{receipt_id}/retry
    async fn retry(&self, receipt_id: &str) -> StoreResult<()> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}/retry"))?;

        let response = self.client.post(url).send().await?;
        if response.status().is_success() {
            info!(receipt_id = %receipt_id, "Requested extraction retry");
            Ok(())
        } else {
            Err(Self::mutation_failure("retry", response).await)
        }
    }

    /// PATCH /v1/receipts/{receipt_id}
    async fn update_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}"))?;

        let response = self.client.patch(url).json(patch).send().await?;
        if response.status().is_success() {
            Ok(response.json::<Receipt>().await?)
        } else {
            Err(Self::mutation_failure("update", response).await)
        }
    }

    /// POST /v1/receipts/{receipt_id}/approve
    async fn approve_one(&self, receipt_id: &str, patch: &ReceiptPatch) -> StoreResult<Receipt> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}/approve"))?;

        let response = self.client.post(url).json(patch).send().await?;
        if response.status().is_success() {
            let receipt = response.json::<Receipt>().await?;
            info!(receipt_id = %receipt.receipt_id, "Receipt approved");
            Ok(receipt)
        } else {
            Err(Self::mutation_failure("approve", response).await)
        }
    }

    /// DELETE /v1/receipts/{receipt_id}
    async fn delete_one(&self, receipt_id: &str) -> StoreResult<()> {
        let url = self.endpoint(&format!("/v1/receipts/{receipt_id}"))?;

        let response = self.client.delete(url).send().await?;
        if response.status().is_success() {
            info!(receipt_id = %receipt_id, "Receipt deleted");
            Ok(())
        } else {
            Err(Self::mutation_failure("delete", response).await)
        }
    }

    /// GET /v1/receipts
    async fn list(
        &self,
        filters: &ReceiptFilters,
        sort: &SortSpec,
        page: u32,
        per_page: u32,
    ) -> StoreResult<ReceiptPage> {
        let url = self.list_url(filters, sort, page, per_page)?;
        debug!(url = %url, page, per_page, "Listing receipt archive");

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<ReceiptPage>().await?)
        } else {
            Err(Self::read_failure(response).await)
        }
    }

    /// GET /v1/receipts/search
    async fn search(&self, query: &str, page: u32, per_page: u32) -> StoreResult<ReceiptPage> {
        let mut url = self.endpoint("/v1/receipts/search")?;
        {
            let mut query_pairs = url.query_pairs_mut();
            query_pairs.append_pair("q", query);
            query_pairs.append_pair("page", &page.to_string());
            query_pairs.append_pair("per_page", &per_page.to_string());
        }
        debug!(url = %url, page, "Searching receipt archive");

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<ReceiptPage>().await?)
        } else {
            Err(Self::read_failure(response).await)
        }
    }

    /// GET /v1/receipts/statistics
    async fn get_statistics(&self) -> StoreResult<ReceiptStatistics> {
        let url = self.endpoint("/v1/receipts/statistics")?;

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<ReceiptStatistics>().await?)
        } else {
            Err(Self::read_failure(response).await)
        }
    }
}
