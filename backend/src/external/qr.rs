//! QR rendering client
//!
//! The platform does not rasterise QR codes itself. Label payloads are sent
//! to an external rendering service which returns PNG bytes.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::QrConfig;
use crate::error::{AppError, AppResult};

/// QR rendering service client
#[derive(Clone)]
pub struct QrClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    data: &'a str,
}

impl QrClient {
    /// Create a new QrClient from configuration
    pub fn new(config: &QrConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Create a new QrClient with custom endpoint (for testing)
    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// Render a payload string into PNG bytes
    pub async fn render(&self, payload: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RenderRequest { data: payload })
            .send()
            .await
            .map_err(|e| AppError::QrEncoder(format!("QR service request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::QrEncoder(format!(
                "QR service error: {} - {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::QrEncoder(format!("Failed to read QR service response: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::QrEncoder("QR service returned empty image".to_string()));
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_endpoint_overrides_target() {
        let client = QrClient::with_endpoint("http://localhost:9100/render".to_string());
        assert_eq!(client.endpoint, "http://localhost:9100/render");
    }

    #[test]
    fn test_render_maps_transport_failure_to_qr_error() {
        let client = QrClient::with_endpoint("not a valid endpoint".to_string());
        let err = tokio_test::block_on(client.render("payload")).unwrap_err();
        assert!(matches!(err, AppError::QrEncoder(_)));
    }
}
