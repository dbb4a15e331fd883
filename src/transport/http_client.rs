// src/transport/http_client.rs

use std::time::Instant;

use reqwest::Client;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::adapters::{RequestData, ResponseData};
use crate::errors::TransportError;
use crate::transport::Transport;

pub const DEFAULT_TIMEOUT_MS: u64 = 250;

/// 基于 reqwest 的出站传输，每次调用单独计时
pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: Client::new(),
            timeout_ms,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &RequestData) -> Result<ResponseData, TransportError> {
        let url = reqwest::Url::parse(&request.uri)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", request.uri, e)))?;

        let start = Instant::now();
        let call = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send();

        let response = timeout(Duration::from_millis(self.timeout_ms), call)
            .await
            .map_err(|_| TransportError::Timeout { millis: self.timeout_ms })??;

        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!(
            uri = %request.uri,
            status = status_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "exchange call finished"
        );

        Ok(ResponseData {
            status_code,
            body,
            headers,
        })
    }
}
