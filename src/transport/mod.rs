// src/transport/mod.rs

pub mod http_client;

use std::future::Future;

use crate::adapters::{RequestData, ResponseData};
use crate::errors::TransportError;

pub use http_client::HttpTransport;

/// 把 adapter 生成的出站请求真正发出去
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &RequestData,
    ) -> impl Future<Output = Result<ResponseData, TransportError>> + Send;
}
