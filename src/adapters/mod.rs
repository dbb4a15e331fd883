// src/adapters/mod.rs

//! 宿主竞价服务与各个 bidder adapter 之间的接口。
//!
//! 宿主负责编排与 HTTP 传输；adapter 只负责把 OpenRTB 请求翻译成交易所的出站请求，
//! 再把交易所的 HTTP 响应翻译回统一的 `TypedBid` 列表。

pub mod videobyte;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AdapterError;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::Bid;

/// 一个出站 HTTP 请求的描述，真正的发送由宿主完成
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: Method,
    pub uri: String,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl RequestData {
    /// 便于打印/记录日志的 JSON 视图
    pub fn to_json(&self) -> Value {
        let headers: serde_json::Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    Value::String(value.to_str().unwrap_or_default().to_string()),
                )
            })
            .collect();
        let body = serde_json::from_slice::<Value>(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()));

        json!({
            "method": self.method.as_str(),
            "uri": self.uri,
            "headers": headers,
            "body": body,
        })
    }
}

/// 交易所返回的原始 HTTP 响应
#[derive(Debug, Clone, Default)]
pub struct ResponseData {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl ResponseData {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// 出价对应的广告类型
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
    Video,
    Audio,
    Native,
}

/// 附带广告类型的出价
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypedBid {
    pub bid: Bid,
    #[serde(rename = "type")]
    pub bid_type: BidType,
}

/// adapter 归一化后的响应
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BidderResponse {
    pub currency: String,
    pub bids: Vec<TypedBid>,
}

impl BidderResponse {
    /// 预分配 `capacity` 个出价槽位，币种默认为 USD
    pub fn with_bids_capacity(capacity: usize) -> Self {
        Self {
            currency: "USD".to_string(),
            bids: Vec::with_capacity(capacity),
        }
    }
}

/// `imp.ext` 的通用外层结构，`bidder` 字段里是各 adapter 自己的参数
///
/// 缺少 `bidder` 时外层仍能解析，错误留到解析 adapter 参数时报告。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExtImpBidder {
    #[serde(default)]
    pub bidder: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prebid: Option<Value>,
}

/// bidder 名称（宿主注册表中的 key）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BidderName(pub String);

impl BidderName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BidderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// **宿主与 adapter 之间的接口**
///
/// 两个方法都不会中断：所有错误随结果一起返回。
pub trait Bidder: Send + Sync {
    /// 把入站请求拆成若干出站请求
    fn make_requests(&self, request: &BidRequest) -> (Vec<RequestData>, Vec<AdapterError>);

    /// 把交易所的响应翻译成统一的出价列表
    fn make_bids(
        &self,
        internal_request: &BidRequest,
        external_request: &RequestData,
        response: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    #[test]
    fn request_data_json_view_decodes_body() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let request = RequestData {
            method: Method::POST,
            uri: "https://exchange.test/bid?pid=1".to_string(),
            body: br#"{"id":"r"}"#.to_vec(),
            headers,
        };

        let view = request.to_json();
        assert_eq!(view["method"], "POST");
        assert_eq!(view["body"]["id"], "r");
        assert_eq!(view["headers"]["content-type"], "application/json");
    }

    #[test]
    fn typed_bid_serializes_type_lowercase() {
        let typed = TypedBid {
            bid: Bid { id: "b".to_string(), impid: "i".to_string(), price: 1.5, ..Default::default() },
            bid_type: BidType::Video,
        };
        let value = serde_json::to_value(&typed).unwrap();
        assert_eq!(value["type"], "video");
        assert_eq!(value["bid"]["price"], 1.5);
    }

    #[test]
    fn bidder_response_defaults_to_usd() {
        let response = BidderResponse::with_bids_capacity(1);
        assert_eq!(response.currency, "USD");
        assert!(response.bids.is_empty());
        assert!(response.bids.capacity() >= 1);
    }
}
