// src/adapters/videobyte/mod.rs

//! VideoByte 交易所的 bidder adapter。
//!
//! 每个 impression 单独发一个请求；响应中的出价按原始 impression 推断广告类型，
//! 有 banner 的算 banner，其余一律按 video 处理。

pub mod info;
pub mod params;

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use reqwest::Method;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::adapters::{
    BidType, Bidder, BidderName, BidderResponse, ExtImpBidder, RequestData, ResponseData,
    TypedBid,
};
use crate::config::AdapterConfig;
use crate::errors::{AdapterError, ConfigError};
use crate::openrtb::request::{BidRequest, Imp};
use crate::openrtb::response::BidResponse;

use params::ExtImpVideoByte;

pub struct VideoByteAdapter {
    endpoint: String,
}

impl VideoByteAdapter {
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
        }
    }

    fn build_request(&self, request: &BidRequest, imp: &Imp) -> Result<RequestData, AdapterError> {
        let imp_ext = parse_ext(imp)?;
        let body = serde_json::to_vec(&request.with_single_imp(imp))?;

        Ok(RequestData {
            method: Method::POST,
            uri: format!("{}?{}", self.endpoint, query_string(&imp_ext)),
            body,
            headers: headers_for(request),
        })
    }
}

/// 注册表使用的构造函数：先校验 endpoint 再实例化
pub fn builder(bidder_name: BidderName, config: &AdapterConfig) -> Result<Box<dyn Bidder>, ConfigError> {
    config.validate()?;
    debug!(bidder = %bidder_name, endpoint = %config.endpoint, "building videobyte adapter");
    Ok(Box::new(VideoByteAdapter::new(config)))
}

impl Bidder for VideoByteAdapter {
    fn make_requests(&self, request: &BidRequest) -> (Vec<RequestData>, Vec<AdapterError>) {
        let mut adapter_requests = Vec::with_capacity(request.imp.len());
        let mut errors = Vec::with_capacity(request.imp.len());

        for imp in &request.imp {
            match self.build_request(request, imp) {
                Ok(data) => adapter_requests.push(data),
                Err(e) => {
                    debug!(imp_id = %imp.id, error = %e, "skipping impression");
                    errors.push(e);
                }
            }
        }

        (adapter_requests, errors)
    }

    fn make_bids(
        &self,
        internal_request: &BidRequest,
        _external_request: &RequestData,
        response: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>) {
        match response.status_code {
            204 => return (None, Vec::new()),
            400 => {
                return (
                    None,
                    vec![AdapterError::bad_input(format!(
                        "Bad user input: HTTP status {}. Run with request.debug = 1 for more info",
                        response.status_code
                    ))],
                )
            }
            200 => {}
            status => {
                return (
                    None,
                    vec![AdapterError::bad_server_response(format!(
                        "Unexpected status code: {}. Run with request.debug = 1 for more info",
                        status
                    ))],
                )
            }
        }

        // simd-json 会原地修改输入，所以这里拷贝一份
        let mut body = response.body.clone();
        let ortb_response: BidResponse = match simd_json::serde::from_slice(&mut body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "unable to decode videobyte response");
                return (None, vec![AdapterError::bad_server_response("Bad Server Response")]);
            }
        };

        // 重复 id 时后出现的覆盖先出现的
        let imp_by_id: HashMap<&str, &Imp> = internal_request
            .imp
            .iter()
            .map(|imp| (imp.id.as_str(), imp))
            .collect();

        let mut bidder_response = BidderResponse::with_bids_capacity(1);
        for seat_bid in ortb_response.seatbid {
            for bid in seat_bid.bid {
                let bid_type = media_type_for_imp(imp_by_id.get(bid.impid.as_str()).copied());
                bidder_response.bids.push(TypedBid { bid, bid_type });
            }
        }

        (Some(bidder_response), Vec::new())
    }
}

/// 找不到 impression 或没有 banner 时默认为 video
fn media_type_for_imp(imp: Option<&Imp>) -> BidType {
    match imp {
        Some(imp) if imp.banner.is_some() => BidType::Banner,
        _ => BidType::Video,
    }
}

/// 参数按 key 排序后编码
fn query_string(imp_ext: &ExtImpVideoByte) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if !imp_ext.network_id.is_empty() {
        params.append_pair("nid", &imp_ext.network_id);
    }
    params.append_pair("pid", &imp_ext.publisher_id);
    if !imp_ext.placement_id.is_empty() {
        params.append_pair("placementId", &imp_ext.placement_id);
    }
    params.append_pair("source", "pbs");
    params.finish()
}

fn headers_for(request: &BidRequest) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json;charset=utf-8"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(site) = &request.site {
        if let Some(domain) = site.domain.as_deref().filter(|d| !d.is_empty()) {
            match HeaderValue::from_str(domain) {
                Ok(value) => {
                    headers.insert(ORIGIN, value);
                }
                Err(_) => warn!(domain = %domain, "dropping Origin header with illegal value"),
            }
        }
        if let Some(referrer) = site.referrer.as_deref().filter(|r| !r.is_empty()) {
            match HeaderValue::from_str(referrer) {
                Ok(value) => {
                    headers.insert(REFERER, value);
                }
                Err(_) => warn!(referrer = %referrer, "dropping Referer header with illegal value"),
            }
        }
    }
    headers
}

fn parse_ext(imp: &Imp) -> Result<ExtImpVideoByte, AdapterError> {
    let raw_ext = imp.ext.clone().unwrap_or(serde_json::Value::Null);
    let bidder_ext: ExtImpBidder = serde_json::from_value(raw_ext).map_err(|e| {
        AdapterError::bad_input(format!(
            "Ignoring imp id={}, error while decoding extImpBidder, err: {}",
            imp.id, e
        ))
    })?;

    serde_json::from_value(bidder_ext.bidder).map_err(|e| {
        AdapterError::bad_input(format!(
            "Ignoring imp id={}, error while decoding impExt, err: {}",
            imp.id, e
        ))
    })
}
