// src/bidding/runner.rs

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::adapters::{Bidder, BidderName, TypedBid};
use crate::errors::{AdapterError, TransportError};
use crate::logging::AdapterLog;
use crate::openrtb::request::BidRequest;
use crate::transport::Transport;

/// 一次调用过程中可能出现的错误
#[derive(Debug)]
pub enum RunError {
    Adapter(AdapterError),
    Transport { uri: String, error: TransportError },
}

impl RunError {
    pub fn to_json(&self) -> Value {
        match self {
            RunError::Adapter(e) => json!({ "kind": e.kind(), "message": e.to_string() }),
            RunError::Transport { uri, error } => {
                json!({ "kind": "transport", "uri": uri, "message": error.to_string() })
            }
        }
    }
}

/// 调用结果：所有出价（按出站请求顺序）与所有错误
#[derive(Debug, Default)]
pub struct BidderOutcome {
    pub currency: Option<String>,
    pub bids: Vec<TypedBid>,
    pub errors: Vec<RunError>,
}

/// 生成出站请求，逐个发送，再把响应翻译成出价。
///
/// 请求是顺序发出的，不做并发、重试或退避。
pub async fn run_bidder<T: Transport>(
    name: &BidderName,
    bidder: &dyn Bidder,
    transport: &T,
    request: &BidRequest,
) -> BidderOutcome {
    let mut outcome = BidderOutcome::default();
    let mut log = AdapterLog::new(name.as_str(), &request.id, request.imp.len());

    let (requests, errors) = bidder.make_requests(request);
    log.outbound_count = requests.len();
    for e in errors {
        log.add_adapter_error(&e);
        outcome.errors.push(RunError::Adapter(e));
    }

    for data in &requests {
        let response = match transport.send(data).await {
            Ok(response) => response,
            Err(error) => {
                warn!(uri = %data.uri, error = %error, "exchange call failed");
                log.add_error("transport", &error.to_string());
                outcome.errors.push(RunError::Transport { uri: data.uri.clone(), error });
                continue;
            }
        };

        let (bidder_response, errors) = bidder.make_bids(request, data, &response);
        for e in errors {
            log.add_adapter_error(&e);
            outcome.errors.push(RunError::Adapter(e));
        }
        if let Some(bidder_response) = bidder_response {
            outcome.currency.get_or_insert(bidder_response.currency);
            outcome.bids.extend(bidder_response.bids);
        }
    }

    log.finish(outcome.bids.len());
    log.emit();
    info!(
        request_id = %request.id,
        bids = outcome.bids.len(),
        errors = outcome.errors.len(),
        "bidder run finished"
    );
    outcome
}
