// src/mock_exchange.rs

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{serve, Json, Router};
use rand::Rng;
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};
use tracing::info;

use crate::openrtb::request::{BidRequest, Imp};
use crate::openrtb::response::{Bid, BidResponse, SeatBid};

/// 模拟 VideoByte 交易所
/// 缺少 source/pid 参数时返回 400；没有 impression 时返回 204；
/// 其余情况每个 impression 返回一个出价。
async fn handle_bid(
    Query(params): Query<HashMap<String, String>>,
    Json(request): Json<BidRequest>,
) -> Response {
    let pid = params.get("pid").filter(|p| !p.is_empty());
    if params.get("source").map(String::as_str) != Some("pbs") || pid.is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    info!(
        "Mock exchange received BidRequest: id={}, imp_count={}, pid={:?}",
        request.id,
        request.imp.len(),
        pid
    );

    if request.imp.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    // 模拟交易所处理延迟（10 ~ 50 毫秒）
    let delay_ms = rand::thread_rng().gen_range(10..50);
    sleep(Duration::from_millis(delay_ms)).await;

    let bids = request.imp.iter().map(mock_bid).collect();
    let response = BidResponse {
        id: request.id.clone(),
        seatbid: vec![SeatBid {
            bid: bids,
            seat: Some("videobyte".to_string()),
            group: Some(0),
            ..Default::default()
        }],
        cur: Some("USD".to_string()),
        ..Default::default()
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn mock_bid(imp: &Imp) -> Bid {
    let bid_id = uuid::Uuid::new_v4().to_string();
    let bidfloor = imp.bidfloor.unwrap_or(0.5);
    let price = bidfloor * rand::thread_rng().gen_range(1.0..2.5);

    // banner 返回 HTML，其余按视频返回 VAST
    let adm = if imp.banner.is_some() {
        format!(
            "<html><body>Mock VideoByte Banner<img src=\"http://mock-exchange.local/impression?bid={bid_id}\" style=\"display:none;\" /></body></html>",
            bid_id = bid_id
        )
    } else {
        format!(
            r#"<VAST version="3.0"><Ad id="{bid_id}"><InLine><AdSystem>Mock VideoByte</AdSystem><Impression><![CDATA[http://mock-exchange.local/impression?bid={bid_id}]]></Impression></InLine></Ad></VAST>"#,
            bid_id = bid_id
        )
    };

    Bid {
        id: bid_id,
        impid: imp.id.clone(),
        price,
        adm: Some(adm),
        crid: Some("mock-creative".to_string()),
        ..Default::default()
    }
}

pub fn router() -> Router {
    Router::new().route("/bid", post(handle_bid))
}

/// 启动模拟交易所，路由为 `/bid`
pub async fn start_mock_exchange(port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Mock exchange running at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    serve(listener, router()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::videobyte::VideoByteAdapter;
    use crate::adapters::{BidType, Bidder};
    use crate::config::AdapterConfig;
    use crate::openrtb::request::{Banner, Video};
    use crate::transport::{HttpTransport, Transport};
    use serde_json::json;

    async fn spawn_exchange() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            serve(listener, router()).await.unwrap();
        });
        format!("http://{}/bid", addr)
    }

    #[tokio::test]
    async fn round_trip_through_adapter() {
        let endpoint = spawn_exchange().await;
        let adapter = VideoByteAdapter::new(&AdapterConfig::new(&endpoint));
        let transport = HttpTransport::new(2_000);
        let request = BidRequest {
            id: "mock-req".to_string(),
            imp: vec![
                Imp {
                    id: "v".to_string(),
                    video: Some(Video::default()),
                    ext: Some(json!({ "bidder": { "pubId": "pub", "placementId": "pl" } })),
                    ..Default::default()
                },
                Imp {
                    id: "b".to_string(),
                    banner: Some(Banner::default()),
                    ext: Some(json!({ "bidder": { "pubId": "pub" } })),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let (requests, errors) = adapter.make_requests(&request);
        assert!(errors.is_empty());

        let mut types = Vec::new();
        for data in &requests {
            let response = transport.send(data).await.unwrap();
            assert_eq!(response.status_code, 200);
            let (bidder_response, errors) = adapter.make_bids(&request, data, &response);
            assert!(errors.is_empty());
            types.extend(bidder_response.unwrap().bids.into_iter().map(|b| b.bid_type));
        }
        assert_eq!(types, vec![BidType::Video, BidType::Banner]);
    }

    #[tokio::test]
    async fn missing_pid_is_rejected() {
        let endpoint = spawn_exchange().await;
        let response = reqwest::Client::new()
            .post(format!("{}?source=pbs", endpoint))
            .json(&json!({ "id": "r", "imp": [] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn request_without_impressions_gets_no_content() {
        let endpoint = spawn_exchange().await;
        let response = reqwest::Client::new()
            .post(format!("{}?pid=p&source=pbs", endpoint))
            .json(&json!({ "id": "r", "imp": [] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }
}
