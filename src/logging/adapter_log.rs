// src/logging/adapter_log.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;

/// **单次交易所调用的汇总日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdapterLog {
    pub timestamp: String,       // 记录时间
    pub log_type: String,        // 日志类型，固定为 "videobyte_call"
    pub bidder: String,          // bidder 名称
    pub request_id: String,      // OpenRTB `BidRequest.id`
    pub imp_count: usize,        // 入站 impression 数
    pub outbound_count: usize,   // 实际生成的出站请求数
    pub bid_count: usize,        // 解析出的出价数
    pub status: String,          // "success" / "no_bid" / "failure"
    pub errors: Vec<ErrorLog>,   // 过程中收集到的错误
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorLog {
    pub kind: String,
    pub message: String,
}

impl AdapterLog {
    pub fn new(bidder: &str, request_id: &str, imp_count: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "videobyte_call".to_string(),
            bidder: bidder.to_string(),
            request_id: request_id.to_string(),
            imp_count,
            outbound_count: 0,
            bid_count: 0,
            status: "failure".to_string(),
            errors: Vec::new(),
        }
    }

    pub fn add_adapter_error(&mut self, error: &AdapterError) {
        self.add_error(error.kind(), &error.to_string());
    }

    pub fn add_error(&mut self, kind: &str, message: &str) {
        self.errors.push(ErrorLog {
            kind: kind.to_string(),
            message: message.to_string(),
        });
    }

    /// 根据出价数确定最终状态
    pub fn finish(&mut self, bid_count: usize) {
        self.bid_count = bid_count;
        self.status = if bid_count > 0 {
            "success"
        } else if self.errors.is_empty() {
            "no_bid"
        } else {
            "failure"
        }
        .to_string();
    }

    /// 以一条 tracing 事件输出
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => tracing::info!(target: "adapter_log", adapter_log = %line, "videobyte call summary"),
            Err(e) => tracing::warn!(error = %e, "unable to serialize adapter log"),
        }
    }
}
