// src/adapters/videobyte/params.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AdapterError;

/// VideoByte 在 `imp.ext.bidder` 中的参数
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExtImpVideoByte {
    /// 必填。缺失时该 impression 直接报 BadInput，而不是带着空的 `pid=` 发给交易所。
    #[serde(rename = "pubId")]
    pub publisher_id: String,
    #[serde(rename = "placementId", default)]
    pub placement_id: String,
    #[serde(rename = "nid", default)]
    pub network_id: String,
}

const KNOWN_KEYS: [&str; 3] = ["pubId", "placementId", "nid"];

/// 校验 bidder 参数是否符合交易所公布的参数约束：
/// 必须是对象；`pubId` 必填且为非空字符串；`placementId`、`nid` 可选，必须是字符串。
/// 未知字段只记录，不算错误。
pub fn validate_params(params: &Value) -> Result<(), Vec<AdapterError>> {
    let Some(object) = params.as_object() else {
        return Err(vec![AdapterError::bad_input("bidder params must be a JSON object")]);
    };

    let mut errors = Vec::new();
    match object.get("pubId") {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(Value::String(_)) => errors.push(AdapterError::bad_input("pubId must not be empty")),
        Some(_) => errors.push(AdapterError::bad_input("pubId must be a string")),
        None => errors.push(AdapterError::bad_input("pubId is required")),
    }
    for key in ["placementId", "nid"] {
        if let Some(value) = object.get(key) {
            if !value.is_string() {
                errors.push(AdapterError::bad_input(format!("{} must be a string", key)));
            }
        }
    }
    for key in object.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::debug!(key = %key, "ignoring unknown videobyte bidder param");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
