// src/errors.rs

use thiserror::Error;

/// **Adapter 错误分类**
///
/// 所有错误都以列表形式收集返回给宿主，由宿主决定是否重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// 调用方导致：impression 扩展字段不合法，或交易所返回 400
    #[error("{message}")]
    BadInput { message: String },

    /// 交易所导致：非预期的状态码或无法解析的响应体
    #[error("{message}")]
    BadServerResponse { message: String },

    /// 构造出站请求体失败（宿主侧数据问题）
    #[error("failed to encode outbound request: {0}")]
    Encoding(String),
}

impl AdapterError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        AdapterError::BadInput { message: message.into() }
    }

    pub fn bad_server_response(message: impl Into<String>) -> Self {
        AdapterError::BadServerResponse { message: message.into() }
    }

    /// 日志里使用的稳定标识
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::BadInput { .. } => "bad_input",
            AdapterError::BadServerResponse { .. } => "bad_server_response",
            AdapterError::Encoding(_) => "encoding",
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Encoding(err.to_string())
    }
}

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("adapter endpoint is not configured")]
    MissingEndpoint,

    #[error("invalid adapter endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// 出站 HTTP 调用错误
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("exchange call timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("exchange call failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid outbound request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = AdapterError::bad_input("Ignoring imp id=1, error while decoding impExt, err: oops");
        assert_eq!(err.to_string(), "Ignoring imp id=1, error while decoding impExt, err: oops");
        assert_eq!(err.kind(), "bad_input");
    }

    #[test]
    fn serde_errors_become_encoding_errors() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = AdapterError::from(source);
        assert_eq!(err.kind(), "encoding");
        assert!(err.to_string().starts_with("failed to encode outbound request"));
    }
}
