// src/config/config_manager.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "static/adapter_config.json";

/// adapter 配置，唯一识别的选项是交易所的 endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    pub endpoint: String,
}

impl AdapterConfig {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_string() }
    }

    /// endpoint 必须是绝对的 http/https 地址
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme {}", other),
            }),
        }
    }

    /// 合并配置来源：命令行/环境变量中的 endpoint 优先于配置文件
    pub fn resolve(
        source: &dyn ConfigSource,
        endpoint_override: Option<&str>,
    ) -> Result<AdapterConfig, ConfigError> {
        let config = match endpoint_override {
            Some(endpoint) => AdapterConfig::new(endpoint),
            None => source.load()?.ok_or(ConfigError::MissingEndpoint)?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// 配置来源
pub trait ConfigSource: Send + Sync {
    /// 来源不存在时返回 `Ok(None)`
    fn load(&self) -> Result<Option<AdapterConfig>, ConfigError>;
}

/// 从 JSON 文件读取配置
pub struct FileConfigSource {
    pub path: String,
}

impl FileConfigSource {
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string() }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Option<AdapterConfig>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Io { path: self.path.clone(), source: e });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse { path: self.path.clone(), source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct StaticSource(Option<AdapterConfig>);

    impl ConfigSource for StaticSource {
        fn load(&self) -> Result<Option<AdapterConfig>, ConfigError> {
            Ok(self.0.clone())
        }
    }

    fn temp_file(content: &str) -> String {
        let path = std::env::temp_dir().join(format!("videobyte-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[rstest]
    #[case("http://mock.videobyte.com/prebid")]
    #[case("https://x.videobyte.com/ortb?v=2")]
    fn accepts_absolute_http_endpoints(#[case] endpoint: &str) {
        assert!(AdapterConfig::new(endpoint).validate().is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not a url")]
    #[case("/relative/path")]
    #[case("ftp://videobyte.com")]
    fn rejects_bad_endpoints(#[case] endpoint: &str) {
        assert!(AdapterConfig::new(endpoint).validate().is_err());
    }

    #[test]
    fn override_wins_over_file() {
        let source = StaticSource(Some(AdapterConfig::new("http://from-file.test")));
        let config = AdapterConfig::resolve(&source, Some("http://from-cli.test")).unwrap();
        assert_eq!(config.endpoint, "http://from-cli.test");
    }

    #[test]
    fn missing_source_and_override_is_an_error() {
        let source = StaticSource(None);
        let err = AdapterConfig::resolve(&source, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint));
    }

    #[test]
    fn file_source_reads_json() {
        let path = temp_file(r#"{ "endpoint": "http://mock.videobyte.com" }"#);
        let config = FileConfigSource::new(&path).load().unwrap();
        assert_eq!(config, Some(AdapterConfig::new("http://mock.videobyte.com")));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn file_source_rejects_unknown_keys() {
        let path = temp_file(r#"{ "endpoint": "http://mock.videobyte.com", "timeout": 5 }"#);
        let err = FileConfigSource::new(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let source = FileConfigSource::new("/definitely/not/here/adapter_config.json");
        assert_eq!(source.load().unwrap(), None);
    }
}
