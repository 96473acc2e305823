use serde::{Deserialize, Serialize};
use std::{env, fs, net::SocketAddr, path::Path};
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "mindful.toml";
pub const CONFIG_PATH_ENV: &str = "MINDFUL_CONFIG";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BIND_ENV: &str = "RELAY_BIND";

/// 中继服务配置
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub bind: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

impl RelayConfig {
    /// 返回已配置的 API Key，空白视为未配置
    pub fn credential(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))
    }

    /// 上游流式接口地址（不含 key）
    pub fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credential()?;
        self.bind_addr()?;
        Ok(())
    }
}

/// 客户端配置
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ClientConfig {
    pub relay_url: String,
    pub publishable_key: Option<String>,
    /// 同一行 JSON 解析失败后最多等待的读取次数
    pub max_deferrals: u32,
    /// 发送的最近消息条数，0 表示全部
    pub max_history: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:8787/functions/v1/mental-health-chat".to_string(),
            publishable_key: None,
            max_deferrals: 4,
            max_history: 0,
        }
    }
}

/// 完整配置结构
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Config {
    pub relay: Option<RelayConfig>,
    pub client: Option<ClientConfig>,
}

#[derive(Clone)]
pub struct ConfigManager {
    config_path: String,
}

impl ConfigManager {
    pub fn new(config_path: &str) -> Self {
        Self {
            config_path: config_path.to_string(),
        }
    }

    /// 使用 `MINDFUL_CONFIG` 指定的路径，未设置时使用默认文件名
    pub fn from_env() -> Self {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::new(&path)
    }

    /// 从配置文件加载配置
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let config_path = Path::new(&self.config_path);

        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path.display().to_string()));
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// 加载中继配置，环境变量优先于文件
    pub fn load_relay_config(&self) -> RelayConfig {
        let mut relay = match self.load_config() {
            Ok(Config {
                relay: Some(relay), ..
            }) => {
                info!("Loaded relay configuration from {}", self.config_path);
                relay
            }
            Ok(_) => {
                info!("No relay configuration found, using defaults");
                RelayConfig::default()
            }
            Err(e) => {
                warn!("Failed to load relay config: {}", e);
                RelayConfig::default()
            }
        };

        if let Some(key) = non_empty_env(API_KEY_ENV) {
            relay.api_key = Some(key);
            info!("Using API key from {}", API_KEY_ENV);
        }
        if let Some(bind) = non_empty_env(BIND_ENV) {
            relay.bind = bind;
        }

        relay
    }

    /// 加载客户端配置
    pub fn load_client_config(&self) -> ClientConfig {
        match self.load_config() {
            Ok(Config {
                client: Some(client),
                ..
            }) => {
                info!("Loaded client configuration from {}", self.config_path);
                client
            }
            Ok(_) => {
                info!("No client configuration found, using defaults");
                ClientConfig::default()
            }
            Err(e) => {
                warn!("Failed to load client config: {}", e);
                ClientConfig::default()
            }
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
