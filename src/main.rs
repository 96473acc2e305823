use mindful::{run_server, ConfigError, ConfigManager};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ConfigManager::from_env().load_relay_config();

    // 缺少 key 时仍然启动，每个请求都会返回配置错误
    match config.validate() {
        Ok(()) => info!("Using Gemini API key from configuration"),
        Err(ConfigError::MissingApiKey) => error!(
            "{}: set {} or [relay].api_key",
            ConfigError::MissingApiKey,
            mindful::config::API_KEY_ENV
        ),
        Err(e) => return Err(e.into()),
    }
    let addr = config.bind_addr()?;

    run_server(config, addr).await
}
