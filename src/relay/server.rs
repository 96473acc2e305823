use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::post,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handler::handle_chat;
use super::upstream::GeminiUpstream;
use crate::config::RelayConfig;

/// 处理函数共享的状态
#[derive(Clone)]
pub struct RelayState {
    pub upstream: Arc<GeminiUpstream>,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            upstream: Arc::new(GeminiUpstream::new(config)),
        }
    }
}

/// 任意 OPTIONS 请求由 CORS 层直接应答，不进入处理函数
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// 任意路径的 POST 都视为对话请求
pub fn create_router(state: RelayState) -> Router {
    Router::new()
        .route("/", post(handle_chat))
        .route("/{*path}", post(handle_chat))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: RelayConfig,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(RelayState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
