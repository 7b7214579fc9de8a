use std::sync::Arc;
use std::time::Instant;

use axum::{Router, middleware};
use parking_lot::RwLock;
use shared::error::AppError;
use tower::ServiceExt;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::{Config, ServerState};

pub type OneshotResult =
    Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// 访问日志: `method uri status elapsed_ms`
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "{} {} {}",
        method,
        uri,
        response.status()
    );
    response
}

/// 所有 API 路由 (未绑定 state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::external::router())
}

/// HTTP 服务 - 持有已绑定 state 的路由
///
/// 路由在 [`ServerState`] 构造完成后才能生成，因此延迟初始化。
#[derive(Clone, Debug)]
pub struct HttpsService {
    config: Config,
    /// 绑定 state 后的路由
    router: Arc<RwLock<Option<Router>>>,
}

impl HttpsService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Arc::new(RwLock::new(None)),
        }
    }

    /// 绑定 state 并缓存路由，`ServerState::from_parts` 末尾调用
    pub fn initialize(&self, state: ServerState) {
        let cors = if self.config.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };

        let app = build_app()
            .with_state(state)
            .layer(cors)
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request));

        *self.router.write() = Some(app);
    }

    pub fn router(&self) -> Option<Router> {
        self.router.read().clone()
    }

    /// 进程内调用路由，不经过网络 (测试和内部调用)
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        let router = self
            .router()
            .ok_or_else(|| AppError::internal("HttpsService not initialized"))?;

        match router.oneshot(request).await {
            Ok(response) => Ok(response),
            Err(never) => match never {},
        }
    }
}
