// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::domain::policies::PolicySnapshot;
use crate::presentation::middleware::concurrency_limiter_middleware::{
    concurrency_limiter_middleware, LimiterState,
};

/// 创建应用路由
///
/// `/v1/work` 经过并发限流，其余端点不受限
///
/// # 参数
///
/// * `state` - 限流中间件状态
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: LimiterState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/limiter", get(limiter_status))
        .with_state(state.clone());

    let throttled_routes = Router::new()
        .route("/v1/work", get(work))
        .route_layer(middleware::from_fn_with_state(
            state,
            concurrency_limiter_middleware,
        ));

    Router::new().merge(public_routes).merge(throttled_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 限流器状态端点
pub async fn limiter_status(State(state): State<LimiterState>) -> Json<PolicySnapshot> {
    Json(state.limiter.snapshot())
}

/// 受限工作端点
pub async fn work() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
