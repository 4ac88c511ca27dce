// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use throttlrs::presentation::middleware::concurrency_limiter_middleware::{
    ConcurrencyLimiterOptions, LimiterState,
};
use throttlrs::presentation::routes;
use throttlrs::{ConcurrencyLimiter, PolicyKind, QueuePolicyOptions};
use tower::util::ServiceExt;

/// 健康检查测试
///
/// 限流器已满时健康检查端点依然可用
#[tokio::test]
async fn health_check_bypasses_limiter() {
    let limiter =
        ConcurrencyLimiter::from_options(PolicyKind::Stack, &QueuePolicyOptions::new(1, 0))
            .unwrap();
    let _held = limiter.acquire().await.unwrap();
    let app = routes::routes(LimiterState::new(
        limiter.clone(),
        ConcurrencyLimiterOptions::default(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
