// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use throttlrs::presentation::middleware::concurrency_limiter_middleware::{
    ConcurrencyLimiterOptions, LimiterState,
};
use throttlrs::presentation::routes;
use throttlrs::{ConcurrencyLimiter, PolicyKind, QueuePolicyOptions};

fn limiter(kind: PolicyKind) -> ConcurrencyLimiter {
    ConcurrencyLimiter::from_options(kind, &QueuePolicyOptions::new(1, 0)).unwrap()
}

fn server(limiter: &ConcurrencyLimiter, options: ConcurrencyLimiterOptions) -> TestServer {
    TestServer::new(routes::routes(LimiterState::new(limiter.clone(), options))).unwrap()
}

/// 有空闲槽位时请求正常通过，且处理完成后槽位归还
#[tokio::test]
async fn admitted_request_returns_slot() {
    let limiter = limiter(PolicyKind::Stack);
    let server = server(&limiter, ConcurrencyLimiterOptions::default());

    let response = server.get("/v1/work").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));

    assert_eq!(limiter.snapshot().free_slots, 1);
}

/// 槽位已满且无队列容量时返回503
#[tokio::test]
async fn saturated_limiter_rejects_with_service_unavailable() {
    for kind in [PolicyKind::Stack, PolicyKind::Fifo] {
        let limiter = limiter(kind);
        let server = server(&limiter, ConcurrencyLimiterOptions::default());

        let held = limiter.acquire().await.unwrap();
        server
            .get("/v1/work")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);

        drop(held);
        server.get("/v1/work").await.assert_status_ok();
    }
}

/// 拒绝状态码可配置
#[tokio::test]
async fn rejection_status_code_is_configurable() {
    let limiter = limiter(PolicyKind::Stack);
    let options = ConcurrencyLimiterOptions::with_status_code(429).unwrap();
    let server = server(&limiter, options);

    let _held = limiter.acquire().await.unwrap();
    server
        .get("/v1/work")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// 限流器状态端点返回当前快照
#[tokio::test]
async fn limiter_status_reports_snapshot() {
    let limiter = limiter(PolicyKind::Stack);
    let server = server(&limiter, ConcurrencyLimiterOptions::default());

    let _held = limiter.acquire().await.unwrap();
    server
        .get("/v1/limiter")
        .await
        .assert_json(&json!({ "free_slots": 0, "queue_length": 0 }));
}
