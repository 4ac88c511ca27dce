// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::services::concurrency_limiter::ConcurrencyLimiter;

/// 初始化指标系统
///
/// 安装Prometheus导出器并注册限流器相关指标
///
/// # 参数
///
/// * `listen_address` - 指标导出监听地址
pub fn init_metrics(listen_address: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = listen_address
        .parse()
        .with_context(|| format!("Invalid metrics address: {}", listen_address))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus recorder")?;

    describe_limiter_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// 注册限流器指标描述
pub fn describe_limiter_metrics() {
    describe_counter!(
        "concurrency_limiter_requests_admitted_total",
        "Total number of requests granted a concurrency slot"
    );
    describe_counter!(
        "concurrency_limiter_requests_rejected_total",
        "Total number of requests rejected or evicted from the queue"
    );
    describe_histogram!(
        "concurrency_limiter_queue_duration_seconds",
        "Time spent waiting for a concurrency slot in seconds"
    );
    describe_gauge!(
        "concurrency_limiter_active_leases",
        "Number of requests currently holding a concurrency slot"
    );
    describe_gauge!(
        "concurrency_limiter_queue_length",
        "Number of requests currently waiting in the queue"
    );
    describe_gauge!(
        "concurrency_limiter_free_slots",
        "Number of unused concurrency slots"
    );
}

/// 启动限流器状态上报后台任务
///
/// # 参数
///
/// * `limiter` - 并发限流器
/// * `period` - 上报间隔
///
/// # 返回值
///
/// 返回后台任务的句柄
pub fn spawn_limiter_reporter(limiter: ConcurrencyLimiter, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let snapshot = limiter.snapshot();
            gauge!("concurrency_limiter_queue_length").set(snapshot.queue_length as f64);
            gauge!("concurrency_limiter_free_slots").set(snapshot.free_slots as f64);
        }
    })
}
