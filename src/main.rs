// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use throttlrs::config::settings::Settings;
use throttlrs::domain::services::concurrency_limiter::ConcurrencyLimiter;
use throttlrs::infrastructure::metrics;
use throttlrs::presentation::middleware::concurrency_limiter_middleware::LimiterState;
use throttlrs::presentation::routes;
use throttlrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting throttlrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    if settings.metrics.enabled {
        metrics::init_metrics(&settings.metrics.listen_address)?;
    }

    // 4. Initialize Concurrency Limiter
    let concurrency = &settings.concurrency;
    let limiter =
        ConcurrencyLimiter::from_options(concurrency.policy, &concurrency.queue_policy_options())?;
    let options = concurrency.limiter_options()?;
    info!(
        policy = ?concurrency.policy,
        max_concurrent_requests = concurrency.max_concurrent_requests,
        request_queue_limit = concurrency.request_queue_limit,
        "Concurrency limiter initialized"
    );

    if settings.metrics.enabled {
        metrics::spawn_limiter_reporter(limiter.clone(), Duration::from_secs(5));
    }

    // 5. Start HTTP server
    let app = routes::routes(LimiterState::new(limiter, options)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// 等待关闭信号
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
