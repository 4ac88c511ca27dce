// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::domain::services::concurrency_limiter::ConcurrencyLimiter;
use crate::utils::errors::ConfigurationError;

/// 限流中间件选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimiterOptions {
    /// 请求被拒绝时返回的状态码
    pub rejection_status_code: StatusCode,
}

impl Default for ConcurrencyLimiterOptions {
    fn default() -> Self {
        Self {
            rejection_status_code: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ConcurrencyLimiterOptions {
    /// 使用指定状态码创建选项
    ///
    /// # 参数
    ///
    /// * `code` - HTTP状态码
    ///
    /// # 返回值
    ///
    /// * `Ok(ConcurrencyLimiterOptions)` - 创建成功
    /// * `Err(ConfigurationError)` - 状态码非法或不是4xx/5xx错误状态
    pub fn with_status_code(code: u16) -> Result<Self, ConfigurationError> {
        let rejection_status_code = StatusCode::from_u16(code)
            .ok()
            .filter(|status| status.is_client_error() || status.is_server_error())
            .ok_or(ConfigurationError::InvalidRejectionStatus(code))?;
        Ok(Self {
            rejection_status_code,
        })
    }
}

/// 限流中间件状态
#[derive(Clone, Debug)]
pub struct LimiterState {
    pub limiter: ConcurrencyLimiter,
    pub options: ConcurrencyLimiterOptions,
}

impl LimiterState {
    pub fn new(limiter: ConcurrencyLimiter, options: ConcurrencyLimiterOptions) -> Self {
        Self { limiter, options }
    }
}

/// 并发限流中间件
///
/// 在执行后续处理器之前申请并发槽位，处理完成后归还；
/// 申请失败时直接返回配置的拒绝状态码
pub async fn concurrency_limiter_middleware(
    State(state): State<LimiterState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(lease) = state.limiter.acquire().await else {
        debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "MaxConcurrentRequests limit reached, request rejected"
        );
        let body = Json(json!({ "error": "Server is busy, please retry later" }));
        return (state.options.rejection_status_code, body).into_response();
    };

    let response = next.run(request).await;
    drop(lease);
    response
}
