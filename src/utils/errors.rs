// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 配置错误类型
///
/// 在加载配置、构造队列策略或限流器时同步返回，构造失败即视为致命错误
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("max_concurrent_requests must be a positive integer, got {0}")]
    InvalidMaxConcurrentRequests(i64),

    #[error("request_queue_limit must be a non-negative integer, got {0}")]
    InvalidRequestQueueLimit(i64),

    #[error("rejection status code must be a valid 4xx or 5xx status, got {0}")]
    InvalidRejectionStatus(u16),
}
