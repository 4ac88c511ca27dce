// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含队列策略和并发限流器等核心准入控制逻辑
pub mod domain;

/// 基础设施模块
///
/// 提供指标导出等外部集成
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和限流中间件
pub mod presentation;

/// 工具模块
///
/// 提供错误类型和日志初始化等辅助功能
pub mod utils;

pub use domain::policies::{
    FifoPolicy, PolicyKind, PolicySnapshot, QueuePolicy, QueuePolicyOptions, StackPolicy,
};
pub use domain::services::concurrency_limiter::{ConcurrencyLimiter, Lease};
pub use utils::errors::ConfigurationError;
