// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::domain::policies::{PolicyKind, QueuePolicyOptions};
use crate::presentation::middleware::concurrency_limiter_middleware::ConcurrencyLimiterOptions;
use crate::utils::errors::ConfigurationError;

/// 应用程序配置设置
///
/// 包含服务器、并发控制和指标导出等配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 并发控制配置设置
#[derive(Debug, Deserialize)]
pub struct ConcurrencySettings {
    /// 队列策略 (stack, fifo)
    pub policy: PolicyKind,
    /// 最大并发请求数
    pub max_concurrent_requests: i64,
    /// 等待队列容量
    pub request_queue_limit: i64,
    /// 拒绝请求时返回的HTTP状态码
    pub rejection_status_code: u16,
}

impl ConcurrencySettings {
    /// 转换为队列策略选项
    pub fn queue_policy_options(&self) -> QueuePolicyOptions {
        QueuePolicyOptions::new(self.max_concurrent_requests, self.request_queue_limit)
    }

    /// 转换为限流中间件选项
    ///
    /// # Returns
    ///
    /// * `Ok(ConcurrencyLimiterOptions)` - 转换成功
    /// * `Err(ConfigurationError)` - 状态码非法
    pub fn limiter_options(&self) -> Result<ConcurrencyLimiterOptions, ConfigurationError> {
        ConcurrencyLimiterOptions::with_status_code(self.rejection_status_code)
    }
}

/// 指标配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus指标导出
    pub enabled: bool,
    /// 指标导出监听地址
    pub listen_address: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和 `THROTTLRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigurationError)` - 配置加载或解析失败
    pub fn new() -> Result<Self, ConfigurationError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default Concurrency settings
            .set_default("concurrency.policy", "stack")?
            .set_default("concurrency.max_concurrent_requests", 100)?
            .set_default("concurrency.request_queue_limit", 5000)?
            .set_default("concurrency.rejection_status_code", 503)?
            // Default Metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("THROTTLRS").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}
