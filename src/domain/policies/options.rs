// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

use crate::utils::errors::ConfigurationError;

/// 队列策略选项
///
/// 两种队列策略共用同一组选项，均在构造时校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QueuePolicyOptions {
    /// 最大并发执行数，必须大于0
    pub max_concurrent_requests: i64,
    /// 等待队列容量，必须大于等于0
    pub request_queue_limit: i64,
}

impl QueuePolicyOptions {
    pub fn new(max_concurrent_requests: i64, request_queue_limit: i64) -> Self {
        Self {
            max_concurrent_requests,
            request_queue_limit,
        }
    }

    /// 校验选项并转换为容量值
    ///
    /// # 返回值
    ///
    /// * `Ok((usize, usize))` - (并发槽位数, 队列容量)
    /// * `Err(ConfigurationError)` - 选项非法
    pub(crate) fn validate(&self) -> Result<(usize, usize), ConfigurationError> {
        let max_concurrent_requests = usize::try_from(self.max_concurrent_requests)
            .ok()
            .filter(|max| *max > 0)
            .ok_or(ConfigurationError::InvalidMaxConcurrentRequests(
                self.max_concurrent_requests,
            ))?;

        let request_queue_limit = usize::try_from(self.request_queue_limit).map_err(|_| {
            ConfigurationError::InvalidRequestQueueLimit(self.request_queue_limit)
        })?;

        Ok((max_concurrent_requests, request_queue_limit))
    }
}

/// 队列策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// 后进先出：优先放行最近入队的请求，队满时淘汰即将被覆盖的等待者
    #[default]
    Stack,
    /// 先进先出：按到达顺序放行，队满时直接拒绝新请求
    Fifo,
}
