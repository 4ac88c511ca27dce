// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use tracing::debug;

use crate::domain::policies::{
    FifoPolicy, PolicyKind, PolicySnapshot, QueuePolicy, QueuePolicyOptions, StackPolicy,
};
use crate::utils::errors::ConfigurationError;

/// 并发限流器
///
/// 包装任意队列策略，把成功的准入转换为 [`Lease`]，
/// 并记录拒绝次数、排队时长等指标
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    policy: Arc<dyn QueuePolicy>,
}

impl fmt::Debug for ConcurrencyLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrencyLimiter")
            .field("snapshot", &self.policy.snapshot())
            .finish()
    }
}

impl ConcurrencyLimiter {
    /// 使用指定队列策略创建限流器
    pub fn new(policy: Arc<dyn QueuePolicy>) -> Self {
        Self { policy }
    }

    /// 根据策略类型和选项创建限流器
    ///
    /// # 参数
    ///
    /// * `kind` - 队列策略类型
    /// * `options` - 队列策略选项
    ///
    /// # 返回值
    ///
    /// * `Ok(ConcurrencyLimiter)` - 创建成功
    /// * `Err(ConfigurationError)` - 选项非法
    pub fn from_options(
        kind: PolicyKind,
        options: &QueuePolicyOptions,
    ) -> Result<Self, ConfigurationError> {
        let policy: Arc<dyn QueuePolicy> = match kind {
            PolicyKind::Stack => Arc::new(StackPolicy::new(options)?),
            PolicyKind::Fifo => Arc::new(FifoPolicy::new(options)?),
        };
        Ok(Self::new(policy))
    }

    /// 申请一个并发槽位
    ///
    /// # 返回值
    ///
    /// * `Some(Lease)` - 获得槽位，租约释放时自动归还
    /// * `None` - 请求被拒绝或在排队中被淘汰
    pub async fn acquire(&self) -> Option<Lease> {
        let started = Instant::now();
        let admitted = self.policy.try_enter().await;
        let waited = started.elapsed();

        if !admitted {
            counter!("concurrency_limiter_requests_rejected_total").increment(1);
            debug!(
                waited_ms = waited.as_millis() as u64,
                "Request rejected by concurrency limiter"
            );
            return None;
        }

        counter!("concurrency_limiter_requests_admitted_total").increment(1);
        histogram!("concurrency_limiter_queue_duration_seconds").record(waited.as_secs_f64());
        gauge!("concurrency_limiter_active_leases").increment(1.0);

        Some(Lease {
            policy: self.policy.clone(),
        })
    }

    /// 获取队列策略当前状态
    pub fn snapshot(&self) -> PolicySnapshot {
        self.policy.snapshot()
    }
}

/// 并发槽位租约
///
/// 释放时恰好调用一次 `on_exit`
#[must_use = "dropping a lease immediately gives the slot back"]
pub struct Lease {
    policy: Arc<dyn QueuePolicy>,
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease").finish_non_exhaustive()
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.policy.on_exit();
        gauge!("concurrency_limiter_active_leases").decrement(1.0);
    }
}
