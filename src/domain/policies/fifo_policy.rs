// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::options::QueuePolicyOptions;
use super::queue_policy::{PolicySnapshot, QueuePolicy};
use crate::utils::errors::ConfigurationError;

/// 先进先出队列策略
///
/// 基于公平信号量按到达顺序放行。系统内（执行中 + 排队中）的请求总数
/// 达到 `max_concurrent_requests + request_queue_limit` 时，直接拒绝新请求。
#[derive(Debug)]
pub struct FifoPolicy {
    semaphore: Semaphore,
    /// 执行中与排队中的请求总数
    total_requests: AtomicUsize,
    max_total_requests: usize,
    max_concurrent_requests: usize,
}

impl FifoPolicy {
    /// 创建新的先进先出队列策略
    ///
    /// # 参数
    ///
    /// * `options` - 队列策略选项
    ///
    /// # 返回值
    ///
    /// * `Ok(FifoPolicy)` - 创建成功
    /// * `Err(ConfigurationError)` - 选项非法
    pub fn new(options: &QueuePolicyOptions) -> Result<Self, ConfigurationError> {
        let (max_concurrent_requests, request_queue_limit) = options.validate()?;

        Ok(Self {
            semaphore: Semaphore::new(max_concurrent_requests),
            total_requests: AtomicUsize::new(0),
            max_total_requests: max_concurrent_requests.saturating_add(request_queue_limit),
            max_concurrent_requests,
        })
    }
}

#[async_trait]
impl QueuePolicy for FifoPolicy {
    async fn try_enter(&self) -> bool {
        let total = self.total_requests.fetch_add(1, Ordering::AcqRel) + 1;
        if total > self.max_total_requests {
            self.total_requests.fetch_sub(1, Ordering::AcqRel);
            return false;
        }

        let mut reservation = Reservation {
            total_requests: &self.total_requests,
            armed: true,
        };

        match self.semaphore.acquire().await {
            Ok(permit) => {
                permit.forget();
                reservation.armed = false;
                true
            }
            // never closed
            Err(_) => false,
        }
    }

    fn on_exit(&self) {
        self.total_requests.fetch_sub(1, Ordering::AcqRel);
        self.semaphore.add_permits(1);
    }

    fn snapshot(&self) -> PolicySnapshot {
        let free_slots = self.semaphore.available_permits();
        let in_flight = self.max_concurrent_requests.saturating_sub(free_slots);
        let total = self.total_requests.load(Ordering::Acquire);

        PolicySnapshot {
            free_slots,
            queue_length: total.saturating_sub(in_flight),
        }
    }
}

/// 排队名额
///
/// 等待被取消（future 被丢弃）时归还总数计数
struct Reservation<'a> {
    total_requests: &'a AtomicUsize,
    armed: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.total_requests.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
