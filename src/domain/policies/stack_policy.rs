// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::trace;

use super::options::QueuePolicyOptions;
use super::queue_policy::{PolicySnapshot, QueuePolicy};
use crate::utils::errors::ConfigurationError;

/// 栈式队列状态
///
/// 环形缓冲区按栈使用：`head` 指向最近入队等待者的下一个位置
struct StackState {
    /// 固定容量的等待者缓冲区，构造后不再重新分配
    buffer: Vec<Option<oneshot::Sender<bool>>>,
    head: usize,
    queue_length: usize,
    free_server_spots: usize,
}

impl StackState {
    /// 弹出栈顶已被放弃的等待者
    ///
    /// 只检查栈顶，栈中间的废弃项留待放行或淘汰时处理
    fn prune_abandoned(&mut self) {
        let capacity = self.buffer.len();
        while self.queue_length > 0 {
            let top = (self.head + capacity - 1) % capacity;
            if matches!(&self.buffer[top], Some(waiter) if !waiter.is_closed()) {
                return;
            }
            self.buffer[top] = None;
            self.head = top;
            self.queue_length -= 1;
        }
    }
}

/// 进入结果
enum Entry {
    /// 无需等待即得出结果
    Ready(bool),
    /// 已入队，等待放行或淘汰
    Queued(oneshot::Receiver<bool>),
}

/// 后进先出队列策略
///
/// 限制并发执行数，超出部分进入固定容量的环形缓冲区等待。
/// 槽位释放时优先放行最近入队的等待者；缓冲区已满时，
/// 淘汰 `head` 处即将被覆盖的等待者，为新请求腾出位置。
pub struct StackPolicy {
    state: Mutex<StackState>,
    max_concurrent_requests: usize,
}

impl StackPolicy {
    /// 创建新的栈式队列策略
    ///
    /// # 参数
    ///
    /// * `options` - 队列策略选项
    ///
    /// # 返回值
    ///
    /// * `Ok(StackPolicy)` - 创建成功
    /// * `Err(ConfigurationError)` - 选项非法
    pub fn new(options: &QueuePolicyOptions) -> Result<Self, ConfigurationError> {
        let (max_concurrent_requests, request_queue_limit) = options.validate()?;

        let mut buffer = Vec::with_capacity(request_queue_limit);
        buffer.resize_with(request_queue_limit, || None);

        Ok(Self {
            state: Mutex::new(StackState {
                buffer,
                head: 0,
                queue_length: 0,
                free_server_spots: max_concurrent_requests,
            }),
            max_concurrent_requests,
        })
    }

    fn enter(&self) -> Entry {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state.free_server_spots > 0 {
            state.free_server_spots -= 1;
            return Entry::Ready(true);
        }

        let capacity = state.buffer.len();
        if capacity == 0 {
            return Entry::Ready(false);
        }

        state.prune_abandoned();
        if state.queue_length == capacity {
            if let Some(evicted) = state.buffer[state.head].take() {
                trace!(slot = state.head, "Queue full, evicting waiter");
                // The receiver may already be gone; nothing to notify then.
                let _ = evicted.send(false);
            }
            state.queue_length -= 1;
        }

        let (sender, receiver) = oneshot::channel();
        state.buffer[state.head] = Some(sender);
        state.queue_length += 1;
        state.head = (state.head + 1) % capacity;

        Entry::Queued(receiver)
    }

    fn release(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let capacity = state.buffer.len();

        // Abandoned waiters are skipped so the slot is never stranded.
        while state.queue_length > 0 {
            state.head = (state.head + capacity - 1) % capacity;
            state.queue_length -= 1;

            if let Some(waiter) = state.buffer[state.head].take() {
                if waiter.send(true).is_ok() {
                    trace!(slot = state.head, "Slot handed off to queued waiter");
                    state.prune_abandoned();
                    return;
                }
            }
        }

        debug_assert!(
            state.free_server_spots < self.max_concurrent_requests,
            "on_exit called more times than slots were granted"
        );
        state.free_server_spots += 1;
    }

    fn prune_abandoned(&self) {
        self.state.lock().prune_abandoned();
    }

    /// 尝试获取并发槽位
    ///
    /// 语义与 [`QueuePolicy::try_enter`] 相同，但返回未装箱的 future；
    /// 有空闲槽位时不做任何堆分配
    pub async fn try_enter(&self) -> bool {
        match self.enter() {
            Entry::Ready(admitted) => admitted,
            Entry::Queued(receiver) => PendingWaiter::new(self, receiver).wait().await,
        }
    }
}

#[async_trait]
impl QueuePolicy for StackPolicy {
    async fn try_enter(&self) -> bool {
        StackPolicy::try_enter(self).await
    }

    fn on_exit(&self) {
        self.release();
    }

    fn snapshot(&self) -> PolicySnapshot {
        let state = self.state.lock();
        PolicySnapshot {
            free_slots: state.free_server_spots,
            queue_length: state.queue_length,
        }
    }
}

/// 挂起中的等待者
///
/// 在结果被观察到之前被丢弃时，若槽位恰好已交给它，则归还该槽位
struct PendingWaiter<'a> {
    policy: &'a StackPolicy,
    receiver: oneshot::Receiver<bool>,
    settled: bool,
}

impl<'a> PendingWaiter<'a> {
    fn new(policy: &'a StackPolicy, receiver: oneshot::Receiver<bool>) -> Self {
        Self {
            policy,
            receiver,
            settled: false,
        }
    }

    async fn wait(mut self) -> bool {
        // A dropped sender means the policy itself went away.
        let admitted = (&mut self.receiver).await.unwrap_or(false);
        self.settled = true;
        admitted
    }
}

impl Drop for PendingWaiter<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.receiver.close();
        match self.receiver.try_recv() {
            Ok(true) => self.policy.release(),
            Ok(false) => {}
            // Still queued: drop the entry if it sits on top of the stack.
            Err(_) => self.policy.prune_abandoned(),
        }
    }
}
