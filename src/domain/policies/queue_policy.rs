// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Serialize;

/// 队列策略接口
///
/// 调用约定：`try_enter` 返回 `true` 后，调用方执行受限操作，
/// 结束时恰好调用一次 `on_exit`；返回 `false` 时既不执行操作也不调用 `on_exit`。
#[async_trait]
pub trait QueuePolicy: Send + Sync {
    /// 尝试获取并发槽位
    ///
    /// 有空闲槽位时立即返回；否则挂起等待，直到被放行（`true`）或被淘汰（`false`）。
    /// 挂起中的 future 可以被安全丢弃，不会泄漏槽位。
    async fn try_enter(&self) -> bool;

    /// 归还一个槽位
    ///
    /// 没有对应的成功 `try_enter` 时调用属于违反调用约定，不做检查。
    fn on_exit(&self);

    /// 获取当前状态快照
    fn snapshot(&self) -> PolicySnapshot;
}

/// 队列策略状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicySnapshot {
    /// 空闲并发槽位数
    pub free_slots: usize,
    /// 排队等待数
    pub queue_length: usize,
}
