// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列策略模块
///
/// 提供并发准入控制的队列策略，包括后进先出的栈式策略和先进先出策略
pub mod fifo_policy;
pub mod options;
pub mod queue_policy;
pub mod stack_policy;

pub use fifo_policy::FifoPolicy;
pub use options::{PolicyKind, QueuePolicyOptions};
pub use queue_policy::{PolicySnapshot, QueuePolicy};
pub use stack_policy::StackPolicy;
