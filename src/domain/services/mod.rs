// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 并发限流服务（concurrency_limiter）：把队列策略的准入结果转换为租约，并记录指标
pub mod concurrency_limiter;
