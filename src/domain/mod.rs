// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心准入控制逻辑，包括：
/// - 队列策略（policies）：并发槽位与等待队列的管理
/// - 服务（services）：基于队列策略的并发限流器
///
/// 领域层不依赖HTTP等外部实现。
pub mod policies;
pub mod services;
