// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供与外部系统交互的技术实现，目前包括指标导出
pub mod metrics;
