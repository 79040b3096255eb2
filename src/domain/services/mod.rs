// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 分析服务（analysis_service）：组装提示词、调用视觉模型、校验与修复结果
/// - 提示词（prompt）：根据偏好组合系统指令
/// - 模式校验（schema）：对模型返回JSON的严格校验与缺省修复
/// - 视觉客户端（vision）：视觉模型调用抽象
/// - 进度服务（stats_service）：累计计数与连续活跃天数维护
/// - 订阅服务（billing_service）：计费提供商抽象与订阅生命周期事件处理
/// - 推送服务（push_service）：浏览器推送抽象与按用户扇出
/// - 认证网关（auth_gateway）：身份提供商的会话交换与令牌校验抽象
pub mod analysis_service;
pub mod auth_gateway;
pub mod billing_service;
pub mod prompt;
pub mod push_service;
pub mod schema;
pub mod stats_service;
pub mod vision;
