// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 分析结果（analysis）：视觉模型返回的房间评估与任务建议
/// - 用户（user）：镜像自身份提供商的用户档案与订阅信息
/// - 家庭（home）：家庭及其成员关系
/// - 房间（room）：家庭内的空间定义
/// - 偏好（preferences）：每个用户在每个家庭中的清洁偏好
/// - 扫描（scan）：一次房间拍照分析的持久记录
/// - 计划（plan）：由一次分析生成的清洁计划
/// - 任务（task）：计划中的单个清洁动作及其生命周期
/// - 统计（stats）：用户的累计进度与连续活跃天数
/// - 徽章（badge）：游戏化成就定义与授予记录
/// - 通知（notification）：用户的通知偏好
pub mod analysis;
pub mod badge;
pub mod home;
pub mod notification;
pub mod plan;
pub mod preferences;
pub mod room;
pub mod scan;
pub mod stats;
pub mod task;
pub mod user;
