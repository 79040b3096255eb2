// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户统计实体
///
/// 每个用户在每个家庭中持有一行：累计完成任务数、累计清洁
/// 分钟数、当前连续活跃天数与历史最长连续天数。连续天数按
/// 日历日计算，不含时刻；`current_streak` 对活跃用户永不为0，
/// 新连续期的第一天重置为1。`longest_streak` 单调不减。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    /// 统计行唯一标识符
    pub id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 家庭ID
    pub home_id: Uuid,
    /// 累计完成任务数
    pub total_tasks_completed: i32,
    /// 累计清洁分钟数
    pub total_minutes_cleaned: i32,
    /// 当前连续活跃天数
    pub current_streak: i32,
    /// 历史最长连续天数
    pub longest_streak: i32,
    /// 最近活跃日期（日历日）
    pub last_activity_date: Option<NaiveDate>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 单日聚合统计
///
/// 派生数据，不落库：由事件日志按日历日分组求和得到
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// 日历日
    pub date: NaiveDate,
    /// 当日完成任务数
    pub tasks_completed: i32,
    /// 当日清洁分钟数
    pub minutes_cleaned: i32,
}
