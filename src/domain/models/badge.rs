// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 徽章定义
///
/// 游戏化成就目录：达到 `requirement_value` 指定的阈值后授予
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    /// 徽章唯一标识符
    pub id: Uuid,
    /// 名称
    pub name: String,
    /// 描述
    pub description: String,
    /// 图标
    pub icon: String,
    /// 分类
    pub category: String,
    /// 达成条件类型
    pub requirement_type: BadgeRequirement,
    /// 达成条件阈值
    pub requirement_value: i32,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

/// 徽章授予记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBadge {
    /// 授予记录唯一标识符
    pub id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 徽章ID
    pub badge_id: Uuid,
    /// 授予时间
    pub earned_at: DateTime<FixedOffset>,
}

/// 徽章达成条件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRequirement {
    /// 累计完成任务数达标
    TasksCompleted,
    /// 累计清洁分钟数达标
    MinutesCleaned,
    /// 连续活跃天数达标
    Streak,
}

impl fmt::Display for BadgeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BadgeRequirement::TasksCompleted => write!(f, "tasks_completed"),
            BadgeRequirement::MinutesCleaned => write!(f, "minutes_cleaned"),
            BadgeRequirement::Streak => write!(f, "streak"),
        }
    }
}

impl FromStr for BadgeRequirement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tasks_completed" => Ok(BadgeRequirement::TasksCompleted),
            "minutes_cleaned" => Ok(BadgeRequirement::MinutesCleaned),
            "streak" => Ok(BadgeRequirement::Streak),
            _ => Err(()),
        }
    }
}

impl Badge {
    /// 判断给定统计值是否满足该徽章的达成条件
    pub fn is_met(&self, tasks_completed: i32, minutes_cleaned: i32, current_streak: i32) -> bool {
        let value = match self.requirement_type {
            BadgeRequirement::TasksCompleted => tasks_completed,
            BadgeRequirement::MinutesCleaned => minutes_cleaned,
            BadgeRequirement::Streak => current_streak,
        };
        value >= self.requirement_value
    }
}
