// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户通知偏好
///
/// 每个用户一行；时刻以 "HH:MM" 字符串表示，由客户端解释
/// 为本地时间
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// 偏好唯一标识符
    pub id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 是否启用每日提醒
    pub daily_reminder: bool,
    /// 每日提醒时刻
    pub daily_reminder_time: String,
    /// 是否启用到期提醒
    pub due_reminders: bool,
    /// 是否启用成就通知
    pub achievement_notifications: bool,
    /// 免打扰开始时刻
    pub quiet_hours_start: Option<String>,
    /// 免打扰结束时刻
    pub quiet_hours_end: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}
