// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::NotificationPrefs;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 通知偏好更新数据
#[derive(Debug, Clone)]
pub struct NotificationPrefsUpdate {
    pub daily_reminder: bool,
    pub daily_reminder_time: String,
    pub due_reminders: bool,
    pub achievement_notifications: bool,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
}

/// 通知偏好仓库特质
///
/// 每个用户持有唯一一行，首次读取时以默认值创建
#[async_trait]
pub trait NotificationPrefsRepository: Send + Sync {
    /// 查找用户的通知偏好，不存在则以默认值创建
    async fn find_or_create(&self, user_id: Uuid) -> Result<NotificationPrefs, RepositoryError>;
    /// 写入通知偏好
    async fn upsert(
        &self,
        user_id: Uuid,
        update: NotificationPrefsUpdate,
    ) -> Result<NotificationPrefs, RepositoryError>;
}
