// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::notification::NotificationPrefs;
use crate::domain::repositories::notification_prefs_repository::{
    NotificationPrefsRepository, NotificationPrefsUpdate,
};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::notification_prefs;

/// 通知偏好仓库实现
#[derive(Clone)]
pub struct NotificationPrefsRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl NotificationPrefsRepositoryImpl {
    /// 创建新的通知偏好仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<notification_prefs::Model> for NotificationPrefs {
    fn from(model: notification_prefs::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            daily_reminder: model.daily_reminder,
            daily_reminder_time: model.daily_reminder_time,
            due_reminders: model.due_reminders,
            achievement_notifications: model.achievement_notifications,
            quiet_hours_start: model.quiet_hours_start,
            quiet_hours_end: model.quiet_hours_end,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl NotificationPrefsRepository for NotificationPrefsRepositoryImpl {
    async fn find_or_create(&self, user_id: Uuid) -> Result<NotificationPrefs, RepositoryError> {
        let existing = notification_prefs::Entity::find()
            .filter(notification_prefs::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;

        if let Some(model) = existing {
            return Ok(model.into());
        }

        let now = Utc::now().fixed_offset();
        let model = notification_prefs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            daily_reminder: Set(true),
            daily_reminder_time: Set("09:00".to_string()),
            due_reminders: Set(true),
            achievement_notifications: Set(true),
            quiet_hours_start: Set(None),
            quiet_hours_end: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        update: NotificationPrefsUpdate,
    ) -> Result<NotificationPrefs, RepositoryError> {
        // find_or_create first so the update always has a row to land on
        let current = self.find_or_create(user_id).await?;

        let model = notification_prefs::Entity::find_by_id(current.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: notification_prefs::ActiveModel = model.into();
        active.daily_reminder = Set(update.daily_reminder);
        active.daily_reminder_time = Set(update.daily_reminder_time);
        active.due_reminders = Set(update.due_reminders);
        active.achievement_notifications = Set(update.achievement_notifications);
        active.quiet_hours_start = Set(update.quiet_hours_start);
        active.quiet_hours_end = Set(update.quiet_hours_end);
        active.updated_at = Set(Utc::now().fixed_offset());

        let saved = active.update(self.db.as_ref()).await?;
        Ok(saved.into())
    }
}
