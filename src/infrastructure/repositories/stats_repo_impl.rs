// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::stats::{DailyStats, UserStats};
use crate::domain::models::task::TaskStatus;
use crate::domain::repositories::stats_repository::StatsRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::{task_event, user_stats};

/// 统计仓库实现
#[derive(Clone)]
pub struct StatsRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl StatsRepositoryImpl {
    /// 创建新的统计仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user_stats::Model> for UserStats {
    fn from(model: user_stats::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            home_id: model.home_id,
            total_tasks_completed: model.total_tasks_completed,
            total_minutes_cleaned: model.total_minutes_cleaned,
            current_streak: model.current_streak,
            longest_streak: model.longest_streak,
            last_activity_date: model.last_activity_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl StatsRepository for StatsRepositoryImpl {
    async fn find_or_create(
        &self,
        user_id: Uuid,
        home_id: Uuid,
    ) -> Result<UserStats, RepositoryError> {
        let existing = user_stats::Entity::find()
            .filter(user_stats::Column::UserId.eq(user_id))
            .filter(user_stats::Column::HomeId.eq(home_id))
            .one(self.db.as_ref())
            .await?;

        if let Some(model) = existing {
            return Ok(model.into());
        }

        let now = Utc::now().fixed_offset();
        let model = user_stats::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            home_id: Set(home_id),
            total_tasks_completed: Set(0),
            total_minutes_cleaned: Set(0),
            current_streak: Set(0),
            longest_streak: Set(0),
            last_activity_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn update(&self, stats: &UserStats) -> Result<UserStats, RepositoryError> {
        let model = user_stats::Entity::find_by_id(stats.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: user_stats::ActiveModel = model.into();
        active.total_tasks_completed = Set(stats.total_tasks_completed);
        active.total_minutes_cleaned = Set(stats.total_minutes_cleaned);
        active.current_streak = Set(stats.current_streak);
        active.longest_streak = Set(stats.longest_streak);
        active.last_activity_date = Set(stats.last_activity_date);
        active.updated_at = Set(Utc::now().fixed_offset());

        let saved = active.update(self.db.as_ref()).await?;
        Ok(saved.into())
    }

    async fn daily_stats(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<DailyStats>, RepositoryError> {
        let events = task_event::Entity::find()
            .filter(task_event::Column::UserId.eq(user_id))
            .filter(task_event::Column::EventType.eq(TaskStatus::Completed.to_string()))
            .filter(task_event::Column::CreatedAt.gte(since.and_time(chrono::NaiveTime::MIN).and_utc()))
            .order_by_asc(task_event::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        // Group by calendar date; minutes come from the event metadata
        let mut days: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();
        for event in events {
            let date = event.created_at.date_naive();
            let entry = days.entry(date).or_insert_with(|| DailyStats {
                date,
                tasks_completed: 0,
                minutes_cleaned: 0,
            });
            entry.tasks_completed += 1;
            entry.minutes_cleaned += event
                .metadata
                .get("actual_minutes")
                .and_then(|v| v.as_i64())
                .unwrap_or(0) as i32;
        }

        Ok(days.into_values().collect())
    }
}
