// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::preferences::UserPreferences;
use crate::domain::repositories::preferences_repository::{
    PreferencesRepository, PreferencesUpdate,
};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::user_preferences;

/// 偏好仓库实现
#[derive(Clone)]
pub struct PreferencesRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PreferencesRepositoryImpl {
    /// 创建新的偏好仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn string_vec(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn int_vec(value: &serde_json::Value) -> Vec<i32> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_i64().map(|n| n as i32))
                .collect()
        })
        .unwrap_or_default()
}

impl From<user_preferences::Model> for UserPreferences {
    fn from(model: user_preferences::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            home_id: model.home_id,
            detail_level: model.detail_level.parse().unwrap_or_default(),
            cleaning_standard: model.cleaning_standard.parse().unwrap_or_default(),
            restrictions: string_vec(&model.restrictions),
            minutes_per_day: model.minutes_per_day,
            days_per_week: int_vec(&model.days_per_week),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl PreferencesRepository for PreferencesRepositoryImpl {
    async fn find(
        &self,
        user_id: Uuid,
        home_id: Uuid,
    ) -> Result<Option<UserPreferences>, RepositoryError> {
        let model = user_preferences::Entity::find()
            .filter(user_preferences::Column::UserId.eq(user_id))
            .filter(user_preferences::Column::HomeId.eq(home_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        home_id: Uuid,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, RepositoryError> {
        let existing = user_preferences::Entity::find()
            .filter(user_preferences::Column::UserId.eq(user_id))
            .filter(user_preferences::Column::HomeId.eq(home_id))
            .one(self.db.as_ref())
            .await?;

        let now = Utc::now().fixed_offset();

        let saved = match existing {
            Some(model) => {
                let mut active: user_preferences::ActiveModel = model.into();
                active.detail_level = Set(update.detail_level.to_string());
                active.cleaning_standard = Set(update.cleaning_standard.to_string());
                active.restrictions = Set(json!(update.restrictions));
                active.minutes_per_day = Set(update.minutes_per_day);
                active.days_per_week = Set(json!(update.days_per_week));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?
            }
            None => {
                let model = user_preferences::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    home_id: Set(home_id),
                    detail_level: Set(update.detail_level.to_string()),
                    cleaning_standard: Set(update.cleaning_standard.to_string()),
                    restrictions: Set(json!(update.restrictions)),
                    minutes_per_day: Set(update.minutes_per_day),
                    days_per_week: Set(json!(update.days_per_week)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(self.db.as_ref()).await?
            }
        };

        Ok(saved.into())
    }
}
