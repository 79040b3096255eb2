// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::badge::{Badge, BadgeRequirement, UserBadge};
use crate::domain::repositories::badge_repository::BadgeRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::{badge, user_badge};

/// 徽章仓库实现
#[derive(Clone)]
pub struct BadgeRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl BadgeRepositoryImpl {
    /// 创建新的徽章仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<badge::Model> for Badge {
    fn from(model: badge::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            icon: model.icon,
            category: model.category,
            requirement_type: model
                .requirement_type
                .parse()
                .unwrap_or(BadgeRequirement::TasksCompleted),
            requirement_value: model.requirement_value,
            created_at: model.created_at,
        }
    }
}

impl From<user_badge::Model> for UserBadge {
    fn from(model: user_badge::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            badge_id: model.badge_id,
            earned_at: model.earned_at,
        }
    }
}

#[async_trait]
impl BadgeRepository for BadgeRepositoryImpl {
    async fn list_all(&self) -> Result<Vec<Badge>, RepositoryError> {
        let models = badge::Entity::find().all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserBadge>, RepositoryError> {
        let models = user_badge::Entity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn grant(&self, user_id: Uuid, badge_id: Uuid) -> Result<(), RepositoryError> {
        let existing = user_badge::Entity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
            .filter(user_badge::Column::BadgeId.eq(badge_id))
            .one(self.db.as_ref())
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        let model = user_badge::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            badge_id: Set(badge_id),
            earned_at: Set(Utc::now().fixed_offset()),
        };
        model.insert(self.db.as_ref()).await?;

        Ok(())
    }
}
